use clap::Parser;
use log::LevelFilter;
use water_marker::{BarReporter, BatchPipeline, Cli, ConsoleReporter, ProgressReporter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let config = cli.to_config();
    let mut pipeline = BatchPipeline::from_config(&config)?;

    let mut reporter: Box<dyn ProgressReporter> = if cli.progress_bar {
        Box::new(BarReporter::new())
    } else {
        Box::new(ConsoleReporter)
    };

    let summary =
        pipeline.run_folders(&config.input_folders, &config.output_template, reporter.as_mut())?;

    log::info!(
        "Processed {} of {} entries ({} already done, {} unreadable, {} failed)",
        summary.completed,
        summary.total,
        summary.skipped_existing,
        summary.unreadable,
        summary.failed
    );

    Ok(())
}
