// water-marker/src/processors/progress.rs
//! Pipeline events and the reporters that consume them.
//!
//! The rendered progress lines end in `(<current>/<total> completed)` so a host
//! UI can parse them with `^.+\((?P<current>\d+)/(?P<total>\d+) +completed\)$`.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started {
        total: usize,
        folders: usize,
    },
    FolderStarted {
        input: PathBuf,
        output: PathBuf,
    },
    Skipped {
        source: PathBuf,
        output: PathBuf,
        current: usize,
        total: usize,
    },
    Completed {
        source: PathBuf,
        output: PathBuf,
        current: usize,
        total: usize,
    },
    Unreadable {
        source: PathBuf,
        reason: String,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

pub trait ProgressReporter {
    fn report(&mut self, event: &PipelineEvent);

    fn finish(&mut self) {}
}

/// Renders the console line for an event. Silent events yield `None`.
pub fn format_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::FolderStarted { input, .. } => Some(format!(
            "\n\n------ Processing Folder '{}' ------\n\n",
            input.display()
        )),
        PipelineEvent::Skipped {
            source,
            output,
            current,
            total,
        } => Some(format!(
            "Skipping '{}' as it was already processed and saved at '{}' ({}/{} completed)",
            source.display(),
            output.display(),
            current,
            total
        )),
        PipelineEvent::Completed {
            source,
            output,
            current,
            total,
        } => Some(format!(
            "Overlay complete for '{}'. Result saved at '{}' ({}/{} completed)",
            source.display(),
            output.display(),
            current,
            total
        )),
        PipelineEvent::Started { .. }
        | PipelineEvent::Unreadable { .. }
        | PipelineEvent::Failed { .. } => None,
    }
}

/// Writes progress lines to stdout.
#[derive(Default)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&mut self, event: &PipelineEvent) {
        if let Some(line) = format_event(event) {
            println!("{}", line);
        }
    }
}

/// Terminal progress bar for interactive use.
pub struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        Self { pb }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn report(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Started { total, .. } => {
                self.pb.set_length(*total as u64);
            }
            PipelineEvent::FolderStarted { input, .. } => {
                self.pb.set_message(format!("{}", input.display()));
            }
            PipelineEvent::Skipped { current, .. } | PipelineEvent::Completed { current, .. } => {
                self.pb.set_position(*current as u64);
            }
            PipelineEvent::Failed { source, error } => {
                self.pb
                    .println(format!("Failed '{}': {}", source.display(), error));
            }
            PipelineEvent::Unreadable { .. } => {}
        }
    }

    fn finish(&mut self) {
        self.pb.finish_with_message("done");
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<PipelineEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().filter_map(format_event).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}
