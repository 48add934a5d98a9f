// water-marker/src/cli.rs
use crate::core::{OverlayConfig, ReferenceCorner, DEFAULT_OUTPUT_TEMPLATE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "water-marker",
    version,
    about = "Overlay a source image with alpha transparency on folders of destination images"
)]
pub struct Cli {
    /// The source image to use as an overlay
    pub source_image: PathBuf,

    /// One or more folders with the destination images
    #[arg(required = true, num_args = 1..)]
    pub input_folders: Vec<PathBuf>,

    /// Output folder; `{input_folder}` is replaced by each input folder.
    /// Missing folders are created
    #[arg(short, long, default_value = DEFAULT_OUTPUT_TEMPLATE)]
    pub output_folder: String,

    /// Corner of the destination the overlay is anchored to
    #[arg(long, value_enum, default_value_t = Corner::BottomRight)]
    pub reference_corner: Corner,

    /// Offset from the reference corner in percent of the destination width (both axes)
    #[arg(long, default_value = "2.7")]
    pub corner_offset_factor: Option<f64>,

    /// Horizontal offset in percent of the destination width
    #[arg(long)]
    pub border_offset_factor_horizontal: Option<f64>,

    /// Vertical offset in percent of the destination height
    #[arg(long)]
    pub border_offset_factor_vertical: Option<f64>,

    /// Overlay width in percent of the destination width, aspect preserved
    #[arg(long, default_value = "10")]
    pub overlay_bounded_scale_factor: Option<f64>,

    /// Overlay width in percent of the destination width
    #[arg(long)]
    pub overlay_width_bounded_scale_factor: Option<f64>,

    /// Overlay height in percent of the destination height
    #[arg(long)]
    pub overlay_height_bounded_scale_factor: Option<f64>,

    /// Largest width or height accepted when decoding a destination (0 disables)
    #[arg(long, default_value_t = 100_000)]
    pub max_dimension: u32,

    /// Draw a progress bar instead of printing one line per image
    #[arg(long)]
    pub progress_bar: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<Corner> for ReferenceCorner {
    fn from(corner: Corner) -> Self {
        match corner {
            Corner::TopLeft => ReferenceCorner::TopLeft,
            Corner::TopRight => ReferenceCorner::TopRight,
            Corner::BottomLeft => ReferenceCorner::BottomLeft,
            Corner::BottomRight => ReferenceCorner::BottomRight,
        }
    }
}

impl Cli {
    pub fn to_config(&self) -> OverlayConfig {
        OverlayConfig {
            overlay_path: self.source_image.clone(),
            input_folders: self.input_folders.clone(),
            output_template: self.output_folder.clone(),
            corner: self.reference_corner.into(),
            corner_offset_factor: self.corner_offset_factor,
            border_offset_factor_horizontal: self.border_offset_factor_horizontal,
            border_offset_factor_vertical: self.border_offset_factor_vertical,
            overlay_bounded_scale_factor: self.overlay_bounded_scale_factor,
            overlay_width_bounded_scale_factor: self.overlay_width_bounded_scale_factor,
            overlay_height_bounded_scale_factor: self.overlay_height_bounded_scale_factor,
            max_dimensions: match self.max_dimension {
                0 => None,
                n => Some((n, n)),
            },
        }
    }
}
