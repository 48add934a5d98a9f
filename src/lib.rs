pub mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Cli, Corner};
pub use crate::core::geometry::{round_px, RawOffsets, RawScales};
pub use crate::core::processor::{JobStatus, OverlayProcessor, ProcessingJob};
pub use crate::core::{
    compute_placement, validate_config, Geometry, OffsetPolicy, OverlayConfig, OverlayError,
    PixelOffsets, ReferenceCorner, Result, SizingPolicy, DEFAULT_OUTPUT_TEMPLATE,
};
pub use crate::processors::{
    format_event, rescale_overlay, BarReporter, BatchPipeline, BatchSummary, Compositor,
    ConsoleReporter, Decoded, ImageCodec, Loader, PipelineEvent, ProgressReporter,
    RecordingReporter, ResizeCache,
};
pub use crate::utils::{
    build_folder_pairs, expand_output_template, list_entries, resolve_path, FolderPair,
    INPUT_FOLDER_VARIABLE,
};

pub mod prelude {
    pub use crate::{
        BatchPipeline, ConsoleReporter, Geometry, ImageCodec, Loader, OffsetPolicy,
        OverlayConfig, ReferenceCorner, ResizeCache, SizingPolicy,
    };
}

// Re-export commonly used types
pub use image::{RgbImage, RgbaImage};
