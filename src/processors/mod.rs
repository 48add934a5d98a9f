// water-marker/src/processors/mod.rs
mod batch;
mod compositor;
mod loader;
pub mod progress;
mod resizer;

pub use batch::{BatchPipeline, BatchSummary};
pub use compositor::Compositor;
pub use loader::{Decoded, ImageCodec, Loader};
pub use progress::{
    format_event, BarReporter, ConsoleReporter, PipelineEvent, ProgressReporter, RecordingReporter,
};
pub use resizer::{rescale_overlay, ResizeCache};

pub mod prelude {
    pub use super::{BatchPipeline, Compositor, ImageCodec, Loader, ResizeCache};
}
