// water-marker/src/core/processor.rs
use super::{compute_placement, Geometry, ReferenceCorner, Result};
use crate::processors::{Compositor, Decoded, ImageCodec, ResizeCache};
use image::RgbaImage;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    SkippedExisting,
    SkippedUnreadable(String),
    Completed,
    Failed(String),
}

/// One destination entry and where its result goes.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub status: JobStatus,
}

impl ProcessingJob {
    pub fn new(source: PathBuf, output: PathBuf) -> Self {
        Self {
            source,
            output,
            status: JobStatus::Pending,
        }
    }
}

/// Applies the overlay to a single destination.
pub struct OverlayProcessor {
    overlay: RgbaImage,
    geometry: Geometry,
    corner: ReferenceCorner,
    compositor: Compositor,
}

impl OverlayProcessor {
    pub fn new(overlay: RgbaImage, geometry: Geometry, corner: ReferenceCorner) -> Self {
        Self {
            overlay,
            geometry,
            corner,
            compositor: Compositor::new(),
        }
    }

    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Paste coordinate for an overlay of `overlay_size` on a destination.
    pub fn placement(&self, destination: (u32, u32), overlay_size: (u32, u32)) -> (i64, i64) {
        let offsets = self.geometry.offset.pixel_offsets(destination);
        compute_placement(destination, overlay_size, self.corner, offsets)
    }

    /// Decodes, composites and saves one job. The cache is the run's single slot
    /// and must only be touched sequentially.
    ///
    /// An unreadable source is not an error: the job is marked and `Ok` returned.
    pub fn process<C: ImageCodec + ?Sized>(
        &self,
        codec: &C,
        cache: &mut ResizeCache,
        job: &mut ProcessingJob,
    ) -> Result<()> {
        let destination = match codec.decode(&job.source) {
            Decoded::Image(image) => image,
            Decoded::Unreadable(reason) => {
                job.status = JobStatus::SkippedUnreadable(reason);
                return Ok(());
            }
        };

        let dest_size = destination.dimensions();
        let overlay = cache.get_or_compute(dest_size, &self.geometry.sizing, &self.overlay)?;
        let position = self.placement(dest_size, overlay.dimensions());

        log::debug!(
            "Placing {}x{} overlay at ({}, {}) on {} ({}x{})",
            overlay.width(),
            overlay.height(),
            position.0,
            position.1,
            job.source.display(),
            dest_size.0,
            dest_size.1
        );

        let result = self.compositor.composite(&destination, overlay, position);
        codec.save(&result, &job.output)?;

        job.status = JobStatus::Completed;
        Ok(())
    }
}
