// water-marker/src/processors/loader.rs
use crate::core::{OverlayError, Result};
use image::{ImageFormat, ImageReader, Limits, RgbImage, RgbaImage};
use std::path::Path;

/// Outcome of decoding one destination entry.
#[derive(Debug)]
pub enum Decoded {
    Image(RgbaImage),
    /// I/O failure, unknown format, or an image rejected by the decode limits.
    Unreadable(String),
}

/// Decode/encode boundary used by the batch pipeline.
pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Decoded;

    /// Encodes `image` at `path`, format chosen from the extension.
    fn save(&self, image: &RgbImage, path: &Path) -> Result<()>;
}

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn without_max_dimensions(mut self) -> Self {
        self.max_dimensions = None;
        self
    }

    /// Loads the overlay. Any failure here is fatal for the run.
    pub fn load_overlay(&self, path: &Path) -> Result<RgbaImage> {
        if !path.exists() {
            return Err(OverlayError::InvalidOverlay(format!(
                "Invalid/non-existent overlay image: {}",
                path.display()
            )));
        }

        let overlay = self.decode_rgba(path).map_err(|e| {
            OverlayError::InvalidOverlay(format!("{}: {}", path.display(), e))
        })?;

        log::info!(
            "Loaded overlay {}: {}x{} pixels",
            path.display(),
            overlay.width(),
            overlay.height()
        );

        Ok(overlay)
    }

    /// Decode limits; the resize cache applies the same ones to rescaled overlays.
    pub fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some((max_w, max_h)) = self.max_dimensions {
            limits.max_image_width = Some(max_w);
            limits.max_image_height = Some(max_h);
        }
        limits
    }

    fn decode_rgba(&self, path: &Path) -> Result<RgbaImage> {
        let mut reader = ImageReader::open(path)?.with_guessed_format()?;
        reader.limits(self.limits());

        let image = reader.decode()?;
        Ok(image.to_rgba8())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for Loader {
    fn decode(&self, path: &Path) -> Decoded {
        match self.decode_rgba(path) {
            Ok(image) => {
                log::debug!(
                    "Decoded {}: {}x{} pixels",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Decoded::Image(image)
            }
            Err(e) => {
                log::debug!("Skipping unreadable entry {}: {}", path.display(), e);
                Decoded::Unreadable(e.to_string())
            }
        }
    }

    fn save(&self, image: &RgbImage, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)?;
        image.save_with_format(path, format)?;
        log::debug!("Saved {} as {:?}", path.display(), format);
        Ok(())
    }
}
