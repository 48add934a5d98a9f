// water-marker/src/processors/compositor.rs
use image::{imageops, DynamicImage, RgbImage, RgbaImage};

pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Self
    }

    /// Pastes `destination` onto a fresh canvas, alpha-blends `overlay` at
    /// `position` and drops the alpha channel.
    ///
    /// Parts of the overlay falling outside the canvas are clipped.
    pub fn composite(
        &self,
        destination: &RgbaImage,
        overlay: &RgbaImage,
        position: (i64, i64),
    ) -> RgbImage {
        let mut canvas = RgbaImage::new(destination.width(), destination.height());
        imageops::replace(&mut canvas, destination, 0, 0);
        imageops::overlay(&mut canvas, overlay, position.0, position.1);

        DynamicImage::ImageRgba8(canvas).to_rgb8()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}
