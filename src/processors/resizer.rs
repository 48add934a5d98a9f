// water-marker/src/processors/resizer.rs
use crate::core::{OverlayError, Result, SizingPolicy};
use image::{imageops, imageops::FilterType, Limits, RgbaImage};

/// Rescales the overlay for one destination size. Bicubic interpolation.
///
/// Targets beyond `limits` (dimensions or RGBA allocation) are refused
/// before any buffer is allocated.
pub fn rescale_overlay(
    overlay: &RgbaImage,
    destination: (u32, u32),
    policy: &SizingPolicy,
    limits: &Limits,
) -> Result<RgbaImage> {
    let (width, height) = policy.target_dimensions(overlay.dimensions(), destination);

    if (width, height) == overlay.dimensions() {
        log::debug!("Overlay dimensions unchanged, skipping resize");
        return Ok(overlay.clone());
    }

    check_target(width, height, limits)?;

    log::debug!(
        "Resizing overlay from {}x{} to {}x{}",
        overlay.width(),
        overlay.height(),
        width,
        height
    );

    Ok(imageops::resize(overlay, width, height, FilterType::CatmullRom))
}

fn check_target(width: u32, height: u32, limits: &Limits) -> Result<()> {
    let too_wide = limits.max_image_width.is_some_and(|max| width > max);
    let too_tall = limits.max_image_height.is_some_and(|max| height > max);
    if too_wide || too_tall {
        return Err(OverlayError::MemoryLimitExceeded(format!(
            "Rescaled overlay {}x{} exceeds the maximum image dimensions",
            width, height
        )));
    }

    let bytes = width as u64 * height as u64 * 4;
    if let Some(max_alloc) = limits.max_alloc {
        if bytes > max_alloc {
            return Err(OverlayError::MemoryLimitExceeded(format!(
                "Rescaled overlay {}x{} needs {} bytes, limit is {}",
                width, height, bytes, max_alloc
            )));
        }
    }

    Ok(())
}

struct CacheEntry {
    destination: (u32, u32),
    overlay: RgbaImage,
}

/// Single-slot cache of the last rescaled overlay, keyed by destination size.
///
/// Only valid under sequential access: the slot is replaced on every miss.
#[derive(Default)]
pub struct ResizeCache {
    entry: Option<CacheEntry>,
    limits: Limits,
    hits: usize,
    misses: usize,
}

impl ResizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn get_or_compute(
        &mut self,
        destination: (u32, u32),
        policy: &SizingPolicy,
        overlay: &RgbaImage,
    ) -> Result<&RgbaImage> {
        let entry = match self.entry.take() {
            Some(entry) if entry.destination == destination => {
                self.hits += 1;
                entry
            }
            _ => {
                self.misses += 1;
                CacheEntry {
                    destination,
                    overlay: rescale_overlay(overlay, destination, policy, &self.limits)?,
                }
            }
        };

        Ok(&self.entry.insert(entry).overlay)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn cached_size(&self) -> Option<(u32, u32)> {
        self.entry.as_ref().map(|e| e.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn overlay() -> RgbaImage {
        RgbaImage::from_fn(100, 50, |x, y| Rgba([(x * 2) as u8, (y * 5) as u8, 128, 200]))
    }

    fn rescale(destination: (u32, u32), policy: &SizingPolicy) -> RgbaImage {
        rescale_overlay(&overlay(), destination, policy, &Limits::default()).unwrap()
    }

    #[test]
    fn test_uniform_rescale_keeps_aspect() {
        let resized = rescale((1000, 500), &SizingPolicy::UniformBounded(0.1));
        assert_eq!(resized.dimensions(), (100, 50));

        let resized = rescale((400, 400), &SizingPolicy::UniformBounded(0.1));
        assert_eq!(resized.dimensions(), (40, 20));
    }

    #[test]
    fn test_width_and_height_ignore_aspect() {
        let resized = rescale((200, 400), &SizingPolicy::WidthAndHeightBounded(0.5, 0.5));
        assert_eq!(resized.dimensions(), (100, 200));
    }

    #[test]
    fn test_oversized_target_rejected() {
        // 400% of a 100000x100000 destination
        let result = rescale_overlay(
            &RgbaImage::new(10, 10),
            (100_000, 100_000),
            &SizingPolicy::UniformBounded(4.0),
            &Limits::default(),
        );
        assert!(matches!(result, Err(OverlayError::MemoryLimitExceeded(_))));
    }

    #[test]
    fn test_target_beyond_max_dimensions_rejected() {
        let mut limits = Limits::default();
        limits.max_image_width = Some(500);
        limits.max_image_height = Some(500);

        let result = rescale_overlay(
            &overlay(),
            (80, 60),
            &SizingPolicy::UniformBounded(10.0),
            &limits,
        );
        assert!(matches!(result, Err(OverlayError::MemoryLimitExceeded(_))));

        let resized = rescale_overlay(&overlay(), (40, 30), &SizingPolicy::UniformBounded(10.0), &limits)
            .unwrap();
        assert_eq!(resized.dimensions(), (400, 200));
    }

    #[test]
    fn test_cache_hit_on_same_size() {
        let source = overlay();
        let policy = SizingPolicy::UniformBounded(0.1);
        let mut cache = ResizeCache::new();

        let first = cache.get_or_compute((800, 600), &policy, &source).unwrap().clone();
        let second = cache.get_or_compute((800, 600), &policy, &source).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_cache_miss_on_size_change() {
        let source = overlay();
        let policy = SizingPolicy::UniformBounded(0.1);
        let mut cache = ResizeCache::new();

        cache.get_or_compute((800, 600), &policy, &source).unwrap();
        let resized = cache.get_or_compute((400, 300), &policy, &source).unwrap().clone();

        assert_eq!(resized.dimensions(), (40, 20));
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.cached_size(), Some((400, 300)));
    }

    #[test]
    fn test_cache_rejection_leaves_slot_empty() {
        let source = overlay();
        let policy = SizingPolicy::UniformBounded(10.0);
        let mut limits = Limits::default();
        limits.max_image_width = Some(500);
        limits.max_image_height = Some(500);
        let mut cache = ResizeCache::with_limits(limits);

        assert!(cache.get_or_compute((80, 60), &policy, &source).is_err());
        assert_eq!(cache.cached_size(), None);

        let resized = cache.get_or_compute((40, 30), &policy, &source).unwrap();
        assert_eq!(resized.dimensions(), (400, 200));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_cached_equals_direct() {
        let source = overlay();
        let policy = SizingPolicy::HeightBounded(0.25);
        let mut cache = ResizeCache::new();

        for size in [(640, 480), (640, 480), (300, 900), (640, 480)] {
            let cached = cache.get_or_compute(size, &policy, &source).unwrap().clone();
            assert_eq!(cached, rescale(size, &policy));
        }
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 3);
    }
}
