// water-marker/src/core/geometry.rs
//! Resolution of the optional offset/scale factors into one concrete policy each.
//!
//! Factors arrive as percentages and are stored as fractional multipliers.
//! A factor of `0` is treated exactly like an absent one.

/// How the overlay is resized relative to each destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingPolicy {
    /// Width becomes `factor * destination width`, height keeps the overlay aspect.
    UniformBounded(f64),
    /// Width and height follow their own destination-relative factors.
    WidthAndHeightBounded(f64, f64),
    /// Width follows the destination width, height keeps the overlay aspect.
    WidthBounded(f64),
    /// Height follows the destination height, width keeps the overlay aspect.
    HeightBounded(f64),
    Unscaled,
}

/// How far the overlay sits from the reference corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetPolicy {
    /// Same offset on both axes, measured against the destination width.
    CornerOffset(f64),
    /// Horizontal offset from the width, vertical offset from the height.
    AxisOffsets(f64, f64),
    /// Horizontal factor mirrored to the vertical axis.
    HorizontalOnly(f64),
    /// Vertical factor mirrored to the horizontal axis.
    VerticalOnly(f64),
    NoOffset,
}

/// Offset factors as supplied, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawOffsets {
    pub corner: Option<f64>,
    pub horizontal: Option<f64>,
    pub vertical: Option<f64>,
}

/// Scale factors as supplied, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawScales {
    pub bounded: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Offsets in whole pixels for one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelOffsets {
    pub x: i64,
    pub y: i64,
}

/// The resolved policies for a run. Built once, then shared by every job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub sizing: SizingPolicy,
    pub offset: OffsetPolicy,
}

impl Geometry {
    pub fn resolve(offsets: RawOffsets, scales: RawScales) -> Self {
        Self {
            sizing: SizingPolicy::resolve(scales),
            offset: OffsetPolicy::resolve(offsets),
        }
    }
}

fn effective(percent: Option<f64>) -> Option<f64> {
    percent.filter(|v| *v != 0.0).map(|v| v / 100.0)
}

/// Rounds to the nearest pixel, ties to even.
pub fn round_px(value: f64) -> i64 {
    value.round_ties_even() as i64
}

fn round_dim(value: f64) -> u32 {
    round_px(value).clamp(1, u32::MAX as i64) as u32
}

impl SizingPolicy {
    pub fn resolve(raw: RawScales) -> Self {
        let bounded = effective(raw.bounded);
        let width = effective(raw.width);
        let height = effective(raw.height);

        match (bounded, width, height) {
            (Some(f), _, _) => SizingPolicy::UniformBounded(f),
            (None, Some(w), Some(h)) => SizingPolicy::WidthAndHeightBounded(w, h),
            (None, Some(w), None) => SizingPolicy::WidthBounded(w),
            (None, None, Some(h)) => SizingPolicy::HeightBounded(h),
            (None, None, None) => SizingPolicy::Unscaled,
        }
    }

    /// Target overlay dimensions for a destination. Never smaller than 1x1.
    pub fn target_dimensions(&self, overlay: (u32, u32), destination: (u32, u32)) -> (u32, u32) {
        let (ow, oh) = (overlay.0 as f64, overlay.1 as f64);
        let (dw, dh) = (destination.0 as f64, destination.1 as f64);

        match *self {
            SizingPolicy::UniformBounded(f) | SizingPolicy::WidthBounded(f) => {
                let width = round_dim(dw * f);
                (width, round_dim(width as f64 * (oh / ow)))
            }
            SizingPolicy::WidthAndHeightBounded(wf, hf) => (round_dim(dw * wf), round_dim(dh * hf)),
            SizingPolicy::HeightBounded(f) => {
                let height = round_dim(dh * f);
                (round_dim(height as f64 * (ow / oh)), height)
            }
            SizingPolicy::Unscaled => overlay,
        }
    }
}

impl OffsetPolicy {
    pub fn resolve(raw: RawOffsets) -> Self {
        let corner = effective(raw.corner);
        let horizontal = effective(raw.horizontal);
        let vertical = effective(raw.vertical);

        match (corner, horizontal, vertical) {
            (Some(f), _, _) => OffsetPolicy::CornerOffset(f),
            (None, Some(h), Some(v)) => OffsetPolicy::AxisOffsets(h, v),
            (None, Some(h), None) => OffsetPolicy::HorizontalOnly(h),
            (None, None, Some(v)) => OffsetPolicy::VerticalOnly(v),
            (None, None, None) => OffsetPolicy::NoOffset,
        }
    }

    /// Pixel offsets measured against the destination, never the overlay.
    pub fn pixel_offsets(&self, destination: (u32, u32)) -> PixelOffsets {
        let (dw, dh) = (destination.0 as f64, destination.1 as f64);

        match *self {
            OffsetPolicy::CornerOffset(f) | OffsetPolicy::HorizontalOnly(f) => {
                let both = round_px(dw * f);
                PixelOffsets { x: both, y: both }
            }
            OffsetPolicy::AxisOffsets(h, v) => PixelOffsets {
                x: round_px(dw * h),
                y: round_px(dh * v),
            },
            OffsetPolicy::VerticalOnly(f) => {
                let both = round_px(dh * f);
                PixelOffsets { x: both, y: both }
            }
            OffsetPolicy::NoOffset => PixelOffsets::default(),
        }
    }
}
