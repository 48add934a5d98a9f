// water-marker/src/core/placement.rs
use super::geometry::PixelOffsets;
use super::ReferenceCorner;

/// Top-left paste coordinate of the overlay on a destination.
///
/// No clamping: an oversized overlay or a large offset yields coordinates
/// partly or fully outside the canvas, including negative ones.
pub fn compute_placement(
    destination: (u32, u32),
    overlay: (u32, u32),
    corner: ReferenceCorner,
    offsets: PixelOffsets,
) -> (i64, i64) {
    let (dw, dh) = (destination.0 as i64, destination.1 as i64);
    let (ow, oh) = (overlay.0 as i64, overlay.1 as i64);

    let right = dw - ow - offsets.x;
    let bottom = dh - oh - offsets.y;

    match corner {
        ReferenceCorner::TopLeft => (offsets.x, offsets.y),
        ReferenceCorner::TopRight => (right, offsets.y),
        ReferenceCorner::BottomLeft => (offsets.x, bottom),
        ReferenceCorner::BottomRight => (right, bottom),
    }
}
