// water-marker/src/core/mod.rs
pub mod geometry;
pub mod placement;
pub mod processor;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use geometry::{Geometry, OffsetPolicy, PixelOffsets, SizingPolicy};
pub use placement::compute_placement;

/// Default output template: a sibling `overlaid` folder inside each input folder.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{input_folder}/overlaid";

/// Corner of the destination the overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ReferenceCorner {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceCorner::TopLeft => "top-left",
            ReferenceCorner::TopRight => "top-right",
            ReferenceCorner::BottomLeft => "bottom-left",
            ReferenceCorner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ReferenceCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw run configuration. Factors are percentages; `None` and `Some(0.0)`
/// are indistinguishable once resolved.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub overlay_path: PathBuf,
    pub input_folders: Vec<PathBuf>,
    pub output_template: String,
    pub corner: ReferenceCorner,
    pub corner_offset_factor: Option<f64>,
    pub border_offset_factor_horizontal: Option<f64>,
    pub border_offset_factor_vertical: Option<f64>,
    pub overlay_bounded_scale_factor: Option<f64>,
    pub overlay_width_bounded_scale_factor: Option<f64>,
    pub overlay_height_bounded_scale_factor: Option<f64>,
    pub max_dimensions: Option<(u32, u32)>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            overlay_path: PathBuf::new(),
            input_folders: Vec::new(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            corner: ReferenceCorner::default(),
            corner_offset_factor: None,
            border_offset_factor_horizontal: None,
            border_offset_factor_vertical: None,
            overlay_bounded_scale_factor: None,
            overlay_width_bounded_scale_factor: None,
            overlay_height_bounded_scale_factor: None,
            max_dimensions: Some((100_000, 100_000)),
        }
    }
}

impl OverlayConfig {
    /// Checks the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        let factors = [
            ("corner-offset-factor", self.corner_offset_factor),
            ("border-offset-factor-horizontal", self.border_offset_factor_horizontal),
            ("border-offset-factor-vertical", self.border_offset_factor_vertical),
            ("overlay-bounded-scale-factor", self.overlay_bounded_scale_factor),
            ("overlay-width-bounded-scale-factor", self.overlay_width_bounded_scale_factor),
            ("overlay-height-bounded-scale-factor", self.overlay_height_bounded_scale_factor),
        ];

        for (name, value) in factors {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(OverlayError::InvalidParameter(format!(
                        "'{}' must be a non-negative percentage, got {}",
                        name, v
                    )));
                }
            }
        }

        let geometry = self.geometry();

        if geometry.offset == OffsetPolicy::NoOffset {
            return Err(OverlayError::Configuration(
                "At least one of 'corner-offset-factor', 'border-offset-factor-horizontal' \
                 or 'border-offset-factor-vertical' must be specified"
                    .to_string(),
            ));
        }

        if geometry.sizing == SizingPolicy::Unscaled {
            return Err(OverlayError::Configuration(
                "At least one of 'overlay-bounded-scale-factor', \
                 'overlay-width-bounded-scale-factor' or \
                 'overlay-height-bounded-scale-factor' must be specified"
                    .to_string(),
            ));
        }

        if self.input_folders.is_empty() {
            return Err(OverlayError::Configuration(
                "At least one input folder must be specified".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolves the raw factors into the run's single sizing and offset policy.
    pub fn geometry(&self) -> Geometry {
        Geometry::resolve(
            geometry::RawOffsets {
                corner: self.corner_offset_factor,
                horizontal: self.border_offset_factor_horizontal,
                vertical: self.border_offset_factor_vertical,
            },
            geometry::RawScales {
                bounded: self.overlay_bounded_scale_factor,
                width: self.overlay_width_bounded_scale_factor,
                height: self.overlay_height_bounded_scale_factor,
            },
        )
    }
}

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid overlay image: {0}")]
    InvalidOverlay(String),

    #[error("Invalid output folder template: {0}")]
    InvalidTemplate(String),

    #[error("Memory limit exceeded: {0}")]
    MemoryLimitExceeded(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;

pub fn validate_config(config: &OverlayConfig) -> Result<()> {
    config.validate()
}
