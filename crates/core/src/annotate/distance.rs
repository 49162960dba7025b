use crate::shared::constants::{FOCAL_LENGTH_PX, REFERENCE_WIDTH_M};

/// Estimated distance to a detected object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    Meters(f64),
    /// Degenerate box width; no estimate possible.
    Unknown,
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distance::Meters(m) => write!(f, "{m:.2} meters"),
            Distance::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Pinhole-camera distance heuristic.
///
/// `distance = reference_width * focal_length / pixel_width`. This is a
/// rough estimate: a fixed assumed object width, no occlusion handling, no
/// error bars.
#[derive(Clone, Copy, Debug)]
pub struct DistanceEstimator {
    focal_length_px: f64,
    reference_width_m: f64,
}

impl DistanceEstimator {
    pub fn new(focal_length_px: f64, reference_width_m: f64) -> Self {
        Self {
            focal_length_px,
            reference_width_m,
        }
    }

    /// Estimate distance from a box's apparent pixel width.
    ///
    /// Non-positive widths yield [`Distance::Unknown`], never a division
    /// error.
    pub fn estimate(&self, pixel_width: f64) -> Distance {
        if pixel_width <= 0.0 {
            return Distance::Unknown;
        }
        Distance::Meters(self.reference_width_m * self.focal_length_px / pixel_width)
    }
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self::new(FOCAL_LENGTH_PX, REFERENCE_WIDTH_M)
    }
}
