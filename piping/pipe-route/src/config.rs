//! Section parameters shared by every component a line generates.
//!
//! # Example
//!
//! ```
//! use pipe_route::LineParams;
//!
//! let params = LineParams::new("DN80", 88.9, 5.49).with_rating("SCH-40");
//! assert!((params.bend_radius() - 0.75 * 88.9).abs() < 1e-12);
//!
//! // Changing the diameter resets the bend radius.
//! let params = params.with_bend_radius(200.0).with_outer_diameter(114.3);
//! assert!((params.bend_radius() - 0.75 * 114.3).abs() < 1e-12);
//! ```

use pipe_fittings::{ElbowDims, PipeDims};
use pipe_types::{PipeError, PipeResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bend radius as a multiple of the outside diameter when none is given.
pub const DEFAULT_BEND_RATIO: f64 = 0.75;

/// Size, rating and section of a pipe line or branch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineParams {
    /// Nominal size label.
    size: String,
    /// Schedule or pressure rating label.
    rating: String,
    /// Outside diameter.
    od: f64,
    /// Wall thickness.
    thk: f64,
    /// Centerline radius of generated bends.
    bend_radius: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self::new("DN50", 60.3, 3.0)
    }
}

impl LineParams {
    /// Creates parameters with the default bend radius and rating.
    #[must_use]
    pub fn new(size: impl Into<String>, od: f64, thk: f64) -> Self {
        Self {
            size: size.into(),
            rating: "SCH-STD".to_string(),
            od,
            thk,
            bend_radius: DEFAULT_BEND_RATIO * od,
        }
    }

    /// Sets the rating label.
    #[must_use]
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    /// Sets the outside diameter and resets the bend radius to match it.
    #[must_use]
    pub fn with_outer_diameter(mut self, od: f64) -> Self {
        self.od = od;
        self.bend_radius = DEFAULT_BEND_RATIO * od;
        self
    }

    /// Sets the wall thickness.
    #[must_use]
    pub fn with_thickness(mut self, thk: f64) -> Self {
        self.thk = thk;
        self
    }

    /// Sets the bend radius.
    #[must_use]
    pub fn with_bend_radius(mut self, bend_radius: f64) -> Self {
        self.bend_radius = bend_radius;
        self
    }

    /// Get the size label.
    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Get the rating label.
    #[must_use]
    pub fn rating(&self) -> &str {
        &self.rating
    }

    /// Get the outside diameter.
    #[must_use]
    pub const fn outer_diameter(&self) -> f64 {
        self.od
    }

    /// Get the wall thickness.
    #[must_use]
    pub const fn thickness(&self) -> f64 {
        self.thk
    }

    /// Get the bend radius.
    #[must_use]
    pub const fn bend_radius(&self) -> f64 {
        self.bend_radius
    }

    /// Checks the section before components are built from it.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::DimensionInconsistency`] for a non-positive
    /// diameter, thickness or bend radius.
    pub fn validate(&self) -> PipeResult<()> {
        for (field, value) in [
            ("od", self.od),
            ("thk", self.thk),
            ("bend_radius", self.bend_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipeError::dimension(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Pipe of this section with the given length.
    #[must_use]
    pub fn pipe(&self, height: f64) -> PipeDims {
        PipeDims::new(self.size.clone(), self.od, self.thk, height)
    }

    /// Elbow of this section and bend radius, turning `angle` degrees.
    #[must_use]
    pub fn elbow(&self, angle: f64) -> ElbowDims {
        ElbowDims::new(
            self.size.clone(),
            self.od,
            self.thk,
            angle,
            self.bend_radius,
        )
    }
}
