//! Numeric tolerances shared by builders, placement and routing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerances used for geometric decisions.
///
/// # Example
///
/// ```
/// use pipe_types::Tolerances;
///
/// let tol = Tolerances::default().with_coincidence(1e-4);
/// assert!((tol.coincidence - 1e-4).abs() < 1e-15);
/// assert!(tol.validate().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tolerances {
    /// Two unit vectors are parallel when the norm of their cross product is
    /// below this value.
    pub parallel: f64,
    /// Two points coincide when their distance is below this value (mm).
    pub coincidence: f64,
    /// Residual `|target - d|` below which two unit directions are treated
    /// as identical during mating.
    pub aligned: f64,
    /// Distance band for matching edge midpoints against a surface (mm).
    pub fillet_edge: f64,
    /// Smallest length a straight member may be trimmed to (mm).
    pub min_length: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::standard()
    }
}

impl Tolerances {
    /// Standard tolerances for millimetre models.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            parallel: 1e-6,
            coincidence: 1e-6,
            aligned: 1e-9,
            fillet_edge: 0.5,
            min_length: 1e-6,
        }
    }

    /// Looser tolerances for paths drawn by hand or imported with rounding.
    #[must_use]
    pub const fn relaxed() -> Self {
        Self {
            parallel: 1e-4,
            coincidence: 1e-3,
            aligned: 1e-9,
            fillet_edge: 0.5,
            min_length: 1e-3,
        }
    }

    /// Sets the parallelism tolerance.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: f64) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the point coincidence tolerance.
    #[must_use]
    pub const fn with_coincidence(mut self, coincidence: f64) -> Self {
        self.coincidence = coincidence;
        self
    }

    /// Sets the fillet edge matching band.
    #[must_use]
    pub const fn with_fillet_edge(mut self, fillet_edge: f64) -> Self {
        self.fillet_edge = fillet_edge;
        self
    }

    /// Sets the minimum trimmed length.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    /// Returns a list of problems with these tolerances (empty if valid).
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [
            ("parallel", self.parallel),
            ("coincidence", self.coincidence),
            ("aligned", self.aligned),
            ("fillet_edge", self.fillet_edge),
            ("min_length", self.min_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                problems.push(format!("{name} must be positive and finite"));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(Tolerances::standard().validate().is_empty());
        assert!(Tolerances::relaxed().validate().is_empty());
        assert!(Tolerances::relaxed().parallel > Tolerances::standard().parallel);
    }

    #[test]
    fn test_invalid() {
        let tol = Tolerances::default().with_parallel(0.0).with_min_length(f64::NAN);
        assert_eq!(tol.validate().len(), 2);
    }
}
