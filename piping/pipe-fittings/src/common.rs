//! Shared builder output and dimension checks.

use pipe_types::{ComponentFamily, PipeError, PipeResult, Ports, ShapeRequest};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The result of running a builder: a solid recipe plus its ports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuiltComponent {
    /// Family tag.
    pub family: ComponentFamily,
    /// Nominal size label, e.g. `"DN50"`.
    pub size: String,
    /// Section label, e.g. `"60.3x3"`, when the family has one.
    pub profile: Option<String>,
    /// Solid recipe in the local frame.
    pub shape: ShapeRequest,
    /// Ports in the local frame.
    pub ports: Ports,
}

impl BuiltComponent {
    pub(crate) fn new(
        family: ComponentFamily,
        size: &str,
        shape: ShapeRequest,
        ports: Ports,
    ) -> Self {
        Self {
            family,
            size: size.to_string(),
            profile: None,
            shape,
            ports,
        }
    }

    pub(crate) fn with_profile(mut self, profile: String) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Builds one component from its dimension record.
///
/// Builders are stateless: every call yields an independent instance.
pub trait ComponentBuilder {
    /// Family of the built component.
    fn family(&self) -> ComponentFamily;

    /// Nominal size label.
    fn size(&self) -> &str;

    /// Builds the solid recipe and ports.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::DimensionInconsistency`] when the record cannot
    /// describe a physical part. Recoverable inconsistencies are clamped with
    /// a warning instead.
    fn build(&self) -> PipeResult<BuiltComponent>;
}

/// Requires `value > 0`.
pub(crate) fn positive(field: &str, value: f64) -> PipeResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PipeError::dimension(field, format!("must be positive, got {value}")))
    }
}

/// Requires `value >= 0`.
pub(crate) fn non_negative(field: &str, value: f64) -> PipeResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PipeError::dimension(field, format!("must not be negative, got {value}")))
    }
}

/// Clamps a wall thickness to `limit` when it exceeds `od / 2`.
pub(crate) fn clamp_wall(family: ComponentFamily, od: f64, thk: f64, limit: f64) -> f64 {
    if thk > od / 2.0 {
        warn!(%family, od, thk, clamped = limit, "Wall thickness exceeds radius, clamping");
        limit
    } else {
        thk
    }
}

/// `"{a}x{b}"` section label.
pub(crate) fn profile_label(a: f64, b: f64) -> String {
    format!("{a}x{b}")
}
