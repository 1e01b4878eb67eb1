//! Straight pipe.

use crate::common::{clamp_wall, positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, PipeResult, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a straight pipe.
///
/// # Example
///
/// ```
/// use pipe_fittings::{ComponentBuilder, PipeDims};
///
/// let built = PipeDims::new("DN50", 60.3, 3.0, 1000.0).build().unwrap();
/// assert_eq!(built.ports.len(), 2);
/// assert_eq!(built.profile.as_deref(), Some("60.3x3"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipeDims {
    /// Nominal size label.
    pub size: String,
    /// Outside diameter.
    pub od: f64,
    /// Wall thickness.
    pub thk: f64,
    /// Length along local Z.
    pub height: f64,
}

impl Default for PipeDims {
    fn default() -> Self {
        Self::new("DN50", 60.3, 3.0, 1000.0)
    }
}

impl PipeDims {
    /// Creates pipe dimensions.
    #[must_use]
    pub fn new(size: impl Into<String>, od: f64, thk: f64, height: f64) -> Self {
        Self {
            size: size.into(),
            od,
            thk,
            height,
        }
    }

    /// Same section with a different length.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Wall thickness after clamping to the radius.
    #[must_use]
    pub fn effective_thk(&self) -> f64 {
        clamp_wall(ComponentFamily::Pipe, self.od, self.thk, self.od / 2.0)
    }

    /// Inside diameter.
    #[must_use]
    pub fn id(&self) -> f64 {
        self.od - 2.0 * self.effective_thk()
    }
}

impl ComponentBuilder for PipeDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Pipe
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let height = positive("height", self.height)?;
        let thk = self.effective_thk();
        let id = od - 2.0 * thk;

        let outer = ShapeRequest::z_cylinder(od / 2.0, height);
        let shape = if id > 0.0 {
            outer.cut(vec![ShapeRequest::z_cylinder(id / 2.0, height)])
        } else {
            outer
        };

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, height), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Pipe, &self.size, shape, ports)
            .with_profile(profile_label(od, thk)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ports() {
        let built = PipeDims::default().build();
        let Ok(built) = built else {
            panic!("pipe should build");
        };
        assert_relative_eq!(built.ports.positions()[1].z, 1000.0);
        assert_relative_eq!(built.ports.directions()[0].z, -1.0);
        assert_relative_eq!(built.ports.directions()[1].z, 1.0);
        assert!(matches!(built.shape, ShapeRequest::Difference { .. }));
    }

    #[test]
    fn test_thick_wall_clamped_to_solid_bar() {
        let dims = PipeDims::new("DN15", 21.3, 15.0, 100.0);
        assert_relative_eq!(dims.effective_thk(), 10.65);
        assert_relative_eq!(dims.id(), 0.0);
        let built = dims.build();
        assert!(built.is_ok_and(|b| matches!(b.shape, ShapeRequest::Cylinder { .. })));
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = PipeDims::default().with_height(0.0).build();
        assert!(result.is_err_and(|e| e.is_dimension()));
    }
}
