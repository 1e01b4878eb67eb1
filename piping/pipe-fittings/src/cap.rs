//! Butt-weld end cap.

use crate::common::{clamp_wall, positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, EdgeSelector, PipeResult, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a dished cap. The open end sits at the origin and the dome
/// extends toward +Z.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapDims {
    /// Nominal size label.
    pub size: String,
    /// Outside diameter.
    pub od: f64,
    /// Shell thickness.
    pub thk: f64,
}

impl Default for CapDims {
    fn default() -> Self {
        Self::new("DN50", 60.3, 3.0)
    }
}

impl CapDims {
    /// Creates cap dimensions.
    #[must_use]
    pub fn new(size: impl Into<String>, od: f64, thk: f64) -> Self {
        Self {
            size: size.into(),
            od,
            thk,
        }
    }

    /// Shell thickness after clamping; an oversized wall becomes `OD / 2.1`.
    #[must_use]
    pub fn effective_thk(&self) -> f64 {
        clamp_wall(ComponentFamily::Cap, self.od, self.thk, self.od / 2.1)
    }
}

impl ComponentBuilder for CapDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Cap
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let d = positive("od", self.od)?;
        let s = self.effective_thk();

        let drop = 0.55 * d - 6.0 * s;
        let dome = ShapeRequest::Sphere {
            radius: 0.8 * d,
            center: Point3::new(0.0, 0.0, -drop),
        }
        .common(ShapeRequest::cylinder(
            d / 2.0,
            1.7 * d,
            Point3::new(0.0, 0.0, -(drop + 1.0)),
            Vector3::z_axis(),
        ))
        .fillet(d / 6.5, EdgeSelector::All)
        .cut(vec![ShapeRequest::cylinder(
            1.1 * d,
            2.0 * d,
            Point3::origin(),
            -Vector3::z_axis(),
        )]);
        let shape = dome.hollow(s);

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Cap, &self.size, shape, ports)
            .with_profile(profile_label(d, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_port_faces_open_end() {
        let Ok(built) = CapDims::default().build() else {
            panic!("cap should build");
        };
        assert_eq!(built.ports.len(), 1);
        assert_relative_eq!(built.ports.directions()[0].z, -1.0);
        assert!(matches!(built.shape, ShapeRequest::Hollow { .. }));
    }

    #[test]
    fn test_oversized_wall_clamped() {
        let dims = CapDims::new("DN50", 60.3, 40.0);
        assert_relative_eq!(dims.effective_thk(), 60.3 / 2.1);
    }
}
