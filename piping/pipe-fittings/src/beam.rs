//! Structural beams: a section profile extruded along local Z.

use std::fmt;

use crate::common::{positive, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, Contour, PipeResult, Point3, Ports, Profile, ShapeRequest, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Section shape code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BeamProfile {
    /// I/H double-T section.
    H,
    /// Solid rectangle.
    R,
    /// Rectangular hollow section.
    RH,
    /// Channel open to +X.
    U,
    /// Angle with the heel at the origin.
    L,
    /// Tee with the flange on `y = 0`.
    T,
    /// Solid round bar; `h` is the diameter.
    Circle,
    /// Unrecognized code, drawn as a solid rectangle.
    Other(String),
}

impl BeamProfile {
    /// Parses a profile code as stored in section tables.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "H" => Self::H,
            "R" => Self::R,
            "RH" => Self::RH,
            "U" => Self::U,
            "L" => Self::L,
            "T" => Self::T,
            "C" | "circle" => Self::Circle,
            other => Self::Other(other.to_string()),
        }
    }

    /// Code as stored in section tables.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::H => "H",
            Self::R => "R",
            Self::RH => "RH",
            Self::U => "U",
            Self::L => "L",
            Self::T => "T",
            Self::Circle => "circle",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for BeamProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dimensions of a beam.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeamDims {
    /// Section standard, e.g. `"HEA"`.
    pub rating: String,
    /// Section designation, e.g. `"HEA200"`.
    pub size: String,
    /// Section shape.
    pub profile: BeamProfile,
    /// Section height.
    pub h: f64,
    /// Section width.
    pub w: f64,
    /// Web or wall thickness.
    pub ta: f64,
    /// Flange thickness.
    pub tf: f64,
    /// Beam length.
    pub height: f64,
}

impl Default for BeamDims {
    fn default() -> Self {
        Self {
            rating: "HEA".to_string(),
            size: "HEA200".to_string(),
            profile: BeamProfile::H,
            h: 190.0,
            w: 200.0,
            ta: 6.5,
            tf: 10.0,
            height: 1000.0,
        }
    }
}

/// Rectangle centered on the origin.
fn rectangle(w: f64, h: f64) -> Contour {
    Contour::polygon(&[
        (-w / 2.0, -h / 2.0),
        (w / 2.0, -h / 2.0),
        (w / 2.0, h / 2.0),
        (-w / 2.0, h / 2.0),
    ])
}

impl BeamDims {
    /// Same section with a different length.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Cross-section face in the local XY plane.
    #[must_use]
    pub fn section(&self) -> Profile {
        let (h, w, ta, tf) = (self.h, self.w, self.ta, self.tf);
        let (hw, ww) = (h / 2.0, w / 2.0);
        match &self.profile {
            BeamProfile::Circle => Profile::solid(Contour::circle(h / 2.0)),
            BeamProfile::R => Profile::solid(rectangle(w, h)),
            BeamProfile::RH => {
                Profile::solid(rectangle(w, h)).with_hole(rectangle(w - 2.0 * ta, h - 2.0 * ta))
            }
            BeamProfile::H => Profile::solid(Contour::polygon(&[
                (-ww, -hw),
                (ww, -hw),
                (ww, -hw + tf),
                (ta / 2.0, -hw + tf),
                (ta / 2.0, hw - tf),
                (ww, hw - tf),
                (ww, hw),
                (-ww, hw),
                (-ww, hw - tf),
                (-ta / 2.0, hw - tf),
                (-ta / 2.0, -hw + tf),
                (-ww, -hw + tf),
            ])),
            BeamProfile::U => Profile::solid(Contour::polygon(&[
                (-ww, -hw),
                (ww, -hw),
                (ww, -hw + tf),
                (-ww + ta, -hw + tf),
                (-ww + ta, hw - tf),
                (ww, hw - tf),
                (ww, hw),
                (-ww, hw),
            ])),
            BeamProfile::L => Profile::solid(Contour::polygon(&[
                (0.0, 0.0),
                (w, 0.0),
                (w, tf),
                (ta, tf),
                (ta, h),
                (0.0, h),
            ])),
            BeamProfile::T => Profile::solid(Contour::polygon(&[
                (-ww, 0.0),
                (ww, 0.0),
                (ww, tf),
                (ta / 2.0, tf),
                (ta / 2.0, h),
                (-ta / 2.0, h),
                (-ta / 2.0, tf),
                (-ww, tf),
            ])),
            BeamProfile::Other(code) => {
                warn!(code = %code, size = %self.size, "Unknown beam profile, using solid rectangle");
                Profile::solid(rectangle(w, h))
            }
        }
    }
}

impl ComponentBuilder for BeamDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Beam
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        positive("H", self.h)?;
        if self.profile != BeamProfile::Circle {
            positive("W", self.w)?;
        }
        let height = positive("Height", self.height)?;
        let shape = ShapeRequest::Prism {
            profile: self.section(),
            direction: Vector3::new(0.0, 0.0, height),
        };

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, height), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Beam, &self.size, shape, ports)
            .with_profile(self.profile.code().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertex_count(profile: &Profile) -> usize {
        match &profile.outer {
            Contour::Polygon(points) => points.len(),
            Contour::Circle { .. } => 0,
        }
    }

    #[test]
    fn test_section_outlines() {
        let mut dims = BeamDims::default();
        assert_eq!(vertex_count(&dims.section()), 12);
        dims.profile = BeamProfile::U;
        assert_eq!(vertex_count(&dims.section()), 8);
        dims.profile = BeamProfile::L;
        assert_eq!(vertex_count(&dims.section()), 6);
        dims.profile = BeamProfile::RH;
        assert_eq!(dims.section().holes.len(), 1);
        dims.profile = BeamProfile::Circle;
        assert!(matches!(dims.section().outer, Contour::Circle { radius, .. } if radius == 95.0));
    }

    #[test]
    fn test_unknown_code_falls_back_to_rectangle() {
        let dims = BeamDims {
            profile: BeamProfile::from_code("Z"),
            ..BeamDims::default()
        };
        assert_eq!(dims.profile, BeamProfile::Other("Z".to_string()));
        assert_eq!(vertex_count(&dims.section()), 4);
    }

    #[test]
    fn test_ports() {
        let Ok(built) = BeamDims::default().with_height(2500.0).build() else {
            panic!("beam should build");
        };
        assert_relative_eq!(built.ports.positions()[1].z, 2500.0);
        assert_eq!(built.profile.as_deref(), Some("H"));
    }
}
