//! Flanges: slip-on, weld-neck, socket-weld, lap-joint and blind.
//!
//! The flange face points to local -Z and the weld end to +Z. Where the
//! ports sit depends on the type:
//!
//! | Type  | Port 0 (face) | Port 1 (weld end) |
//! |-------|---------------|-------------------|
//! | WN    | `-trf`        | `T1 - trf`        |
//! | SW    | `-trf`        | `T1 - Y - trf`    |
//! | BL    | `-trf`        | `t`               |
//! | SO/LJ | `0`           | `trf`             |

use std::fmt;
use std::str::FromStr;

use crate::common::{non_negative, positive, BuiltComponent, ComponentBuilder};
use nalgebra::Point2;
use pipe_types::{
    Circle3, ComponentFamily, Contour, EdgeSelector, PipeError, PipeResult, Point3, Ports,
    Profile, ShapeRequest, Tolerances, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flange type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlangeKind {
    /// Slip-on.
    #[default]
    SlipOn,
    /// Weld-neck.
    WeldNeck,
    /// Socket-weld.
    SocketWeld,
    /// Lap-joint.
    LapJoint,
    /// Blind.
    Blind,
}

impl FlangeKind {
    /// Catalog code of the type.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SlipOn => "SO",
            Self::WeldNeck => "WN",
            Self::SocketWeld => "SW",
            Self::LapJoint => "LJ",
            Self::Blind => "BL",
        }
    }

    /// Types with a hub welded or fitted onto the pipe.
    #[must_use]
    pub const fn has_neck(self) -> bool {
        !matches!(self, Self::Blind)
    }
}

impl fmt::Display for FlangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FlangeKind {
    type Err = PipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SO" => Ok(Self::SlipOn),
            "WN" => Ok(Self::WeldNeck),
            "SW" => Ok(Self::SocketWeld),
            "LJ" => Ok(Self::LapJoint),
            "BL" => Ok(Self::Blind),
            other => Err(PipeError::dimension(
                "FlangeType",
                format!("unknown flange type '{other}'"),
            )),
        }
    }
}

/// Dimensions of a flange. Zero disables an optional feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlangeDims {
    /// Flange type.
    pub kind: FlangeKind,
    /// Nominal size label.
    pub size: String,
    /// Outside diameter of the disc.
    pub d_outer: f64,
    /// Bore diameter.
    pub bore: f64,
    /// Bolt circle diameter.
    pub df: f64,
    /// Bolt hole diameter.
    pub f: f64,
    /// Overall thickness including the raised face.
    pub t: f64,
    /// Number of bolt holes.
    pub n: u32,
    /// Raised face thickness.
    pub trf: f64,
    /// Raised face diameter. Zero means the face is not modeled, while
    /// `trf` still sets the port offsets.
    pub drf: f64,
    /// Weld-neck cone length.
    pub twn: f64,
    /// Weld-neck cone root diameter.
    pub dwn: f64,
    /// Neck outside diameter.
    pub odp: f64,
    /// Fillet radius at the neck root.
    pub r: f64,
    /// Length through hub.
    pub t1: f64,
    /// Socket bore diameter.
    pub b2: f64,
    /// Socket depth.
    pub y: f64,
}

impl Default for FlangeDims {
    fn default() -> Self {
        Self {
            kind: FlangeKind::SlipOn,
            size: "DN50".to_string(),
            d_outer: 160.0,
            bore: 60.3,
            df: 132.0,
            f: 14.0,
            t: 15.0,
            n: 4,
            trf: 0.0,
            drf: 0.0,
            twn: 0.0,
            dwn: 0.0,
            odp: 0.0,
            r: 0.0,
            t1: 0.0,
            b2: 0.0,
            y: 0.0,
        }
    }
}

impl FlangeDims {
    /// Same dimensions with a different type.
    #[must_use]
    pub fn with_kind(mut self, kind: FlangeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Axial positions of port 0 and port 1.
    #[must_use]
    pub fn port_offsets(&self) -> (f64, f64) {
        match self.kind {
            FlangeKind::WeldNeck => (-self.trf, self.t1 - self.trf),
            FlangeKind::SocketWeld => (-self.trf, self.t1 - self.y - self.trf),
            FlangeKind::Blind => (-self.trf, self.t),
            FlangeKind::SlipOn | FlangeKind::LapJoint => (0.0, self.trf),
        }
    }

    /// Centers of the bolt holes on the bolt circle, the first at half a
    /// pitch from +X.
    #[must_use]
    pub fn bolt_centers(&self) -> Vec<Point2<f64>> {
        if self.n == 0 {
            return Vec::new();
        }
        let pitch = 360.0 / f64::from(self.n);
        (0..self.n)
            .map(|i| {
                let a = (pitch / 2.0 + pitch * f64::from(i)).to_radians();
                Point2::new(self.df / 2.0 * a.cos(), self.df / 2.0 * a.sin())
            })
            .collect()
    }

    fn bored(&self, solid: ShapeRequest, height: f64, base: Point3<f64>, down: bool) -> ShapeRequest {
        if self.bore > 0.0 {
            let axis = if down { -Vector3::z_axis() } else { Vector3::z_axis() };
            solid.cut(vec![ShapeRequest::cylinder(self.bore / 2.0, height, base, axis)])
        } else {
            solid
        }
    }

    fn disc(&self, thickness: f64) -> ShapeRequest {
        let mut profile = Profile::solid(Contour::circle(self.d_outer / 2.0));
        if self.bore > 0.0 {
            profile = profile.with_hole(Contour::circle(self.bore / 2.0));
        }
        if self.f > 0.0 {
            for center in self.bolt_centers() {
                profile = profile.with_hole(Contour::Circle {
                    center,
                    radius: self.f / 2.0,
                });
            }
        }
        ShapeRequest::Prism {
            profile,
            direction: Vector3::new(0.0, 0.0, thickness),
        }
    }

    /// A raised face is modeled only with a positive thickness and a
    /// diameter inside the disc.
    fn has_raised_face(&self) -> bool {
        self.trf > 0.0 && self.drf > 0.0 && self.drf < self.d_outer
    }
}

impl ComponentBuilder for FlangeDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Flange
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let d_outer = positive("D", self.d_outer)?;
        non_negative("d", self.bore)?;
        non_negative("trf", self.trf)?;
        let plate = positive("t - trf", self.t - self.trf)?;
        if self.bore >= d_outer {
            return Err(PipeError::dimension(
                "d",
                format!("bore {} must be smaller than the disc {d_outer}", self.bore),
            ));
        }

        let origin = Point3::origin();
        let mut shape = self.disc(plate);

        if self.kind.has_neck() {
            let neck_len = self.t1 - self.trf;
            if self.odp > 0.0 && neck_len > 0.0 {
                let neck = ShapeRequest::z_cylinder(self.odp / 2.0, neck_len);
                shape = shape.fuse(self.bored(neck, neck_len, origin, false));
            }
            if self.has_raised_face() {
                let rf = ShapeRequest::cylinder(self.drf / 2.0, self.trf, origin, -Vector3::z_axis());
                shape = shape.fuse(self.bored(rf, self.trf, origin, true));
            }
        }

        match self.kind {
            FlangeKind::WeldNeck if self.dwn > 0.0 && self.twn > 0.0 && self.odp > 0.0 => {
                let root = Point3::new(0.0, 0.0, plate);
                let cone =
                    ShapeRequest::cone(self.dwn / 2.0, self.odp / 2.0, self.twn, root, Vector3::z_axis());
                shape = shape.fuse(self.bored(cone, self.twn, root, false));
                if self.r > 0.0 {
                    shape = shape.fillet(
                        self.r,
                        EdgeSelector::OnCircle {
                            circle: Circle3 {
                                center: root,
                                normal: Vector3::z_axis(),
                                radius: self.dwn / 2.0,
                            },
                            tolerance: Tolerances::standard().fillet_edge,
                        },
                    );
                }
            }
            FlangeKind::LapJoint if self.r > 0.0 && self.bore > 0.0 => {
                shape = shape.fillet(
                    self.r,
                    EdgeSelector::OnCircle {
                        circle: Circle3 {
                            center: origin,
                            normal: Vector3::z_axis(),
                            radius: self.bore / 2.0,
                        },
                        tolerance: Tolerances::standard().fillet_edge,
                    },
                );
            }
            FlangeKind::SocketWeld if self.b2 > 0.0 => {
                shape = shape.cut(vec![ShapeRequest::cylinder(
                    self.b2 / 2.0,
                    self.y,
                    Point3::new(0.0, 0.0, self.t1 - self.trf),
                    -Vector3::z_axis(),
                )]);
            }
            FlangeKind::Blind if self.has_raised_face() => {
                shape = shape.fuse(ShapeRequest::cylinder(
                    self.drf / 2.0,
                    self.trf,
                    origin,
                    -Vector3::z_axis(),
                ));
            }
            _ => {}
        }

        let (z0, z1) = self.port_offsets();
        let mut ports = Ports::new();
        ports.push(Point3::new(0.0, 0.0, z0), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, z1), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Flange, &self.size, shape, ports)
            .with_profile(self.kind.code().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raised() -> FlangeDims {
        FlangeDims {
            trf: 2.0,
            drf: 102.0,
            t1: 45.0,
            y: 16.0,
            ..FlangeDims::default()
        }
    }

    #[test]
    fn test_port_offsets_per_type() {
        let cases = [
            (FlangeKind::WeldNeck, -2.0, 43.0),
            (FlangeKind::SocketWeld, -2.0, 27.0),
            (FlangeKind::Blind, -2.0, 15.0),
            (FlangeKind::SlipOn, 0.0, 2.0),
            (FlangeKind::LapJoint, 0.0, 2.0),
        ];
        for (kind, z0, z1) in cases {
            let Ok(built) = raised().with_kind(kind).build() else {
                panic!("{kind} flange should build");
            };
            let p = built.ports.positions();
            assert_relative_eq!(p[0].z, z0);
            assert_relative_eq!(p[1].z, z1);
            assert_relative_eq!(built.ports.directions()[0].z, -1.0);
        }
    }

    #[test]
    fn test_bolt_holes_start_at_half_pitch() {
        let centers = FlangeDims::default().bolt_centers();
        assert_eq!(centers.len(), 4);
        let expected = 66.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(centers[0].x, expected, epsilon = 1e-9);
        assert_relative_eq!(centers[0].y, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_disc_profile_has_bore_and_bolts() {
        let Ok(built) = FlangeDims::default().build() else {
            panic!("default flange should build");
        };
        let ShapeRequest::Prism { profile, direction } = &built.shape else {
            panic!("plain slip-on flange is a single prism");
        };
        assert_eq!(profile.holes.len(), 5);
        assert_relative_eq!(direction.z, 15.0);
    }

    #[test]
    fn test_weld_neck_fillets_cone_root() {
        let dims = FlangeDims {
            kind: FlangeKind::WeldNeck,
            twn: 30.0,
            dwn: 88.0,
            odp: 60.3,
            r: 6.0,
            bore: 52.5,
            ..raised()
        };
        let Ok(built) = dims.build() else {
            panic!("weld-neck flange should build");
        };
        let ShapeRequest::Fillet { edges, .. } = &built.shape else {
            panic!("weld-neck flange should end in a fillet");
        };
        assert!(edges.matches(&Point3::new(44.0, 0.0, 13.0)));
    }

    #[test]
    fn test_raised_face_without_diameter_only_offsets_ports() {
        let dims = FlangeDims {
            kind: FlangeKind::WeldNeck,
            drf: 0.0,
            odp: 60.3,
            ..raised()
        };
        let Ok(built) = dims.build() else {
            panic!("weld-neck flange should build");
        };
        let below_face = |s: &ShapeRequest| {
            matches!(s, ShapeRequest::Cylinder { axis, .. } if axis.z < 0.0)
        };
        assert!(!built.shape.any(&below_face));
        assert_relative_eq!(built.ports.positions()[0].z, -2.0);
        let Ok(with_face) = raised().with_kind(FlangeKind::WeldNeck).build() else {
            panic!("weld-neck flange should build");
        };
        assert!(with_face.shape.any(&below_face));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("wn".parse::<FlangeKind>().ok(), Some(FlangeKind::WeldNeck));
        assert!("XX".parse::<FlangeKind>().is_err());
    }

    #[test]
    fn test_invalid_thickness_rejected() {
        let dims = FlangeDims {
            trf: 20.0,
            ..FlangeDims::default()
        };
        assert!(dims.build().is_err_and(|e| e.is_dimension()));
    }
}
