//! Branch outlets (weldolet/sockolet), straight or 45-degree lateral.
//!
//! The body base sits on the `z = 0` attachment plane. A lateral outlet is
//! built upright, extended below the plane, tilted 45 degrees about X and
//! clipped back to `z >= 0`, so its footprint is a full ellipse.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};
use std::fmt;

use crate::common::{positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    ComponentFamily, Isometry3, PipeResult, Point3, Ports, ShapeRequest, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Connection of the outlet to the branch pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutletEnd {
    /// Butt weld.
    #[default]
    ButtWeld,
    /// Socket weld.
    SocketWeld,
}

impl OutletEnd {
    /// Parses `"BW"`/`"ButtWeld"` and `"SW"`/`"SocketWeld"`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "BW" | "ButtWeld" => Some(Self::ButtWeld),
            "SW" | "SocketWeld" => Some(Self::SocketWeld),
            _ => None,
        }
    }
}

impl fmt::Display for OutletEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ButtWeld => "BW",
            Self::SocketWeld => "SW",
        })
    }
}

/// Angle between the outlet and its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutletAngle {
    /// Perpendicular to the host surface.
    #[default]
    Straight,
    /// 45-degree lateral.
    Lateral,
}

impl OutletAngle {
    /// Angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Straight => 0,
            Self::Lateral => 45,
        }
    }
}

/// Dimensions of a branch outlet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutletDims {
    /// Nominal size label of the branch.
    pub size: String,
    /// Schedule or class, e.g. `"Sch-STD"`.
    pub rating: String,
    /// Branch pipe outside diameter.
    pub od: f64,
    /// Branch pipe wall thickness.
    pub thk: f64,
    /// Body height.
    pub a: f64,
    /// Base diameter.
    pub b: f64,
    /// End connection.
    pub end: OutletEnd,
    /// Angle to the host.
    pub angle: OutletAngle,
    /// Socket bottom height; zero derives it from `a`.
    pub e: f64,
}

impl Default for OutletDims {
    fn default() -> Self {
        Self {
            size: "DN50".to_string(),
            rating: "Sch-STD".to_string(),
            od: 60.32,
            thk: 3.91,
            a: 45.0,
            b: 70.0,
            end: OutletEnd::ButtWeld,
            angle: OutletAngle::Straight,
            e: 0.0,
        }
    }
}

impl OutletDims {
    /// Same outlet with a different angle.
    #[must_use]
    pub fn with_angle(mut self, angle: OutletAngle) -> Self {
        self.angle = angle;
        self
    }

    /// Same outlet with a different end connection.
    #[must_use]
    pub fn with_end(mut self, end: OutletEnd) -> Self {
        self.end = end;
        self
    }

    /// Socket bottom height: `min(E, A - 0.5)` when given, else `0.3 * A`.
    #[must_use]
    pub fn socket_depth(&self) -> f64 {
        if self.e > 0.0 {
            self.e.min(self.a - 0.5)
        } else {
            self.a * 0.3
        }
    }

    /// Depth the upright body extends below the attachment plane.
    #[must_use]
    pub fn extension(&self) -> f64 {
        match self.angle {
            OutletAngle::Straight => 0.0,
            OutletAngle::Lateral => self.b / 2.0 * FRAC_PI_4.tan(),
        }
    }

    /// Height of the port along the outlet axis.
    fn port_height(&self) -> f64 {
        match self.end {
            OutletEnd::ButtWeld => self.a,
            OutletEnd::SocketWeld => self.socket_depth(),
        }
    }

    fn upright_body(&self) -> ShapeRequest {
        let (r_id, r_od, r_b) = (self.od / 2.0 - self.thk, self.od / 2.0, self.b / 2.0);
        let h_ext = self.extension();
        let z_axis = Vector3::z_axis();
        match self.end {
            OutletEnd::ButtWeld => {
                let cone = ShapeRequest::cone(r_b, r_od, self.a, Point3::origin(), z_axis);
                let outer = if h_ext > 0.0 {
                    ShapeRequest::cylinder(r_b, h_ext + 0.5, Point3::new(0.0, 0.0, -(h_ext + 0.5)), z_axis)
                        .fuse(cone)
                } else {
                    cone
                };
                outer.cut(vec![ShapeRequest::cylinder(
                    r_id,
                    self.a + h_ext + 1.0,
                    Point3::new(0.0, 0.0, -(h_ext + 0.5)),
                    z_axis,
                )])
            }
            OutletEnd::SocketWeld => {
                let e = self.socket_depth();
                ShapeRequest::cylinder(r_b, self.a + h_ext, Point3::new(0.0, 0.0, -h_ext), z_axis).cut(
                    vec![
                        ShapeRequest::cylinder(
                            r_id,
                            e + h_ext + 0.5,
                            Point3::new(0.0, 0.0, -(h_ext + 0.5)),
                            z_axis,
                        ),
                        ShapeRequest::cylinder(r_od, self.a - e + 0.5, Point3::new(0.0, 0.0, e), z_axis),
                    ],
                )
            }
        }
    }
}

impl ComponentBuilder for OutletDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Outlet
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        positive("od", self.od)?;
        positive("a", self.a)?;
        positive("b", self.b)?;
        positive("id", self.od - 2.0 * self.thk)?;

        let body = self.upright_body();
        let h = self.port_height();
        let mut ports = Ports::new();
        let shape = match self.angle {
            OutletAngle::Straight => {
                ports.push(Point3::new(0.0, 0.0, h), Vector3::z())?;
                body
            }
            OutletAngle::Lateral => {
                let big = 4.0 * self.b.max(self.a);
                let tilt = Isometry3::rotation(Vector3::x() * FRAC_PI_4);
                let clip = ShapeRequest::Cuboid {
                    corner: Point3::new(-big, -big, 0.0),
                    size: Vector3::new(2.0 * big, 2.0 * big, big + 1.0),
                };
                let s = FRAC_1_SQRT_2;
                ports.push(Point3::new(0.0, -h * s, h * s), Vector3::new(0.0, -s, s))?;
                body.transformed(tilt).common(clip)
            }
        };

        Ok(BuiltComponent::new(ComponentFamily::Outlet, &self.size, shape, ports)
            .with_profile(profile_label(self.od, self.thk)))
    }
}
