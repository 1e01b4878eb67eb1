//! Socket-weld fittings: elbow, tee and cap.
//!
//! Letters follow the ASME B16.11 tables: `A` center to socket face, `C`
//! socket wall, `D` bore, `E` center to socket bottom, `G` body wall.

use crate::common::{non_negative, positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    ComponentFamily, PipeError, PipeResult, Point3, Ports, ShapeRequest, Unit, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lip left around a reducing branch bore.
const REDUCING_LIP: f64 = 3.0;

/// Requires the socket face to lie beyond the socket bottom.
fn socket_depth(a: f64, e: f64, c: f64) -> PipeResult<f64> {
    let depth = a - (e - c);
    if depth > 0.0 {
        Ok(depth)
    } else {
        Err(PipeError::dimension(
            "a",
            format!("socket face {a} must lie beyond the socket bottom {e} minus wall {c}"),
        ))
    }
}

/// Radii and lengths shared by every arm of a socket fitting.
struct ArmSection {
    body_r: f64,
    bore_r: f64,
    socket_r: f64,
    boss_r: f64,
    e: f64,
    c: f64,
    depth: f64,
}

impl ArmSection {
    /// Body arm plus socket boss along `dir`, as outer and bore parts.
    fn along(&self, dir: Unit<Vector3<f64>>) -> (Vec<ShapeRequest>, Vec<ShapeRequest>) {
        let origin = Point3::origin();
        let v = dir.into_inner();
        let outer = vec![
            ShapeRequest::cylinder(self.body_r, self.e, origin, dir),
            ShapeRequest::cylinder(self.boss_r, self.depth, origin + v * (self.e - self.c), dir),
        ];
        let inner = vec![
            ShapeRequest::cylinder(self.bore_r, self.e, origin, dir),
            ShapeRequest::cylinder(self.socket_r, self.depth, origin + v * self.e, dir),
        ];
        (outer, inner)
    }
}

fn union_of(parts: Vec<ShapeRequest>) -> ShapeRequest {
    ShapeRequest::Union(parts)
}

/// Dimensions of a socket-weld elbow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SocketElbowDims {
    /// Nominal size label.
    pub size: String,
    /// Outside diameter of the connecting pipe.
    pub od: f64,
    /// Bend angle in degrees.
    pub bend_angle: f64,
    /// Center to outer socket face.
    pub a: f64,
    /// Socket wall thickness.
    pub c: f64,
    /// Bore diameter.
    pub d: f64,
    /// Center to socket bottom.
    pub e: f64,
    /// Body wall thickness.
    pub g: f64,
}

impl Default for SocketElbowDims {
    fn default() -> Self {
        Self {
            size: "DN25".to_string(),
            od: 33.4,
            bend_angle: 90.0,
            a: 35.0,
            c: 5.0,
            d: 25.4,
            e: 22.0,
            g: 5.455,
        }
    }
}

impl SocketElbowDims {
    /// Same fitting with a different bend angle, in degrees.
    #[must_use]
    pub fn with_bend_angle(mut self, bend_angle: f64) -> Self {
        self.bend_angle = bend_angle;
        self
    }

    /// Outward direction of port 1.
    #[must_use]
    pub fn second_direction(&self) -> Vector3<f64> {
        let ba = self.bend_angle.to_radians();
        Vector3::new(-ba.cos(), ba.sin(), 0.0)
    }
}

impl ComponentBuilder for SocketElbowDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::SocketElbow
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let d = positive("d", self.d)?;
        let e = positive("e", self.e)?;
        let c = non_negative("c", self.c)?;
        let g = non_negative("g", self.g)?;
        if !(self.bend_angle > 0.0 && self.bend_angle < 180.0) {
            return Err(PipeError::dimension(
                "bend_angle",
                format!("must be in (0, 180) degrees, got {}", self.bend_angle),
            ));
        }
        let depth = socket_depth(self.a, e, c)?;

        let body_r = d / 2.0 + g;
        let d1 = self.second_direction();
        let mut outer = vec![ShapeRequest::Sphere {
            radius: body_r,
            center: Point3::origin(),
        }];
        let mut inner = vec![ShapeRequest::Sphere {
            radius: d / 2.0,
            center: Point3::origin(),
        }];
        let section = ArmSection {
            body_r,
            bore_r: d / 2.0,
            socket_r: od / 2.0,
            boss_r: od / 2.0 + c,
            e,
            c,
            depth,
        };
        for dir in [Vector3::x_axis(), Unit::new_normalize(d1)] {
            let (o, i) = section.along(dir);
            outer.extend(o);
            inner.extend(i);
        }
        let shape = union_of(outer).cut(vec![union_of(inner)]);

        let mut ports = Ports::new();
        ports.push(Point3::new(e, 0.0, 0.0), Vector3::x())?;
        ports.push(Point3::from(d1 * e), d1)?;

        Ok(
            BuiltComponent::new(ComponentFamily::SocketElbow, &self.size, shape, ports)
                .with_profile(profile_label(od, c)),
        )
    }
}

/// Dimensions of a socket-weld tee.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SocketTeeDims {
    /// Nominal size label of the run.
    pub size: String,
    /// Outside diameter of the run pipes.
    pub od: f64,
    /// Outside diameter of the branch pipe.
    pub od2: f64,
    /// Center to outer socket face.
    pub a: f64,
    /// Socket wall thickness.
    pub c: f64,
    /// Bore diameter at the center.
    pub d: f64,
    /// Center to socket bottom.
    pub e: f64,
    /// Body wall thickness.
    pub g: f64,
}

impl Default for SocketTeeDims {
    fn default() -> Self {
        Self {
            size: "DN25".to_string(),
            od: 33.4,
            od2: 33.4,
            a: 35.0,
            c: 5.0,
            d: 25.4,
            e: 22.0,
            g: 4.55,
        }
    }
}

impl SocketTeeDims {
    /// Returns `true` when the branch is smaller than the run.
    #[must_use]
    pub fn is_reducing(&self) -> bool {
        (self.od - self.od2).abs() > f64::EPSILON
    }
}

impl ComponentBuilder for SocketTeeDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::SocketTee
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let od2 = positive("od2", self.od2)?;
        let d = positive("d", self.d)?;
        let e = positive("e", self.e)?;
        let c = non_negative("c", self.c)?;
        let g = non_negative("g", self.g)?;
        let depth = socket_depth(self.a, e, c)?;

        let body_r = d / 2.0 + g;
        let branch_bore = if self.is_reducing() {
            positive("od2", od2 / 2.0 - REDUCING_LIP)?
        } else {
            d / 2.0
        };

        let mut outer = vec![ShapeRequest::cylinder(
            body_r,
            2.0 * e,
            Point3::new(0.0, 0.0, -e),
            Vector3::z_axis(),
        )];
        let mut inner = vec![ShapeRequest::cylinder(
            d / 2.0,
            2.0 * e,
            Point3::new(0.0, 0.0, -e),
            Vector3::z_axis(),
        )];
        let origin = Point3::origin();
        for dir in [Vector3::z_axis(), -Vector3::z_axis()] {
            let v = dir.into_inner();
            outer.push(ShapeRequest::cylinder(od / 2.0 + c, depth, origin + v * (e - c), dir));
            inner.push(ShapeRequest::cylinder(od / 2.0, depth, origin + v * e, dir));
        }
        let branch = ArmSection {
            body_r,
            bore_r: branch_bore,
            socket_r: od2 / 2.0,
            boss_r: od / 2.0 + c,
            e,
            c,
            depth,
        };
        let (o, i) = branch.along(Vector3::y_axis());
        outer.extend(o);
        inner.extend(i);
        let shape = union_of(outer).cut(vec![union_of(inner)]);

        let mut ports = Ports::new();
        ports.push(Point3::new(0.0, 0.0, -e), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, e), Vector3::z())?;
        ports.push(Point3::new(0.0, e, 0.0), Vector3::y())?;

        Ok(
            BuiltComponent::new(ComponentFamily::SocketTee, &self.size, shape, ports)
                .with_profile(profile_label(od, od2)),
        )
    }
}

/// Dimensions of a socket-weld cap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SocketCapDims {
    /// Nominal size label.
    pub size: String,
    /// Outside diameter of the connecting pipe.
    pub od: f64,
    /// Overall length.
    pub a: f64,
    /// Socket wall thickness.
    pub c: f64,
    /// Socket depth.
    pub e: f64,
}

impl Default for SocketCapDims {
    fn default() -> Self {
        Self {
            size: "DN25".to_string(),
            od: 33.4,
            a: 25.0,
            c: 5.0,
            e: 13.0,
        }
    }
}

impl ComponentBuilder for SocketCapDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::SocketCap
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let a = positive("a", self.a)?;
        let c = positive("c", self.c)?;
        let e = positive("e", self.e)?;
        if e >= a {
            return Err(PipeError::dimension(
                "e",
                format!("socket depth {e} must be shorter than the cap length {a}"),
            ));
        }
        let shape = ShapeRequest::z_cylinder(od / 2.0 + c, a)
            .cut(vec![ShapeRequest::z_cylinder(od / 2.0, e)]);

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;

        Ok(
            BuiltComponent::new(ComponentFamily::SocketCap, &self.size, shape, ports)
                .with_profile(profile_label(od, c)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_socket_elbow_ports() {
        let Ok(built) = SocketElbowDims::default().build() else {
            panic!("socket elbow should build");
        };
        let p = built.ports.positions();
        let d = built.ports.directions();
        assert_relative_eq!(p[0], Point3::new(22.0, 0.0, 0.0));
        assert_relative_eq!(p[1], Point3::new(0.0, 22.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(d[1].into_inner(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_socket_elbow_45() {
        let dims = SocketElbowDims::default().with_bend_angle(45.0);
        let Ok(built) = dims.build() else {
            panic!("45 degree socket elbow should build");
        };
        let d = built.ports.directions();
        assert_relative_eq!(d[0].angle(&d[1]).to_degrees(), 135.0, epsilon = 1e-9);
    }

    #[test]
    fn test_socket_face_before_bottom_rejected() {
        let dims = SocketElbowDims {
            a: 10.0,
            ..SocketElbowDims::default()
        };
        assert!(dims.build().is_err_and(|e| e.is_dimension()));
    }

    #[test]
    fn test_socket_tee_ports() {
        let Ok(built) = SocketTeeDims::default().build() else {
            panic!("socket tee should build");
        };
        let p = built.ports.positions();
        assert_relative_eq!(p[0].z, -22.0);
        assert_relative_eq!(p[1].z, 22.0);
        assert_relative_eq!(p[2].y, 22.0);
    }

    #[test]
    fn test_reducing_socket_tee_bore() {
        let dims = SocketTeeDims {
            od2: 26.7,
            ..SocketTeeDims::default()
        };
        assert!(dims.is_reducing());
        let Ok(built) = dims.build() else {
            panic!("reducing socket tee should build");
        };
        let bore = 26.7 / 2.0 - 3.0;
        assert!(built.shape.any(&|s| matches!(
            s,
            ShapeRequest::Cylinder { radius, axis, .. }
                if (radius - bore).abs() < 1e-12 && axis.y > 0.5
        )));
    }

    #[test]
    fn test_socket_cap() {
        let Ok(built) = SocketCapDims::default().build() else {
            panic!("socket cap should build");
        };
        assert_eq!(built.ports.len(), 1);
        assert_relative_eq!(built.ports.directions()[0].z, -1.0);
    }
}
