//! Butt-weld elbow (bend).
//!
//! Local frame: the origin is the corner where the tangent lines of both
//! ends meet, local +Z is the bend-plane normal and the local bisector
//! `(1, 1, 0)` points from the corner toward the arc center. Each port sits
//! on its tangent line at `R * tan(BA / 2)` from the corner.

use crate::common::{clamp_wall, positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    ComponentFamily, PathPiece, PipeError, PipeResult, Point3, Ports, ShapeRequest, Vector3,
};
use std::f64::consts::{FRAC_PI_4, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angle at which the outer midpoint of the bend sits, measured about the
/// arc center from local +X.
const OUTER_MID_ANGLE: f64 = 5.0 * FRAC_PI_4;

/// Dimensions of an elbow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElbowDims {
    /// Nominal size label.
    pub size: String,
    /// Outside diameter.
    pub od: f64,
    /// Wall thickness.
    pub thk: f64,
    /// Deflection angle between the incoming and outgoing directions, in
    /// degrees, in `(0, 180)`.
    pub bend_angle: f64,
    /// Radius of the centerline arc.
    pub bend_radius: f64,
}

impl Default for ElbowDims {
    fn default() -> Self {
        Self::new("DN50", 60.3, 3.0, 90.0, 45.225)
    }
}

impl ElbowDims {
    /// Creates elbow dimensions.
    #[must_use]
    pub fn new(
        size: impl Into<String>,
        od: f64,
        thk: f64,
        bend_angle: f64,
        bend_radius: f64,
    ) -> Self {
        Self {
            size: size.into(),
            od,
            thk,
            bend_angle,
            bend_radius,
        }
    }

    /// Same section with a different bend angle, in degrees.
    #[must_use]
    pub fn with_bend_angle(mut self, bend_angle: f64) -> Self {
        self.bend_angle = bend_angle;
        self
    }

    /// Same section with a different bend radius.
    #[must_use]
    pub fn with_bend_radius(mut self, bend_radius: f64) -> Self {
        self.bend_radius = bend_radius;
        self
    }

    /// Distance from the corner to each port: `R * tan(BA / 2)`.
    #[must_use]
    pub fn corner_distance(&self) -> f64 {
        self.bend_radius * (self.bend_angle.to_radians() / 2.0).tan()
    }

    /// Center of the centerline arc in the local frame.
    #[must_use]
    pub fn arc_center(&self) -> Point3<f64> {
        let dist = self.bend_radius / (self.bend_angle.to_radians() / 2.0).cos();
        let u = FRAC_PI_4.cos() * dist;
        Point3::new(u, u, 0.0)
    }

    /// Outer-surface midpoint of the bend, its outward normal and the arc
    /// tangent there, all in the local frame.
    #[must_use]
    pub fn outer_midpoint(&self) -> (Point3<f64>, Vector3<f64>, Vector3<f64>) {
        let normal = Vector3::new(OUTER_MID_ANGLE.cos(), OUTER_MID_ANGLE.sin(), 0.0);
        let tangent = Vector3::new(-OUTER_MID_ANGLE.sin(), OUTER_MID_ANGLE.cos(), 0.0);
        let position = self.arc_center() + normal * (self.bend_radius + self.od / 2.0);
        (position, normal, tangent)
    }

    fn validate(&self) -> PipeResult<()> {
        positive("od", self.od)?;
        positive("bend_radius", self.bend_radius)?;
        if !(self.bend_angle > 0.0 && self.bend_angle < 180.0) {
            return Err(PipeError::dimension(
                "bend_angle",
                format!("must be in (0, 180) degrees, got {}", self.bend_angle),
            ));
        }
        Ok(())
    }
}

/// Outward port directions of a bend with deflection `bend_angle` (radians).
pub(crate) fn bend_directions(bend_angle: f64) -> (Vector3<f64>, Vector3<f64>) {
    let beta = (PI - bend_angle) / 2.0;
    let a0 = FRAC_PI_4 + beta;
    let a1 = FRAC_PI_4 - beta;
    (
        Vector3::new(a0.cos(), a0.sin(), 0.0),
        Vector3::new(a1.cos(), a1.sin(), 0.0),
    )
}

/// Deflection angle, in degrees, of a two-port bend measured from its port
/// directions: `180 - angle(d0, d1)`.
///
/// Returns `None` unless there are exactly two ports.
#[must_use]
pub fn measured_bend_angle(ports: &Ports) -> Option<f64> {
    match ports.directions() {
        [d0, d1] => Some(180.0 - d0.angle(d1).to_degrees()),
        _ => None,
    }
}

impl ComponentBuilder for ElbowDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Elbow
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        self.validate()?;
        let thk = clamp_wall(ComponentFamily::Elbow, self.od, self.thk, self.od / 2.0);
        let phi = self.bend_angle.to_radians();
        let (d0, d1) = bend_directions(phi);
        let reach = self.corner_distance();

        let mut ports = Ports::new();
        ports.push(Point3::from(d0 * reach), d0)?;
        ports.push(Point3::from(d1 * reach), d1)?;

        let arc = PathPiece::Arc {
            center: self.arc_center(),
            normal: Vector3::z_axis(),
            radius: self.bend_radius,
            start_angle: OUTER_MID_ANGLE - phi / 2.0,
            end_angle: OUTER_MID_ANGLE + phi / 2.0,
        };
        let solid = ShapeRequest::Sweep {
            radius: self.od / 2.0,
            path: vec![arc],
        };
        let shape = if thk < self.od / 2.0 {
            solid.hollow(thk)
        } else {
            solid
        };

        Ok(BuiltComponent::new(ComponentFamily::Elbow, &self.size, shape, ports)
            .with_profile(profile_label(self.od, thk)))
    }
}
