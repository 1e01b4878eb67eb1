//! U-bolt pipe clamp.

use std::f64::consts::PI;

use crate::common::{positive, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, PathPiece, PipeError, PipeResult, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a U-bolt. The bow is a half circle in the XY plane above
/// the origin and the legs run toward -Y.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UBoltDims {
    /// Nominal size label of the clamped pipe.
    pub size: String,
    /// Clamp standard, e.g. `"DIN-UBolt"`.
    pub clamp_type: String,
    /// Inside width between the legs.
    pub c: f64,
    /// Overall height.
    pub h: f64,
    /// Rod diameter.
    pub d: f64,
}

impl Default for UBoltDims {
    fn default() -> Self {
        Self {
            size: "DN50".to_string(),
            clamp_type: "DIN-UBolt".to_string(),
            c: 76.0,
            h: 109.0,
            d: 10.0,
        }
    }
}

impl UBoltDims {
    /// Thread designation derived from the rod diameter.
    #[must_use]
    pub fn thread(&self) -> String {
        format!("M{}", self.d)
    }

    /// Centerline of the rod: leg up, bow across, leg down.
    #[must_use]
    pub fn centerline(&self) -> Vec<PathPiece> {
        let r = self.c / 2.0;
        let foot = r - self.h;
        vec![
            PathPiece::Line {
                start: Point3::new(r, foot, 0.0),
                end: Point3::new(r, 0.0, 0.0),
            },
            PathPiece::Arc {
                center: Point3::origin(),
                normal: Vector3::z_axis(),
                radius: r,
                start_angle: 0.0,
                end_angle: PI,
            },
            PathPiece::Line {
                start: Point3::new(-r, 0.0, 0.0),
                end: Point3::new(-r, foot, 0.0),
            },
        ]
    }
}

impl ComponentBuilder for UBoltDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::UBolt
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let c = positive("c", self.c)?;
        let d = positive("d", self.d)?;
        if self.h <= c / 2.0 {
            return Err(PipeError::dimension(
                "h",
                format!("height {} must exceed half the width {c}", self.h),
            ));
        }
        let shape = ShapeRequest::Sweep {
            radius: d / 2.0,
            path: self.centerline(),
        };

        let mut ports = Ports::new();
        ports.push(Point3::new(0.0, 0.0, 1.0), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::UBolt, &self.size, shape, ports)
            .with_profile(self.thread()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centerline_is_continuous() {
        let path = UBoltDims::default().centerline();
        let ends: Vec<(Point3<f64>, Point3<f64>)> = path
            .iter()
            .map(|piece| match *piece {
                PathPiece::Line { start, end } => (start, end),
                PathPiece::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    ..
                } => (
                    center + Vector3::new(start_angle.cos(), start_angle.sin(), 0.0) * radius,
                    center + Vector3::new(end_angle.cos(), end_angle.sin(), 0.0) * radius,
                ),
            })
            .collect();
        for pair in ends.windows(2) {
            assert_relative_eq!(pair[0].1, pair[1].0, epsilon = 1e-9);
        }
        assert_relative_eq!(ends[0].0.y, 38.0 - 109.0);
    }

    #[test]
    fn test_thread_label() {
        let Ok(built) = UBoltDims::default().build() else {
            panic!("u-bolt should build");
        };
        assert_eq!(built.profile.as_deref(), Some("M10"));
        assert_eq!(built.ports.len(), 1);
    }
}
