//! Simplified valve bodies.

use std::fmt;
use std::str::FromStr;

use crate::common::{positive, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, PipeError, PipeResult, Plane, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Valve type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValveKind {
    /// Ball valve.
    #[default]
    Ball,
    /// Globe valve.
    Globe,
    /// Gate valve.
    Gate,
    /// Butterfly valve.
    Butterfly,
    /// Check valve.
    Check,
}

impl ValveKind {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Globe => "globe",
            Self::Gate => "gate",
            Self::Butterfly => "butterfly",
            Self::Check => "check",
        }
    }

    /// Types drawn with a spherical body in the middle.
    #[must_use]
    pub const fn has_sphere(self) -> bool {
        matches!(self, Self::Ball | Self::Globe)
    }
}

impl fmt::Display for ValveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValveKind {
    type Err = PipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        [Self::Ball, Self::Globe, Self::Gate, Self::Butterfly, Self::Check]
            .into_iter()
            .find(|k| lower.contains(k.name()))
            .ok_or_else(|| PipeError::dimension("VType", format!("unknown valve type '{s}'")))
    }
}

/// Dimensions of a valve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValveDims {
    /// Nominal size label.
    pub size: String,
    /// Valve type.
    pub kind: ValveKind,
    /// Body outside diameter.
    pub od: f64,
    /// Bore diameter.
    pub id: f64,
    /// Face-to-face length.
    pub height: f64,
    /// Flow coefficient.
    pub kv: f64,
}

impl Default for ValveDims {
    fn default() -> Self {
        Self {
            size: "DN50".to_string(),
            kind: ValveKind::Ball,
            od: 72.0,
            id: 50.0,
            height: 40.0,
            kv: 150.0,
        }
    }
}

impl ComponentBuilder for ValveDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Valve
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let h = positive("height", self.height)?;

        let half = ShapeRequest::cone(od / 2.0, od / 5.0, h / 2.0, Point3::origin(), Vector3::z_axis());
        let mid = Plane {
            point: Point3::new(0.0, 0.0, h / 2.0),
            normal: Vector3::z_axis(),
        };
        let mut shape = half.clone().fuse(half.mirrored(mid));
        if self.kind.has_sphere() {
            shape = shape.fuse(ShapeRequest::Sphere {
                radius: (0.45 * h).min(od / 2.0),
                center: mid.point,
            });
        }

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, h), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Valve, &self.size, shape, ports)
            .with_profile(self.kind.name().to_string()))
    }
}
