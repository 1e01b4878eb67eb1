//! Threaded terminal adapter (hex body, cylindrical spigot, tapered thread).

use crate::common::{positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    ComponentFamily, Contour, PipeError, PipeResult, Point3, Ports, Profile, ShapeRequest, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half angle of the tapered pipe thread, in radians.
const THREAD_TAPER: f64 = 0.031_239_648_3;

/// Dimensions of a terminal adapter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerminalAdapterDims {
    /// Nominal size label.
    pub size: String,
    /// Spigot outside diameter.
    pub od: f64,
    /// Overall length.
    pub l: f64,
    /// Support width (spigot plus hex).
    pub sw: f64,
    /// Major thread diameter.
    pub od2: f64,
}

impl Default for TerminalAdapterDims {
    fn default() -> Self {
        Self {
            size: "PCV-1/2".to_string(),
            od: 21.3,
            l: 33.2,
            sw: 18.7,
            od2: 21.33,
        }
    }
}

impl TerminalAdapterDims {
    /// Thickness of the hex collar.
    #[must_use]
    pub fn hex_thickness(&self) -> f64 {
        self.sw / 5.0
    }

    /// Length of the threaded end.
    #[must_use]
    pub fn thread_length(&self) -> f64 {
        self.l - self.sw
    }

    fn thread(&self, scale: f64) -> ShapeRequest {
        let r1 = self.od2 / 2.0;
        let r2 = r1 - THREAD_TAPER.tan() * self.thread_length();
        ShapeRequest::cone(
            r1 * scale,
            r2 * scale,
            self.thread_length(),
            Point3::new(0.0, 0.0, -self.hex_thickness()),
            Vector3::z_axis(),
        )
    }
}

impl ComponentBuilder for TerminalAdapterDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::TerminalAdapter
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        positive("od2", self.od2)?;
        let sw = positive("sw", self.sw)?;
        if self.l <= sw {
            return Err(PipeError::dimension(
                "l",
                format!("overall length {} must exceed the support width {sw}", self.l),
            ));
        }
        let pt = self.hex_thickness();
        let below = Point3::new(0.0, 0.0, -pt);

        let spigot = ShapeRequest::cylinder(od / 2.0, sw - pt, below, -Vector3::z_axis());
        let hex = ShapeRequest::Prism {
            profile: Profile::solid(Contour::regular_polygon(6, 0.6 * od)),
            direction: Vector3::new(0.0, 0.0, -pt),
        };
        let shape = spigot.fuse(hex).fuse(self.thread(1.0)).cut(vec![
            ShapeRequest::cylinder(od / 3.0, sw, below, -Vector3::z_axis()),
            self.thread(0.8),
        ]);

        let mut ports = Ports::new();
        ports.push(Point3::new(0.0, 0.0, -sw), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, self.thread_length() - pt), Vector3::z())?;

        Ok(
            BuiltComponent::new(ComponentFamily::TerminalAdapter, &self.size, shape, ports)
                .with_profile(profile_label(od, self.od2)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ports_at_both_ends() {
        let dims = TerminalAdapterDims::default();
        let Ok(built) = dims.build() else {
            panic!("adapter should build");
        };
        let p = built.ports.positions();
        assert_relative_eq!(p[0].z, -18.7);
        assert_relative_eq!(p[1].z, 33.2 - 18.7 - 18.7 / 5.0, epsilon = 1e-12);
        assert_relative_eq!(built.ports.directions()[1].z, 1.0);
    }

    #[test]
    fn test_thread_tapers() {
        let ShapeRequest::Cone { radius1, radius2, .. } = TerminalAdapterDims::default().thread(1.0)
        else {
            panic!("thread is a cone");
        };
        assert!(radius2 < radius1);
    }
}
