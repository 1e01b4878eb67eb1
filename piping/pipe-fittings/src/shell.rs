//! Rectangular tank shell: open lateral walls plus a top plate.

use crate::common::{positive, BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, PipeError, PipeResult, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a tank shell with one corner at the origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShellDims {
    /// Length along X.
    pub l: f64,
    /// Width along Y.
    pub w: f64,
    /// Height along Z.
    pub h: f64,
    /// Wall thickness.
    pub thk1: f64,
    /// Top plate thickness.
    pub thk2: f64,
}

impl Default for ShellDims {
    fn default() -> Self {
        Self {
            l: 800.0,
            w: 400.0,
            h: 500.0,
            thk1: 6.0,
            thk2: 8.0,
        }
    }
}

impl ComponentBuilder for ShellDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Shell
    }

    fn size(&self) -> &str {
        ""
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let l = positive("L", self.l)?;
        let w = positive("W", self.w)?;
        let h = positive("H", self.h)?;
        let t1 = positive("thk1", self.thk1)?;
        let t2 = positive("thk2", self.thk2)?;
        if 2.0 * t1 >= l.min(w) || 2.0 * t2 >= h {
            return Err(PipeError::dimension(
                "thk1",
                format!("walls {t1}/{t2} leave no room inside {l}x{w}x{h}"),
            ));
        }

        let walls = ShapeRequest::Cuboid {
            corner: Point3::origin(),
            size: Vector3::new(l, w, h),
        }
        .cut(vec![ShapeRequest::Cuboid {
            corner: Point3::new(t1, t1, 0.0),
            size: Vector3::new(l - 2.0 * t1, w - 2.0 * t1, h),
        }]);
        let top = ShapeRequest::Cuboid {
            corner: Point3::new(t1, t1, h - 2.0 * t2),
            size: Vector3::new(l - 2.0 * t1, w - 2.0 * t1, t2),
        };
        let shape = ShapeRequest::Compound(vec![walls, top]);

        Ok(
            BuiltComponent::new(ComponentFamily::Shell, "", shape, Ports::new())
                .with_profile(format!("{l}x{w}x{h}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_has_no_ports() {
        let Ok(built) = ShellDims::default().build() else {
            panic!("shell should build");
        };
        assert!(built.ports.is_empty());
        assert!(!built.family.has_ports());
        assert!(matches!(&built.shape, ShapeRequest::Compound(parts) if parts.len() == 2));
        assert_eq!(built.profile.as_deref(), Some("800x400x500"));
    }

    #[test]
    fn test_walls_too_thick() {
        let dims = ShellDims {
            thk1: 250.0,
            ..ShellDims::default()
        };
        assert!(dims.build().is_err_and(|e| e.is_dimension()));
    }
}
