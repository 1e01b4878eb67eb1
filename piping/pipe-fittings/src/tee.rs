//! Butt-weld tee, straight or reducing.
//!
//! The run lies on local Z between `-C` and `+C`; the branch leaves the
//! origin along +Y and ends at `M`.

use crate::common::{clamp_wall, positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    ComponentFamily, CylinderSurface, EdgeSelector, Plane, PipeResult, Point3, Ports,
    ShapeRequest, Tolerances, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gap between the run surface and the crotch torus of a straight tee.
const CROTCH_OFFSET: f64 = 1.0;

/// Dimensions of a tee. Missing branch values fall back to the run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TeeDims {
    /// Nominal size label of the run.
    pub size: String,
    /// Run outside diameter.
    pub od: f64,
    /// Branch outside diameter.
    pub od2: Option<f64>,
    /// Run wall thickness.
    pub thk: f64,
    /// Branch wall thickness.
    pub thk2: Option<f64>,
    /// Half length of the run.
    pub c: f64,
    /// Distance from the run axis to the branch end.
    pub m: Option<f64>,
}

impl Default for TeeDims {
    fn default() -> Self {
        Self::new("DN150", 168.27, 7.11, 178.0).with_branch(168.27, 7.11, 178.0)
    }
}

impl TeeDims {
    /// Equal tee; the branch takes the run dimensions.
    #[must_use]
    pub fn new(size: impl Into<String>, od: f64, thk: f64, c: f64) -> Self {
        Self {
            size: size.into(),
            od,
            od2: None,
            thk,
            thk2: None,
            c,
            m: None,
        }
    }

    /// Sets the branch diameter, thickness and length.
    #[must_use]
    pub fn with_branch(mut self, od2: f64, thk2: f64, m: f64) -> Self {
        self.od2 = Some(od2);
        self.thk2 = Some(thk2);
        self.m = Some(m);
        self
    }

    /// Branch outside diameter after defaulting.
    #[must_use]
    pub fn branch_od(&self) -> f64 {
        self.od2.filter(|v| *v > 0.0).unwrap_or(self.od)
    }

    /// Branch wall thickness after defaulting.
    #[must_use]
    pub fn branch_thk(&self) -> f64 {
        self.thk2.filter(|v| *v > 0.0).unwrap_or(self.thk)
    }

    /// Branch length after defaulting.
    #[must_use]
    pub fn branch_length(&self) -> f64 {
        self.m.filter(|v| *v > 0.0).unwrap_or(self.c)
    }

    /// Fillet radius used at the run/branch intersection of a reducing tee.
    #[must_use]
    pub fn fillet_radius(&self) -> f64 {
        self.branch_length() / 2.0 - self.od / 4.0
    }

    /// Torus crotch filling the junction of a straight tee on the `+z` side,
    /// fused with its mirror image across `z = 0`.
    fn crotch(&self) -> ShapeRequest {
        let k = (self.od + CROTCH_OFFSET) / 2.0;
        let torus = ShapeRequest::Torus {
            major_radius: k,
            minor_radius: self.od / 2.0,
            center: Point3::new(0.0, k, -k),
            axis: Vector3::x_axis(),
        }
        .common(ShapeRequest::Cuboid {
            corner: Point3::new(-self.od / 2.0, 0.0, -k),
            size: Vector3::new(self.od, k, k),
        });
        let filler = ShapeRequest::Cuboid {
            corner: Point3::new(-self.od / 2.0, 0.0, 0.0),
            size: Vector3::new(self.od, k, k),
        }
        .cut(vec![ShapeRequest::cylinder(
            k,
            self.od,
            Point3::new(-self.od / 2.0, k, k),
            Vector3::x_axis(),
        )]);
        let quarter = torus.fuse(filler);
        quarter.clone().fuse(quarter.mirrored(Plane::xy()))
    }
}

impl ComponentBuilder for TeeDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Tee
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let c = positive("c", self.c)?;
        let od2 = self.branch_od();
        let m = self.branch_length();
        let thk = clamp_wall(ComponentFamily::Tee, od, self.thk, od / 2.0);
        let thk2 = clamp_wall(ComponentFamily::Tee, od2, self.branch_thk(), od2 / 2.0);

        let run_base = Point3::new(0.0, 0.0, -c);
        let body = ShapeRequest::cylinder(od / 2.0, 2.0 * c, run_base, Vector3::z_axis()).fuse(
            ShapeRequest::cylinder(od2 / 2.0, m, Point3::origin(), Vector3::y_axis()),
        );
        let mut bores = Vec::new();
        if od / 2.0 - thk > 0.0 {
            bores.push(ShapeRequest::cylinder(
                od / 2.0 - thk,
                2.0 * c,
                run_base,
                Vector3::z_axis(),
            ));
        }
        if od2 / 2.0 - thk2 > 0.0 {
            bores.push(ShapeRequest::cylinder(
                od2 / 2.0 - thk2,
                m,
                Point3::origin(),
                Vector3::y_axis(),
            ));
        }

        let shape = if m == c {
            body.fuse(self.crotch()).cut(bores)
        } else {
            let edges = EdgeSelector::OnBothCylinders {
                first: CylinderSurface {
                    axis_point: Point3::origin(),
                    axis: Vector3::z_axis(),
                    radius: od / 2.0,
                },
                second: CylinderSurface {
                    axis_point: Point3::origin(),
                    axis: Vector3::y_axis(),
                    radius: od2 / 2.0,
                },
                tolerance: Tolerances::standard().fillet_edge,
            };
            body.cut(bores).fillet(self.fillet_radius(), edges)
        };

        let mut ports = Ports::new();
        ports.push(run_base, -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, c), Vector3::z())?;
        ports.push(Point3::new(0.0, m, 0.0), Vector3::y())?;

        Ok(BuiltComponent::new(ComponentFamily::Tee, &self.size, shape, ports)
            .with_profile(profile_label(od, od2)))
    }
}
