//! The geometry kernel seam.
//!
//! Solid modeling (B-rep primitives, booleans, fillets, sweeps, lofts,
//! topology queries) lives outside this workspace. A host provides it by
//! implementing [`GeometryKernel`]; [`realize`] then turns any
//! [`ShapeRequest`] into the host's solid type.

use crate::error::{PipeError, PipeResult};
use crate::geom::Plane;
use crate::shape::{Circle3, EdgeSelector, FaceSelector, PathPiece, Profile, ShapeRequest};
use nalgebra::{Isometry3, Point3, Unit, Vector3};
use tracing::warn;

/// Midpoint information for one edge of a realized solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeProbe {
    /// Kernel-specific edge index.
    pub index: usize,
    /// Point at the middle of the edge's parameter range.
    pub midpoint: Point3<f64>,
}

/// Operations a solid-modeling kernel must supply.
///
/// Every method receives fully resolved numeric inputs. Edge and face
/// selection is decided before the kernel is asked to fillet or hollow.
pub trait GeometryKernel {
    /// The kernel's solid handle.
    type Solid: Clone;
    /// The kernel's error type.
    type Error: std::fmt::Display;

    /// Right circular cylinder.
    fn cylinder(
        &self,
        radius: f64,
        height: f64,
        base: Point3<f64>,
        axis: Unit<Vector3<f64>>,
    ) -> Result<Self::Solid, Self::Error>;

    /// Truncated cone.
    fn cone(
        &self,
        radius1: f64,
        radius2: f64,
        height: f64,
        base: Point3<f64>,
        axis: Unit<Vector3<f64>>,
    ) -> Result<Self::Solid, Self::Error>;

    /// Sphere.
    fn sphere(&self, radius: f64, center: Point3<f64>) -> Result<Self::Solid, Self::Error>;

    /// Full torus.
    fn torus(
        &self,
        major_radius: f64,
        minor_radius: f64,
        center: Point3<f64>,
        axis: Unit<Vector3<f64>>,
    ) -> Result<Self::Solid, Self::Error>;

    /// Axis-aligned box.
    fn cuboid(&self, corner: Point3<f64>, size: Vector3<f64>) -> Result<Self::Solid, Self::Error>;

    /// Planar face extruded along a vector.
    fn prism(&self, profile: &Profile, direction: Vector3<f64>) -> Result<Self::Solid, Self::Error>;

    /// Circular section swept along a path.
    fn sweep(&self, radius: f64, path: &[PathPiece]) -> Result<Self::Solid, Self::Error>;

    /// Solid loft through sections.
    fn loft(&self, sections: &[Circle3]) -> Result<Self::Solid, Self::Error>;

    /// Boolean union.
    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid, Self::Error>;

    /// Boolean difference `a - b`.
    fn difference(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid, Self::Error>;

    /// Boolean intersection.
    fn common(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid, Self::Error>;

    /// Fillets the edges with the given indices.
    fn fillet(
        &self,
        solid: &Self::Solid,
        radius: f64,
        edges: &[usize],
    ) -> Result<Self::Solid, Self::Error>;

    /// Hollows the solid, opening the selected faces.
    fn hollow(
        &self,
        solid: &Self::Solid,
        thickness: f64,
        open_faces: FaceSelector,
    ) -> Result<Self::Solid, Self::Error>;

    /// Rigid transform.
    fn transform(
        &self,
        solid: &Self::Solid,
        placement: &Isometry3<f64>,
    ) -> Result<Self::Solid, Self::Error>;

    /// Mirror image.
    fn mirror(&self, solid: &Self::Solid, plane: &Plane) -> Result<Self::Solid, Self::Error>;

    /// Unfused compound.
    fn compound(&self, solids: &[Self::Solid]) -> Result<Self::Solid, Self::Error>;

    /// Midpoints of every edge of the solid.
    fn edge_midpoints(&self, solid: &Self::Solid) -> Vec<EdgeProbe>;
}

/// Realizes a shape request with `kernel`.
///
/// Fillet nodes select edges by midpoint and fall back to the unfilleted
/// solid, with a warning, when no edge qualifies or the kernel fillet fails.
///
/// # Errors
///
/// Returns [`PipeError::Kernel`] when any other kernel operation fails, or
/// [`PipeError::GeometricDegeneracy`] for an empty union or compound.
pub fn realize<K: GeometryKernel>(kernel: &K, request: &ShapeRequest) -> PipeResult<K::Solid> {
    let op = request.operation();
    let lift = |r: Result<K::Solid, K::Error>| r.map_err(|e| PipeError::kernel(op, e));

    match request {
        ShapeRequest::Cylinder {
            radius,
            height,
            base,
            axis,
        } => lift(kernel.cylinder(*radius, *height, *base, *axis)),
        ShapeRequest::Cone {
            radius1,
            radius2,
            height,
            base,
            axis,
        } => lift(kernel.cone(*radius1, *radius2, *height, *base, *axis)),
        ShapeRequest::Sphere { radius, center } => lift(kernel.sphere(*radius, *center)),
        ShapeRequest::Torus {
            major_radius,
            minor_radius,
            center,
            axis,
        } => lift(kernel.torus(*major_radius, *minor_radius, *center, *axis)),
        ShapeRequest::Cuboid { corner, size } => lift(kernel.cuboid(*corner, *size)),
        ShapeRequest::Prism { profile, direction } => lift(kernel.prism(profile, *direction)),
        ShapeRequest::Sweep { radius, path } => lift(kernel.sweep(*radius, path)),
        ShapeRequest::Loft { sections } => lift(kernel.loft(sections)),
        ShapeRequest::Union(parts) => {
            let mut iter = parts.iter();
            let first = iter
                .next()
                .ok_or_else(|| PipeError::degenerate("union of nothing"))?;
            let mut acc = realize(kernel, first)?;
            for part in iter {
                let solid = realize(kernel, part)?;
                acc = lift(kernel.union(&acc, &solid))?;
            }
            Ok(acc)
        }
        ShapeRequest::Difference { base, tools } => {
            let mut acc = realize(kernel, base)?;
            for tool in tools {
                let solid = realize(kernel, tool)?;
                acc = lift(kernel.difference(&acc, &solid))?;
            }
            Ok(acc)
        }
        ShapeRequest::Common(a, b) => {
            let a = realize(kernel, a)?;
            let b = realize(kernel, b)?;
            lift(kernel.common(&a, &b))
        }
        ShapeRequest::Fillet {
            base,
            radius,
            edges,
        } => {
            let solid = realize(kernel, base)?;
            Ok(fillet_or_fallback(kernel, solid, *radius, edges))
        }
        ShapeRequest::Hollow {
            base,
            thickness,
            open_faces,
        } => {
            let solid = realize(kernel, base)?;
            lift(kernel.hollow(&solid, *thickness, *open_faces))
        }
        ShapeRequest::Transformed { base, placement } => {
            let solid = realize(kernel, base)?;
            lift(kernel.transform(&solid, placement))
        }
        ShapeRequest::Mirrored { base, plane } => {
            let solid = realize(kernel, base)?;
            lift(kernel.mirror(&solid, plane))
        }
        ShapeRequest::Compound(parts) => {
            if parts.is_empty() {
                return Err(PipeError::degenerate("compound of nothing"));
            }
            let solids = parts
                .iter()
                .map(|p| realize(kernel, p))
                .collect::<PipeResult<Vec<_>>>()?;
            lift(kernel.compound(&solids))
        }
    }
}

fn fillet_or_fallback<K: GeometryKernel>(
    kernel: &K,
    solid: K::Solid,
    radius: f64,
    selector: &EdgeSelector,
) -> K::Solid {
    let edges: Vec<usize> = kernel
        .edge_midpoints(&solid)
        .into_iter()
        .filter(|probe| selector.matches(&probe.midpoint))
        .map(|probe| probe.index)
        .collect();

    if edges.is_empty() {
        warn!(radius, "No edges matched fillet selector, using unfilleted shape");
        return solid;
    }
    if !(radius.is_finite() && radius > 0.0) {
        warn!(radius, "Fillet radius not positive, using unfilleted shape");
        return solid;
    }

    match kernel.fillet(&solid, radius, &edges) {
        Ok(filleted) => filleted,
        Err(e) => {
            warn!(radius, edges = edges.len(), error = %e, "Fillet failed, using unfilleted shape");
            solid
        }
    }
}
