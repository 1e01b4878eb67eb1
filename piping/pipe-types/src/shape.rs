//! Kernel-independent solid recipes.
//!
//! Builders never talk to a modeling kernel directly. They describe the solid
//! as a [`ShapeRequest`] tree which a [`GeometryKernel`](crate::GeometryKernel)
//! realizes later (see [`realize`](crate::realize)).

use crate::geom::Plane;
use nalgebra::{Isometry3, Point2, Point3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed planar loop in the sketch plane `z = 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Contour {
    /// Closed polygon (first point is not repeated).
    Polygon(Vec<Point2<f64>>),
    /// Full circle.
    Circle {
        /// Center of the circle.
        center: Point2<f64>,
        /// Radius of the circle.
        radius: f64,
    },
}

impl Contour {
    /// Circle about the sketch origin.
    #[must_use]
    pub const fn circle(radius: f64) -> Self {
        Self::Circle {
            center: Point2::new(0.0, 0.0),
            radius,
        }
    }

    /// Polygon from `(x, y)` pairs.
    #[must_use]
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Self::Polygon(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Regular polygon with `n` sides inscribed in a circle of radius `r`,
    /// first vertex on +X.
    #[must_use]
    pub fn regular_polygon(n: usize, r: f64) -> Self {
        let step = std::f64::consts::TAU / n as f64;
        Self::Polygon(
            (0..n)
                .map(|i| {
                    let a = step * i as f64;
                    Point2::new(r * a.cos(), r * a.sin())
                })
                .collect(),
        )
    }
}

/// A planar face: one outer loop and any number of holes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    /// Outer boundary.
    pub outer: Contour,
    /// Holes cut out of the face.
    pub holes: Vec<Contour>,
}

impl Profile {
    /// Profile without holes.
    #[must_use]
    pub const fn solid(outer: Contour) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Adds a hole.
    #[must_use]
    pub fn with_hole(mut self, hole: Contour) -> Self {
        self.holes.push(hole);
        self
    }
}

/// A circle in space, used as a loft section or sweep start.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle3 {
    /// Center of the circle.
    pub center: Point3<f64>,
    /// Normal of the circle's plane.
    pub normal: Unit<Vector3<f64>>,
    /// Radius.
    pub radius: f64,
}

/// One piece of a sweep path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathPiece {
    /// Straight piece.
    Line {
        /// Start point.
        start: Point3<f64>,
        /// End point.
        end: Point3<f64>,
    },
    /// Circular arc, counter-clockwise about `normal`.
    Arc {
        /// Arc center.
        center: Point3<f64>,
        /// Plane normal (rotation axis).
        normal: Unit<Vector3<f64>>,
        /// Arc radius.
        radius: f64,
        /// Start angle in radians, measured from the plane's reference axis.
        start_angle: f64,
        /// End angle in radians.
        end_angle: f64,
    },
}

/// A surface an edge midpoint can be tested against.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderSurface {
    /// Point on the cylinder axis.
    pub axis_point: Point3<f64>,
    /// Unit axis direction.
    pub axis: Unit<Vector3<f64>>,
    /// Radius of the surface.
    pub radius: f64,
}

impl CylinderSurface {
    /// Distance from `p` to the cylinder axis.
    #[must_use]
    pub fn axis_distance(&self, p: &Point3<f64>) -> f64 {
        let v = p - self.axis_point;
        (v - self.axis.into_inner() * self.axis.dot(&v)).norm()
    }

    /// Returns `true` if `p` lies on the surface within `tol`.
    #[must_use]
    pub fn contains(&self, p: &Point3<f64>, tol: f64) -> bool {
        (self.axis_distance(p) - self.radius).abs() < tol
    }
}

/// Selects edges of a realized solid by their midpoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeSelector {
    /// Every edge.
    All,
    /// Edges whose midpoint lies on both cylinders (intersection curves).
    OnBothCylinders {
        /// First surface.
        first: CylinderSurface,
        /// Second surface.
        second: CylinderSurface,
        /// Matching band.
        tolerance: f64,
    },
    /// Edges whose midpoint lies on the given circle.
    OnCircle {
        /// Circle to match.
        circle: Circle3,
        /// Matching band.
        tolerance: f64,
    },
}

impl EdgeSelector {
    /// Returns `true` if an edge with this midpoint is selected.
    #[must_use]
    pub fn matches(&self, midpoint: &Point3<f64>) -> bool {
        match self {
            Self::All => true,
            Self::OnBothCylinders {
                first,
                second,
                tolerance,
            } => first.contains(midpoint, *tolerance) && second.contains(midpoint, *tolerance),
            Self::OnCircle { circle, tolerance } => {
                let v = midpoint - circle.center;
                let axial = circle.normal.dot(&v);
                let radial = (v - circle.normal.into_inner() * axial).norm();
                axial.abs() < *tolerance && (radial - circle.radius).abs() < *tolerance
            }
        }
    }
}

/// Selects faces of a realized solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaceSelector {
    /// All planar faces.
    Planar,
}

/// A solid described as a tree of kernel operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeRequest {
    /// Right circular cylinder from `base` along `axis`.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Height along the axis.
        height: f64,
        /// Center of the base disc.
        base: Point3<f64>,
        /// Axis direction.
        axis: Unit<Vector3<f64>>,
    },
    /// Truncated cone from `base` along `axis`.
    Cone {
        /// Radius at the base.
        radius1: f64,
        /// Radius at the top.
        radius2: f64,
        /// Height along the axis.
        height: f64,
        /// Center of the base disc.
        base: Point3<f64>,
        /// Axis direction.
        axis: Unit<Vector3<f64>>,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f64,
        /// Center.
        center: Point3<f64>,
    },
    /// Full torus.
    Torus {
        /// Distance from the torus center to the tube center.
        major_radius: f64,
        /// Tube radius.
        minor_radius: f64,
        /// Torus center.
        center: Point3<f64>,
        /// Axis of revolution.
        axis: Unit<Vector3<f64>>,
    },
    /// Axis-aligned box.
    Cuboid {
        /// Minimum corner.
        corner: Point3<f64>,
        /// Extents along X, Y and Z.
        size: Vector3<f64>,
    },
    /// Planar profile in `z = 0` extruded by a vector.
    Prism {
        /// Face to extrude.
        profile: Profile,
        /// Extrusion vector.
        direction: Vector3<f64>,
    },
    /// Circular section swept along a path.
    Sweep {
        /// Section radius.
        radius: f64,
        /// Path pieces, end to end.
        path: Vec<PathPiece>,
    },
    /// Solid loft through circular sections.
    Loft {
        /// Sections in order.
        sections: Vec<Circle3>,
    },
    /// Boolean union of all children.
    Union(Vec<ShapeRequest>),
    /// `base` minus every tool.
    Difference {
        /// Solid to cut from.
        base: Box<ShapeRequest>,
        /// Solids removed from the base.
        tools: Vec<ShapeRequest>,
    },
    /// Boolean intersection.
    Common(Box<ShapeRequest>, Box<ShapeRequest>),
    /// Rounds the selected edges; falls back to `base` when nothing matches.
    Fillet {
        /// Solid to fillet.
        base: Box<ShapeRequest>,
        /// Fillet radius.
        radius: f64,
        /// Edges to round.
        edges: EdgeSelector,
    },
    /// Hollows a solid by removing faces and offsetting the rest inward.
    Hollow {
        /// Solid to hollow.
        base: Box<ShapeRequest>,
        /// Wall thickness.
        thickness: f64,
        /// Faces opened by the operation.
        open_faces: FaceSelector,
    },
    /// Child placed by a rigid transform.
    Transformed {
        /// Solid to move.
        base: Box<ShapeRequest>,
        /// Local-to-parent transform.
        placement: Isometry3<f64>,
    },
    /// Mirror image of a child.
    Mirrored {
        /// Solid to mirror.
        base: Box<ShapeRequest>,
        /// Mirror plane.
        plane: Plane,
    },
    /// Unfused collection of solids.
    Compound(Vec<ShapeRequest>),
}

impl ShapeRequest {
    /// Cylinder helper.
    #[must_use]
    pub fn cylinder(radius: f64, height: f64, base: Point3<f64>, axis: Unit<Vector3<f64>>) -> Self {
        Self::Cylinder {
            radius,
            height,
            base,
            axis,
        }
    }

    /// Cylinder from the origin along +Z.
    #[must_use]
    pub fn z_cylinder(radius: f64, height: f64) -> Self {
        Self::cylinder(radius, height, Point3::origin(), Vector3::z_axis())
    }

    /// Cone helper.
    #[must_use]
    pub fn cone(
        radius1: f64,
        radius2: f64,
        height: f64,
        base: Point3<f64>,
        axis: Unit<Vector3<f64>>,
    ) -> Self {
        Self::Cone {
            radius1,
            radius2,
            height,
            base,
            axis,
        }
    }

    /// `self` minus `tools`. An empty tool list returns `self` unchanged.
    #[must_use]
    pub fn cut(self, tools: Vec<Self>) -> Self {
        if tools.is_empty() {
            self
        } else {
            Self::Difference {
                base: Box::new(self),
                tools,
            }
        }
    }

    /// `self` fused with `other`, flattening nested unions.
    #[must_use]
    pub fn fuse(self, other: Self) -> Self {
        match self {
            Self::Union(mut parts) => {
                parts.push(other);
                Self::Union(parts)
            }
            first => Self::Union(vec![first, other]),
        }
    }

    /// Intersection of `self` and `other`.
    #[must_use]
    pub fn common(self, other: Self) -> Self {
        Self::Common(Box::new(self), Box::new(other))
    }

    /// Fillet of the selected edges.
    #[must_use]
    pub fn fillet(self, radius: f64, edges: EdgeSelector) -> Self {
        Self::Fillet {
            base: Box::new(self),
            radius,
            edges,
        }
    }

    /// Hollow through the planar faces.
    #[must_use]
    pub fn hollow(self, thickness: f64) -> Self {
        Self::Hollow {
            base: Box::new(self),
            thickness,
            open_faces: FaceSelector::Planar,
        }
    }

    /// Rigidly moved copy.
    #[must_use]
    pub fn transformed(self, placement: Isometry3<f64>) -> Self {
        Self::Transformed {
            base: Box::new(self),
            placement,
        }
    }

    /// Mirrored copy.
    #[must_use]
    pub fn mirrored(self, plane: Plane) -> Self {
        Self::Mirrored {
            base: Box::new(self),
            plane,
        }
    }

    /// Name of the top-level node, for diagnostics.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Cylinder { .. } => "cylinder",
            Self::Cone { .. } => "cone",
            Self::Sphere { .. } => "sphere",
            Self::Torus { .. } => "torus",
            Self::Cuboid { .. } => "cuboid",
            Self::Prism { .. } => "prism",
            Self::Sweep { .. } => "sweep",
            Self::Loft { .. } => "loft",
            Self::Union(_) => "union",
            Self::Difference { .. } => "difference",
            Self::Common(..) => "common",
            Self::Fillet { .. } => "fillet",
            Self::Hollow { .. } => "hollow",
            Self::Transformed { .. } => "transform",
            Self::Mirrored { .. } => "mirror",
            Self::Compound(_) => "compound",
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::Union(parts) | Self::Compound(parts) => parts.iter().map(Self::node_count).sum(),
            Self::Difference { base, tools } => {
                base.node_count() + tools.iter().map(Self::node_count).sum::<usize>()
            }
            Self::Common(a, b) => a.node_count() + b.node_count(),
            Self::Fillet { base, .. }
            | Self::Hollow { base, .. }
            | Self::Transformed { base, .. }
            | Self::Mirrored { base, .. } => base.node_count(),
            _ => 0,
        }
    }

    /// Returns `true` if any node satisfies `predicate`.
    pub fn any(&self, predicate: &impl Fn(&Self) -> bool) -> bool {
        if predicate(self) {
            return true;
        }
        match self {
            Self::Union(parts) | Self::Compound(parts) => parts.iter().any(|p| p.any(predicate)),
            Self::Difference { base, tools } => {
                base.any(predicate) || tools.iter().any(|t| t.any(predicate))
            }
            Self::Common(a, b) => a.any(predicate) || b.any(predicate),
            Self::Fillet { base, .. }
            | Self::Hollow { base, .. }
            | Self::Transformed { base, .. }
            | Self::Mirrored { base, .. } => base.any(predicate),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_without_tools_is_identity() {
        let c = ShapeRequest::z_cylinder(10.0, 5.0);
        assert_eq!(c.clone().cut(vec![]), c);
    }

    #[test]
    fn test_fuse_flattens() {
        let a = ShapeRequest::z_cylinder(1.0, 1.0);
        let u = a.clone().fuse(a.clone()).fuse(a);
        match u {
            ShapeRequest::Union(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected union, got {}", other.operation()),
        }
    }

    #[test]
    fn test_node_count_and_any() {
        let shape = ShapeRequest::z_cylinder(10.0, 5.0)
            .cut(vec![ShapeRequest::z_cylinder(8.0, 5.0)])
            .hollow(1.0);
        assert_eq!(shape.node_count(), 4);
        assert!(shape.any(&|s| matches!(s, ShapeRequest::Difference { .. })));
        assert!(!shape.any(&|s| matches!(s, ShapeRequest::Sphere { .. })));
    }

    #[test]
    fn test_edge_selectors() {
        let run = CylinderSurface {
            axis_point: Point3::origin(),
            axis: Vector3::z_axis(),
            radius: 30.0,
        };
        let branch = CylinderSurface {
            axis_point: Point3::origin(),
            axis: Vector3::y_axis(),
            radius: 20.0,
        };
        let sel = EdgeSelector::OnBothCylinders {
            first: run,
            second: branch,
            tolerance: 0.5,
        };
        // x = 20, y^2 = 30^2 - 20^2, z = 0: on both surfaces
        let y = (30.0f64 * 30.0 - 400.0).sqrt();
        assert!(sel.matches(&Point3::new(20.0, y, 0.0)));
        assert!(!sel.matches(&Point3::new(30.0, 0.0, 5.0)));

        let ring = EdgeSelector::OnCircle {
            circle: Circle3 {
                center: Point3::new(0.0, 0.0, 4.0),
                normal: Vector3::z_axis(),
                radius: 10.0,
            },
            tolerance: 0.1,
        };
        assert!(ring.matches(&Point3::new(0.0, 10.0, 4.0)));
        assert!(!ring.matches(&Point3::new(0.0, 10.0, 5.0)));
    }

    #[test]
    fn test_regular_polygon() {
        match Contour::regular_polygon(6, 2.0) {
            Contour::Polygon(points) => {
                assert_eq!(points.len(), 6);
                assert!((points[0].x - 2.0).abs() < 1e-12);
            }
            Contour::Circle { .. } => panic!("expected polygon"),
        }
    }
}
