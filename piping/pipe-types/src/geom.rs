//! Small geometric primitives: centerlines, planes and rotations.

use crate::error::{PipeError, PipeResult};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An infinite line through `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line3 {
    /// A point on the line.
    pub origin: Point3<f64>,
    /// Unit direction of the line.
    pub direction: Unit<Vector3<f64>>,
}

impl Line3 {
    /// Creates a line, normalizing `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `direction` is zero.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> PipeResult<Self> {
        let direction = Unit::try_new(direction, 1e-12)
            .ok_or_else(|| PipeError::degenerate("line direction has zero length"))?;
        Ok(Self { origin, direction })
    }

    /// Creates the line through two distinct points.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if the points coincide.
    pub fn through(a: Point3<f64>, b: Point3<f64>) -> PipeResult<Self> {
        Self::new(a, b - a)
    }

    /// Point at signed distance `t` from the origin.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Intersection point of two coplanar, non-parallel lines.
    ///
    /// Returns `None` for parallel lines (cross product norm below
    /// `parallel_tol`) and for skew lines whose closest points are further
    /// apart than `coincidence_tol`.
    ///
    /// # Example
    ///
    /// ```
    /// use pipe_types::Line3;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let a = Line3::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x()).unwrap();
    /// let b = Line3::new(Point3::new(0.0, 3.0, 0.0), Vector3::y()).unwrap();
    /// let p = a.intersection(&b, 1e-6, 1e-6).unwrap();
    /// assert!((p - Point3::origin()).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn intersection(
        &self,
        other: &Self,
        parallel_tol: f64,
        coincidence_tol: f64,
    ) -> Option<Point3<f64>> {
        let d1 = self.direction.into_inner();
        let d2 = other.direction.into_inner();
        if d1.cross(&d2).norm() < parallel_tol {
            return None;
        }
        let w = self.origin - other.origin;
        let b = d1.dot(&d2);
        let d = d1.dot(&w);
        let e = d2.dot(&w);
        let denom = 1.0 - b * b;
        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        let q1 = self.point_at(s);
        let q2 = other.point_at(t);
        if (q1 - q2).norm() > coincidence_tol {
            return None;
        }
        Some(nalgebra::center(&q1, &q2))
    }
}

/// A plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// Unit normal of the plane.
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    /// Creates a plane, normalizing `normal`.
    ///
    /// Returns `None` if the normal has zero length.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        Unit::try_new(normal, 1e-12).map(|normal| Self { point, normal })
    }

    /// The XY plane through the origin.
    #[must_use]
    pub fn xy() -> Self {
        Self {
            point: Point3::origin(),
            normal: Vector3::z_axis(),
        }
    }

    /// Signed distance from the plane to `p` (positive on the normal side).
    #[must_use]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.point))
    }

    /// Orthogonal projection of `p` onto the plane.
    #[must_use]
    pub fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal.into_inner() * self.signed_distance(p)
    }

    /// Mirror image of `p` across the plane.
    #[must_use]
    pub fn reflect(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal.into_inner() * (2.0 * self.signed_distance(p))
    }
}

/// Returns `true` if `a` and `b` are parallel or anti-parallel.
#[must_use]
pub fn is_parallel(a: &Vector3<f64>, b: &Vector3<f64>, tol: f64) -> bool {
    match (a.try_normalize(0.0), b.try_normalize(0.0)) {
        (Some(a), Some(b)) => a.cross(&b).norm() < tol,
        _ => false,
    }
}

/// Returns `true` if `a` and `b` are orthogonal.
#[must_use]
pub fn is_orthogonal(a: &Vector3<f64>, b: &Vector3<f64>, tol: f64) -> bool {
    match (a.try_normalize(0.0), b.try_normalize(0.0)) {
        (Some(a), Some(b)) => a.dot(&b).abs() < tol,
        _ => false,
    }
}

/// Signed angle from `from` to `to` measured counter-clockwise about `axis`.
#[must_use]
pub fn signed_angle(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    axis.dot(&from.cross(to)).atan2(from.dot(to))
}

/// An axis perpendicular to `v`, from `v x X`, or `v x Y` when `v` is
/// along X.
///
/// # Errors
///
/// Returns [`PipeError::GeometricDegeneracy`] if `v` is zero.
pub fn perpendicular(v: &Vector3<f64>) -> PipeResult<Unit<Vector3<f64>>> {
    let candidate = v.cross(&Vector3::x());
    let candidate = if candidate.norm() < 1e-6 {
        v.cross(&Vector3::y())
    } else {
        candidate
    };
    Unit::try_new(candidate, 1e-12)
        .ok_or_else(|| PipeError::degenerate("no perpendicular to a zero vector"))
}

/// Shortest-arc rotation taking direction `from` onto direction `to`.
///
/// Identical directions (residual below `aligned`) give the identity.
/// Opposed directions give a half turn about [`perpendicular`]`(from)`.
/// Nearly opposed directions turn about `from x to` by the exact angle.
///
/// # Errors
///
/// Returns [`PipeError::GeometricDegeneracy`] if either vector is zero.
///
/// # Example
///
/// ```
/// use pipe_types::geom::shortest_arc;
/// use nalgebra::Vector3;
///
/// let q = shortest_arc(&Vector3::z(), &-Vector3::z(), 1e-9).unwrap();
/// assert!((q * Vector3::z() + Vector3::z()).norm() < 1e-12);
/// ```
pub fn shortest_arc(
    from: &Vector3<f64>,
    to: &Vector3<f64>,
    aligned: f64,
) -> PipeResult<UnitQuaternion<f64>> {
    let (Some(f), Some(t)) = (from.try_normalize(1e-12), to.try_normalize(1e-12)) else {
        return Err(PipeError::degenerate("rotation between zero-length directions"));
    };
    if (t - f).norm() < aligned {
        return Ok(UnitQuaternion::identity());
    }
    let cross = f.cross(&t);
    let cos = f.dot(&t);
    match Unit::try_new(cross, f64::EPSILON) {
        Some(axis) if (t + f).norm() >= aligned => {
            // atan2 keeps the angle exact where `cos` has rounded to -1.
            Ok(UnitQuaternion::from_axis_angle(&axis, cross.norm().atan2(cos)))
        }
        _ if cos > 0.0 => Ok(UnitQuaternion::identity()),
        _ => Ok(UnitQuaternion::from_axis_angle(&perpendicular(&f)?, PI)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(o: [f64; 3], d: [f64; 3]) -> Option<Line3> {
        Line3::new(Point3::from(o), Vector3::from(d)).ok()
    }

    #[test]
    fn test_intersection_oblique() {
        let (Some(a), Some(b)) = (line([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]), line([10.0, 0.0, 0.0], [0.0, 1.0, 0.0])) else {
            panic!("lines");
        };
        let p = a.intersection(&b, 1e-6, 1e-6);
        assert!(p.is_some_and(|p| (p - Point3::new(10.0, 10.0, 0.0)).norm() < 1e-9));
    }

    #[test]
    fn test_parallel_and_skew() {
        let (Some(a), Some(b), Some(c)) = (
            line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            line([0.0, 5.0, 0.0], [-2.0, 0.0, 0.0]),
            line([0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ) else {
            panic!("lines");
        };
        assert!(a.intersection(&b, 1e-6, 1e-6).is_none());
        assert!(a.intersection(&c, 1e-6, 1e-6).is_none());
    }

    #[test]
    fn test_plane() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 2.0), Vector3::z() * 4.0).unwrap();
        let p = Point3::new(1.0, 1.0, 5.0);
        assert_relative_eq!(plane.signed_distance(&p), 3.0, epsilon = 1e-12);
        assert_relative_eq!(plane.project(&p), Point3::new(1.0, 1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(plane.reflect(&p), Point3::new(1.0, 1.0, -1.0), epsilon = 1e-12);
        assert!(Plane::new(Point3::origin(), Vector3::zeros()).is_none());
    }

    #[test]
    fn test_shortest_arc_general() {
        let from = Vector3::new(1.0, 2.0, 3.0);
        let to = Vector3::new(-3.0, 0.5, 1.0);
        let q = shortest_arc(&from, &to, 1e-9).unwrap();
        assert_relative_eq!(q * from.normalize(), to.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn test_shortest_arc_opposed_along_x() {
        let q = shortest_arc(&Vector3::x(), &-Vector3::x(), 1e-9).unwrap();
        assert_relative_eq!(q * Vector3::x(), -Vector3::x(), epsilon = 1e-12);
        assert!(shortest_arc(&Vector3::zeros(), &Vector3::x(), 1e-9).is_err());
    }

    #[test]
    fn test_shortest_arc_nearly_opposed() {
        // Residuals between the aligned tolerance and where `cos` stops
        // rounding to -1.
        for drift in [2e-9, 5e-9, 1e-8, 1.4e-8, 1e-7] {
            for from in [Vector3::z(), Vector3::x(), Vector3::new(1.0, -2.0, 0.5)] {
                let n = from.normalize();
                let to = -n + perpendicular(&n).unwrap().into_inner() * drift;
                let q = shortest_arc(&from, &to, 1e-9).unwrap();
                assert_relative_eq!(q * n, to.normalize(), epsilon = 1e-12);
            }
        }
        let down = Vector3::new(5e-9, 0.0, -1.0);
        let q = shortest_arc(&Vector3::z(), &down, 1e-9).unwrap();
        assert_relative_eq!(q * Vector3::z(), down.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn test_signed_angle_and_predicates() {
        let a = signed_angle(&Vector3::x(), &Vector3::y(), &Vector3::z());
        assert_relative_eq!(a, PI / 2.0, epsilon = 1e-12);
        let a = signed_angle(&Vector3::x(), &Vector3::y(), &-Vector3::z());
        assert_relative_eq!(a, -PI / 2.0, epsilon = 1e-12);
        assert!(is_parallel(&Vector3::x(), &(-Vector3::x() * 7.0), 1e-6));
        assert!(!is_parallel(&Vector3::x(), &Vector3::zeros(), 1e-6));
        assert!(is_orthogonal(&Vector3::x(), &Vector3::z(), 1e-6));
    }
}
