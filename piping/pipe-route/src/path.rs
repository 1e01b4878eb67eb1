//! Centerline paths that lines and branches are built along.
//!
//! A [`Path`] is an ordered sequence of [`Segment`]s. Straight segments become
//! pipes, arc segments become bends of their own radius and sweep, and the
//! corner between two straight segments gets a bend from the line's
//! configuration.
//!
//! # Example
//!
//! ```
//! use pipe_route::Path;
//! use pipe_types::Tolerances;
//! use nalgebra::Point3;
//!
//! let path = Path::from_points(&[
//!     Point3::origin(),
//!     Point3::new(1000.0, 0.0, 0.0),
//!     Point3::new(1000.0, 500.0, 0.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(path.len(), 2);
//! assert!((path.length() - 1500.0).abs() < 1e-12);
//! assert!(path.validate(&Tolerances::default()).is_ok());
//! ```

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use pipe_types::{PipeError, PipeResult, Tolerances};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One piece of a centerline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Segment {
    /// A straight piece from `start` to `end`.
    Line {
        /// First point.
        start: Point3<f64>,
        /// Last point.
        end: Point3<f64>,
    },

    /// A circular arc starting at `start`, turning `sweep` radians
    /// counter-clockwise about `normal` through `center`.
    Arc {
        /// Center of curvature.
        center: Point3<f64>,
        /// First point.
        start: Point3<f64>,
        /// Unit normal of the arc plane.
        normal: Unit<Vector3<f64>>,
        /// Swept angle in radians, in `(0, PI)`.
        sweep: f64,
    },
}

impl Segment {
    /// A straight segment.
    #[must_use]
    pub const fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self::Line { start, end }
    }

    /// An arc segment.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `normal` is zero.
    pub fn arc(
        center: Point3<f64>,
        start: Point3<f64>,
        normal: Vector3<f64>,
        sweep: f64,
    ) -> PipeResult<Self> {
        let normal = Unit::try_new(normal, 1e-12)
            .ok_or_else(|| PipeError::degenerate("arc normal has zero length"))?;
        Ok(Self::Arc {
            center,
            start,
            normal,
            sweep,
        })
    }

    /// Returns `true` for straight segments.
    #[must_use]
    pub const fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    /// First point.
    #[must_use]
    pub fn start(&self) -> Point3<f64> {
        match self {
            Self::Line { start, .. } | Self::Arc { start, .. } => *start,
        }
    }

    /// Last point.
    #[must_use]
    pub fn end(&self) -> Point3<f64> {
        match self {
            Self::Line { end, .. } => *end,
            Self::Arc {
                center,
                start,
                normal,
                sweep,
            } => center + UnitQuaternion::from_axis_angle(normal, *sweep) * (start - center),
        }
    }

    /// Length along the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line { start, end } => (end - start).norm(),
            Self::Arc {
                center,
                start,
                sweep,
                ..
            } => (start - center).norm() * sweep.abs(),
        }
    }

    /// Radius of an arc; `None` for straight segments.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self {
            Self::Line { .. } => None,
            Self::Arc { center, start, .. } => Some((start - center).norm()),
        }
    }

    /// Unit direction of travel at the first point.
    #[must_use]
    pub fn start_tangent(&self) -> Option<Unit<Vector3<f64>>> {
        match self {
            Self::Line { start, end } => Unit::try_new(end - start, 1e-12),
            Self::Arc {
                center,
                start,
                normal,
                ..
            } => Unit::try_new(normal.cross(&(start - center)), 1e-12),
        }
    }

    /// Unit direction of travel at the last point.
    #[must_use]
    pub fn end_tangent(&self) -> Option<Unit<Vector3<f64>>> {
        match self {
            Self::Line { .. } => self.start_tangent(),
            Self::Arc { normal, sweep, .. } => self
                .start_tangent()
                .map(|t| UnitQuaternion::from_axis_angle(normal, *sweep) * t),
        }
    }

    fn validate(&self, index: usize, tolerances: &Tolerances) -> PipeResult<()> {
        if self.length() <= tolerances.min_length {
            return Err(PipeError::invalid_selection(format!(
                "segment {index} has no length"
            )));
        }
        if let Self::Arc {
            center,
            start,
            normal,
            sweep,
        } = self
        {
            if !(*sweep > 0.0 && *sweep < std::f64::consts::PI) {
                return Err(PipeError::invalid_selection(format!(
                    "arc segment {index} sweeps {sweep} rad, outside (0, PI)"
                )));
            }
            let radial = (start - center).normalize();
            if normal.dot(&radial).abs() > tolerances.parallel {
                return Err(PipeError::invalid_selection(format!(
                    "arc segment {index} start does not lie in its plane"
                )));
            }
        }
        Ok(())
    }
}

/// An ordered, directed centerline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a path from segments, unchecked.
    #[must_use]
    pub const fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] for fewer than two points.
    pub fn from_points(points: &[Point3<f64>]) -> PipeResult<Self> {
        if points.len() < 2 {
            return Err(PipeError::invalid_selection(
                "a path needs at least two points",
            ));
        }
        let segments = points
            .windows(2)
            .map(|w| Segment::line(w[0], w[1]))
            .collect();
        Ok(Self { segments })
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Checks the path before anything is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] for an empty path, a segment
    /// without length, a malformed arc, or consecutive segments that do not
    /// share an endpoint.
    pub fn validate(&self, tolerances: &Tolerances) -> PipeResult<()> {
        if self.segments.is_empty() {
            return Err(PipeError::invalid_selection("path has no segments"));
        }
        for (i, segment) in self.segments.iter().enumerate() {
            segment.validate(i, tolerances)?;
        }
        for (i, pair) in self.segments.windows(2).enumerate() {
            let gap = (pair[1].start() - pair[0].end()).norm();
            if gap > tolerances.coincidence {
                return Err(PipeError::invalid_selection(format!(
                    "segments {i} and {} are {gap} apart",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Get the segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total centerline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Option<Point3<f64>> {
        self.segments.first().map(Segment::start)
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Option<Point3<f64>> {
        self.segments.last().map(Segment::end)
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
