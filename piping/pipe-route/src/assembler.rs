//! Walking a path into alternating pipes and bends.

use std::f64::consts::PI;

use nalgebra::{Point3, Unit, Vector3};
use pipe_fittings::ElbowDims;
use pipe_place::{Assembly, PlacedComponent, PlacementEngine};
use pipe_types::{PipeError, PipeResult};
use tracing::debug;

use crate::config::LineParams;
use crate::path::{Path, Segment};

/// What a generated piece stands for on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    /// A pipe along a straight segment.
    Tube,
    /// A bend at the corner after a straight segment.
    Corner,
    /// A bend realizing an arc segment.
    Arc,
}

/// A component generated for one path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    /// Index of the segment the piece belongs to. For corners this is the
    /// segment before the corner.
    pub segment: usize,
    /// What the piece stands for.
    pub kind: PieceKind,
    /// The placed component.
    pub component: PlacedComponent,
}

/// Bend between two straight segments.
#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: Point3<f64>,
    incoming: Unit<Vector3<f64>>,
    outgoing: Unit<Vector3<f64>>,
    angle: f64,
}

/// Builds the components of a path.
///
/// Straight segments become pipes; corners between them get a bend of the
/// configured radius and both neighbors are trimmed by `R * tan(angle / 2)`
/// so their free ends meet the bend ports exactly. Collinear neighbors get
/// no bend.
///
/// # Example
///
/// ```
/// use pipe_route::{LineParams, Path, PathAssembler};
/// use nalgebra::Point3;
///
/// let path = Path::from_points(&[
///     Point3::origin(),
///     Point3::new(1000.0, 0.0, 0.0),
///     Point3::new(1000.0, 1000.0, 0.0),
/// ])
/// .unwrap();
/// let pieces = PathAssembler::default()
///     .assemble(&path, &LineParams::default(), "L1")
///     .unwrap();
///
/// // pipe, elbow, pipe
/// assert_eq!(pieces.len(), 3);
/// let height = pieces[0].component.height().unwrap();
/// assert!((height - (1000.0 - 45.225)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathAssembler {
    engine: PlacementEngine,
}

impl PathAssembler {
    /// Creates an assembler using `engine` for placement.
    #[must_use]
    pub const fn new(engine: PlacementEngine) -> Self {
        Self { engine }
    }

    /// Get the placement engine.
    #[must_use]
    pub const fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// Computes every component of `path` in path order without touching
    /// any assembly.
    ///
    /// IDs are `{prefix}_Tube001`, `{prefix}_Elbow001` and so on.
    ///
    /// # Errors
    ///
    /// - [`PipeError::InvalidSelection`] if the path does not validate, or a
    ///   corner touches an arc segment
    /// - [`PipeError::GeometricDegeneracy`] if the path doubles back on
    ///   itself
    /// - [`PipeError::DimensionInconsistency`] if the section is invalid or
    ///   a segment is too short for the bends at its ends
    pub fn assemble(
        &self,
        path: &Path,
        params: &LineParams,
        prefix: &str,
    ) -> PipeResult<Vec<Piece>> {
        let tolerances = self.engine.tolerances();
        params.validate()?;
        path.validate(tolerances)?;

        let segments = path.segments();
        let corners = self.corners(segments)?;

        let radius = params.bend_radius();
        let mut trims = vec![(0.0, 0.0); segments.len()];
        for (i, corner) in corners.iter().enumerate() {
            if let Some(corner) = corner {
                let trim = radius * (corner.angle / 2.0).tan();
                trims[i].1 = trim;
                trims[i + 1].0 = trim;
            }
        }

        let mut pieces = Vec::with_capacity(2 * segments.len());
        let (mut tubes, mut bends) = (0_usize, 0_usize);
        let mut next_id = |kind: PieceKind| match kind {
            PieceKind::Tube => {
                tubes += 1;
                format!("{prefix}_Tube{tubes:03}")
            }
            PieceKind::Corner | PieceKind::Arc => {
                bends += 1;
                format!("{prefix}_Elbow{bends:03}")
            }
        };

        for (i, segment) in segments.iter().enumerate() {
            let tangent = segment
                .start_tangent()
                .ok_or_else(|| PipeError::degenerate(format!("segment {i} has no tangent")))?;
            match segment {
                Segment::Line { start, .. } => {
                    let (head, tail) = trims[i];
                    let height = segment.length() - head - tail;
                    if height <= tolerances.min_length {
                        return Err(PipeError::dimension(
                            "height",
                            format!("segment {i} is too short for the bends at its ends"),
                        ));
                    }
                    let base = start + tangent.into_inner() * head;
                    let pipe = self
                        .engine
                        .place_at(
                            next_id(PieceKind::Tube),
                            params.pipe(height).into(),
                            base,
                            tangent.into_inner(),
                        )?
                        .with_rating(params.rating());
                    debug!(id = pipe.id(), segment = i, height, "Placed tube");
                    pieces.push(Piece {
                        segment: i,
                        kind: PieceKind::Tube,
                        component: pipe,
                    });
                }
                Segment::Arc { start, sweep, .. } => {
                    let (Some(arc_radius), Some(exit)) = (segment.radius(), segment.end_tangent())
                    else {
                        return Err(PipeError::degenerate(format!("arc segment {i} is malformed")));
                    };
                    let dims = ElbowDims::new(
                        params.size(),
                        params.outer_diameter(),
                        params.thickness(),
                        sweep.to_degrees(),
                        arc_radius,
                    );
                    let corner = start + tangent.into_inner() * (arc_radius * (sweep / 2.0).tan());
                    let mut bend = PlacedComponent::new(next_id(PieceKind::Arc), dims.into())?
                        .with_rating(params.rating());
                    self.engine
                        .place_bend(&mut bend, &tangent, &exit, Some(corner))?;
                    pieces.push(Piece {
                        segment: i,
                        kind: PieceKind::Arc,
                        component: bend,
                    });
                }
            }

            if let Some(Some(corner)) = corners.get(i) {
                let mut bend = PlacedComponent::new(
                    next_id(PieceKind::Corner),
                    params.elbow(corner.angle.to_degrees()).into(),
                )?
                .with_rating(params.rating());
                self.engine.place_bend(
                    &mut bend,
                    &corner.incoming,
                    &corner.outgoing,
                    Some(corner.vertex),
                )?;
                pieces.push(Piece {
                    segment: i,
                    kind: PieceKind::Corner,
                    component: bend,
                });
            }
        }
        Ok(pieces)
    }

    /// Corner after each segment but the last; `None` where the path runs on
    /// tangentially.
    fn corners(&self, segments: &[Segment]) -> PipeResult<Vec<Option<Corner>>> {
        let tolerances = self.engine.tolerances();
        segments
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (Some(incoming), Some(outgoing)) =
                    (pair[0].end_tangent(), pair[1].start_tangent())
                else {
                    return Err(PipeError::degenerate(format!(
                        "segments {i} and {} have no tangent",
                        i + 1
                    )));
                };
                let angle = incoming.angle(&outgoing);
                if incoming.cross(&outgoing).norm() < tolerances.parallel {
                    if angle < PI / 2.0 {
                        return Ok(None);
                    }
                    return Err(PipeError::degenerate(format!(
                        "path doubles back between segments {i} and {}",
                        i + 1
                    )));
                }
                if !(pair[0].is_line() && pair[1].is_line()) {
                    return Err(PipeError::invalid_selection(format!(
                        "corner between segments {i} and {} touches an arc",
                        i + 1
                    )));
                }
                Ok(Some(Corner {
                    vertex: pair[0].end(),
                    incoming,
                    outgoing,
                    angle,
                }))
            })
            .collect()
    }
}

/// Swaps the previously generated components of a container for new ones.
///
/// Every new ID is checked before anything is removed, so on error the
/// assembly is untouched.
pub(crate) fn commit(
    doc: &mut Assembly,
    old: &[String],
    components: Vec<PlacedComponent>,
) -> PipeResult<()> {
    if let Some(taken) = components
        .iter()
        .map(PlacedComponent::id)
        .find(|id| doc.contains(id) && !old.iter().any(|o| o == id))
    {
        return Err(PipeError::DuplicateComponent {
            id: taken.to_string(),
        });
    }
    for id in old {
        doc.remove(id);
    }
    for component in components {
        doc.add(component)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn polyline(points: &[[f64; 3]]) -> Path {
        let points: Vec<_> = points.iter().map(|p| Point3::from(*p)).collect();
        let Ok(path) = Path::from_points(&points) else {
            panic!("at least two points");
        };
        path
    }

    fn assemble(path: &Path) -> Vec<Piece> {
        let Ok(pieces) = PathAssembler::default().assemble(path, &LineParams::default(), "L") else {
            panic!("path should assemble");
        };
        pieces
    }

    #[test]
    fn test_collinear_segments_get_no_bend() {
        let pieces = assemble(&polyline(&[[0.0; 3], [500.0, 0.0, 0.0], [1200.0, 0.0, 0.0]]));
        assert_eq!(pieces.len(), 2);
        assert!(pieces.iter().all(|p| p.kind == PieceKind::Tube));
        assert_eq!(pieces[1].component.id(), "L_Tube002");
    }

    #[test]
    fn test_corner_bend_meets_trimmed_pipes() {
        let pieces = assemble(&polyline(&[[0.0; 3], [1000.0, 0.0, 0.0], [1000.0, 0.0, 800.0]]));
        let kinds: Vec<_> = pieces.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PieceKind::Tube, PieceKind::Corner, PieceKind::Tube]);

        let [first, bend, second] = &pieces[..] else {
            panic!("three pieces");
        };
        for (tube, tube_port, bend_port) in [(first, 1, 0), (second, 0, 1)] {
            let (Ok(a), Ok(b)) = (
                tube.component.world_port(tube_port),
                bend.component.world_port(bend_port),
            ) else {
                panic!("ports exist");
            };
            assert_relative_eq!(a.position, b.position, epsilon = 1e-9);
            assert_relative_eq!(
                a.direction.into_inner(),
                -b.direction.into_inner(),
                epsilon = 1e-9
            );
        }
        assert_eq!(bend.component.spec().bend_angle().map(f64::round), Some(90.0));
    }

    #[test]
    fn test_short_segment_fails() {
        let path = polyline(&[[0.0; 3], [1000.0, 0.0, 0.0], [1000.0, 60.0, 0.0], [0.0, 60.0, 0.0]]);
        let result = PathAssembler::default().assemble(&path, &LineParams::default(), "L");
        assert!(result.is_err_and(|e| e.is_dimension()));
    }

    #[test]
    fn test_reversal_is_degenerate() {
        let path = polyline(&[[0.0; 3], [1000.0, 0.0, 0.0], [200.0, 0.0, 0.0]]);
        let result = PathAssembler::default().assemble(&path, &LineParams::default(), "L");
        assert!(result.is_err_and(|e| e.is_degenerate()));
    }

    #[test]
    fn test_arc_segment_becomes_bend_of_its_radius() {
        let Ok(arc) = Segment::arc(
            Point3::new(1000.0, 300.0, 0.0),
            Point3::new(1000.0, 0.0, 0.0),
            Vector3::z(),
            FRAC_PI_2,
        ) else {
            panic!("arc normal is valid");
        };
        let path = Path::new(vec![
            Segment::line(Point3::origin(), Point3::new(1000.0, 0.0, 0.0)),
            arc,
            Segment::line(Point3::new(1300.0, 300.0, 0.0), Point3::new(1300.0, 900.0, 0.0)),
        ]);
        let pieces = assemble(&path);
        assert_eq!(pieces.len(), 3);
        let bend = &pieces[1];
        assert_eq!(bend.kind, PieceKind::Arc);
        let Ok(exit) = bend.component.world_port(1) else {
            panic!("bend port");
        };
        assert_relative_eq!(exit.position, Point3::new(1300.0, 300.0, 0.0), epsilon = 1e-9);
        // Tangent neighbors are not trimmed.
        assert_eq!(pieces[0].component.height(), Some(1000.0));
    }

    #[test]
    fn test_drop_with_lateral_drift_assembles() {
        let path = polyline(&[[0.0, 0.0, 1000.0], [1e-5, 0.0, 0.0]]);
        let pieces = assemble(&path);
        assert_eq!(pieces.len(), 1);
        let Ok(bottom) = pieces[0].component.world_port_position(1) else {
            panic!("tube port");
        };
        assert_relative_eq!(bottom, Point3::new(1e-5, 0.0, 0.0), epsilon = 1e-9);
    }
}
