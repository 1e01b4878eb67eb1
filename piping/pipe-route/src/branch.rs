//! Pipe branches: lines whose tubes can be offset per segment.

use hashbrown::HashMap;
use nalgebra::Vector3;
use pipe_place::{Assembly, PlacedComponent, PlacementEngine};
use pipe_types::{PipeError, PipeResult, Placement};
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assembler::{commit, PathAssembler, Piece, PieceKind};
use crate::config::LineParams;
use crate::path::Path;

/// Local adjustment of one branch tube.
///
/// `tail` lengthens the tube backwards past its start and `head` forwards
/// past its end; negative values shorten it. `spin` turns the tube about its
/// own axis, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentOffset {
    /// Extension before the tube start.
    pub tail: f64,
    /// Extension after the tube end.
    pub head: f64,
    /// Rotation about the tube axis, in radians.
    pub spin: f64,
}

impl SegmentOffset {
    /// Offset with the given extensions and no spin.
    #[must_use]
    pub const fn new(tail: f64, head: f64) -> Self {
        Self {
            tail,
            head,
            spin: 0.0,
        }
    }

    /// Sets the spin.
    #[must_use]
    pub const fn with_spin(mut self, spin: f64) -> Self {
        self.spin = spin;
        self
    }

    /// Returns `true` if the offset changes nothing.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.tail == 0.0 && self.head == 0.0 && self.spin == 0.0
    }
}

/// A single-path branch with separately tracked tubes and curves.
///
/// Rebuilds like [`PipeLine`](crate::PipeLine), then applies each
/// segment's [`SegmentOffset`] to its tube alone, so neighbors keep their
/// placement.
///
/// # Example
///
/// ```
/// use pipe_place::Assembly;
/// use pipe_route::{LineParams, Path, PipeBranch, SegmentOffset};
/// use nalgebra::Point3;
///
/// let mut doc = Assembly::new("plant");
/// let path = Path::from_points(&[Point3::origin(), Point3::new(0.0, 0.0, 1000.0)]).unwrap();
/// let mut branch = PipeBranch::new("B1", LineParams::default());
/// branch.set_path(&mut doc, path).unwrap();
///
/// branch.set_offset(&mut doc, 0, SegmentOffset::new(50.0, 0.0)).unwrap();
/// let tube = doc.get(&branch.tubes()[0]).unwrap();
/// assert!((tube.height().unwrap() - 1050.0).abs() < 1e-9);
/// assert!((tube.base().z + 50.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct PipeBranch {
    name: String,
    params: LineParams,
    path: Option<Path>,
    assembler: PathAssembler,
    offsets: HashMap<usize, SegmentOffset>,
    tubes: Vec<String>,
    curves: Vec<String>,
}

impl PipeBranch {
    /// Creates an empty branch.
    #[must_use]
    pub fn new(name: impl Into<String>, params: LineParams) -> Self {
        Self {
            name: name.into(),
            params,
            path: None,
            assembler: PathAssembler::default(),
            offsets: HashMap::new(),
            tubes: Vec::new(),
            curves: Vec::new(),
        }
    }

    /// Get the branch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the section parameters.
    #[must_use]
    pub fn params(&self) -> &LineParams {
        &self.params
    }

    /// Get the path, if one is set.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// IDs of the generated tubes, in path order.
    #[must_use]
    pub fn tubes(&self) -> &[String] {
        &self.tubes
    }

    /// IDs of the generated bends, in path order.
    #[must_use]
    pub fn curves(&self) -> &[String] {
        &self.curves
    }

    /// Offset of a segment; zero when none is set.
    #[must_use]
    pub fn offset(&self, segment: usize) -> SegmentOffset {
        self.offsets.get(&segment).copied().unwrap_or_default()
    }

    /// Purges and rebuilds every tube and curve.
    ///
    /// # Errors
    ///
    /// Returns the assembler's error, [`PipeError::DimensionInconsistency`]
    /// if an offset leaves a tube without length, or
    /// [`PipeError::DuplicateComponent`] for an ID clash. On error `doc` is
    /// unchanged.
    pub fn rebuild(&mut self, doc: &mut Assembly) -> PipeResult<usize> {
        let (path, params, offsets) = (self.path.clone(), self.params.clone(), self.offsets.clone());
        self.rebuild_with(doc, path, params, offsets)
    }

    /// Replaces the path and rebuilds. Offsets of segments past the end of
    /// the new path are dropped.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild).
    pub fn set_path(&mut self, doc: &mut Assembly, path: Path) -> PipeResult<usize> {
        let mut offsets = self.offsets.clone();
        offsets.retain(|&segment, _| segment < path.len());
        self.rebuild_with(doc, Some(path), self.params.clone(), offsets)
    }

    /// Changes the outside diameter, resets the bend radius and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild).
    pub fn set_outer_diameter(&mut self, doc: &mut Assembly, od: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_outer_diameter(od);
        self.rebuild_with(doc, self.path.clone(), params, self.offsets.clone())
    }

    /// Changes the wall thickness and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild).
    pub fn set_thickness(&mut self, doc: &mut Assembly, thk: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_thickness(thk);
        self.rebuild_with(doc, self.path.clone(), params, self.offsets.clone())
    }

    /// Changes the bend radius and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild).
    pub fn set_bend_radius(&mut self, doc: &mut Assembly, radius: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_bend_radius(radius);
        self.rebuild_with(doc, self.path.clone(), params, self.offsets.clone())
    }

    /// Sets the offset of a straight segment's tube and rebuilds.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] if the segment does not exist
    /// or is an arc, otherwise see [`rebuild`](Self::rebuild).
    pub fn set_offset(
        &mut self,
        doc: &mut Assembly,
        segment: usize,
        offset: SegmentOffset,
    ) -> PipeResult<usize> {
        let is_line = self
            .path
            .as_ref()
            .and_then(|path| path.segments().get(segment))
            .is_some_and(crate::path::Segment::is_line);
        if !is_line {
            return Err(PipeError::invalid_selection(format!(
                "'{}' has no straight segment {segment}",
                self.name
            )));
        }
        let mut offsets = self.offsets.clone();
        if offset.is_zero() {
            offsets.remove(&segment);
        } else {
            offsets.insert(segment, offset);
        }
        self.rebuild_with(doc, self.path.clone(), self.params.clone(), offsets)
    }

    /// Removes every tube and curve from `doc`. Returns the number removed.
    pub fn purge(&mut self, doc: &mut Assembly) -> usize {
        self.tubes
            .drain(..)
            .chain(self.curves.drain(..))
            .filter(|id| doc.remove(id).is_some())
            .count()
    }

    fn rebuild_with(
        &mut self,
        doc: &mut Assembly,
        path: Option<Path>,
        params: LineParams,
        offsets: HashMap<usize, SegmentOffset>,
    ) -> PipeResult<usize> {
        let mut pieces = match &path {
            Some(path) => self.assembler.assemble(path, &params, &self.name)?,
            None => Vec::new(),
        };
        let engine = self.assembler.engine();
        for piece in pieces.iter_mut().filter(|p| p.kind == PieceKind::Tube) {
            if let Some(offset) = offsets.get(&piece.segment) {
                apply_offset(engine, &mut piece.component, offset)?;
            }
        }

        let ids_of = |kind: fn(&Piece) -> bool| -> Vec<String> {
            pieces
                .iter()
                .filter(|p| kind(p))
                .map(|p| p.component.id().to_string())
                .collect()
        };
        let tubes = ids_of(|p| p.kind == PieceKind::Tube);
        let curves = ids_of(|p| p.kind != PieceKind::Tube);

        let old: Vec<String> = self.tubes.iter().chain(&self.curves).cloned().collect();
        commit(doc, &old, pieces.into_iter().map(|p| p.component).collect())?;

        info!(
            branch = %self.name,
            tubes = tubes.len(),
            curves = curves.len(),
            offsets = offsets.len(),
            "Rebuilt pipe branch"
        );
        self.tubes = tubes;
        self.curves = curves;
        self.path = path;
        self.params = params;
        self.offsets = offsets;
        Ok(self.tubes.len() + self.curves.len())
    }
}

/// Lengthens a tube by `tail + head`, shifts it back by `tail` and spins it
/// about its own axis.
fn apply_offset(
    engine: &PlacementEngine,
    tube: &mut PlacedComponent,
    offset: &SegmentOffset,
) -> PipeResult<()> {
    let Some(height) = tube.height() else {
        return Err(PipeError::invalid_selection(format!(
            "'{}' is not a straight member",
            tube.id()
        )));
    };
    let height = height + offset.tail + offset.head;
    if height <= engine.tolerances().min_length {
        return Err(PipeError::dimension(
            "height",
            format!("offset leaves '{}' with length {height}", tube.id()),
        ));
    }
    tube.update_spec(|spec| spec.set_height(height))?;

    let shift = tube.axis().into_inner() * -offset.tail;
    let mut placement: Placement = *tube.placement();
    placement.translation.vector += shift;
    tube.set_placement(placement);
    if offset.spin != 0.0 {
        engine.rotate_about_axis(tube, &Vector3::z(), offset.spin)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    fn z_path() -> Path {
        let Ok(path) = Path::from_points(&[
            Point3::origin(),
            Point3::new(1000.0, 0.0, 0.0),
            Point3::new(1000.0, 1000.0, 0.0),
            Point3::new(2000.0, 1000.0, 0.0),
        ]) else {
            panic!("four points");
        };
        path
    }

    fn built() -> (Assembly, PipeBranch) {
        let mut doc = Assembly::new("doc");
        let mut branch = PipeBranch::new("B", LineParams::default());
        assert!(matches!(branch.set_path(&mut doc, z_path()), Ok(5)));
        (doc, branch)
    }

    #[test]
    fn test_tubes_and_curves_tracked_apart() {
        let (doc, branch) = built();
        assert_eq!(branch.tubes().len(), 3);
        assert_eq!(branch.curves().len(), 2);
        assert!(branch.curves().iter().all(|id| doc.contains(id)));
    }

    #[test]
    fn test_offset_leaves_neighbors_alone() {
        let (mut doc, mut branch) = built();
        let snapshot = |doc: &Assembly, id: &str| doc.get(id).cloned();
        let first = snapshot(&doc, &branch.tubes()[0]);
        let last = snapshot(&doc, &branch.tubes()[2]);
        let bend = snapshot(&doc, &branch.curves()[0]);

        let offset = SegmentOffset::new(-100.0, 20.0).with_spin(FRAC_PI_2);
        assert!(branch.set_offset(&mut doc, 1, offset).is_ok());

        assert_eq!(snapshot(&doc, &branch.tubes()[0]), first);
        assert_eq!(snapshot(&doc, &branch.tubes()[2]), last);
        assert_eq!(snapshot(&doc, &branch.curves()[0]), bend);

        let Some(middle) = doc.get(&branch.tubes()[1]) else {
            panic!("middle tube exists");
        };
        assert_relative_eq!(
            middle.height().unwrap_or_default(),
            1000.0 - 2.0 * 45.225 - 80.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(middle.base().y, 45.225 + 100.0, epsilon = 1e-9);
        assert_relative_eq!(middle.axis().into_inner(), Vector3::y(), epsilon = 1e-9);
        assert_eq!(branch.offset(1), offset);
    }

    #[test]
    fn test_offset_rejects_missing_segment_and_overshoot() {
        let (mut doc, mut branch) = built();
        let result = branch.set_offset(&mut doc, 9, SegmentOffset::new(1.0, 0.0));
        assert!(result.is_err_and(|e| e.is_invalid_selection()));

        let result = branch.set_offset(&mut doc, 0, SegmentOffset::new(-2000.0, 0.0));
        assert!(result.is_err_and(|e| e.is_dimension()));
        assert_eq!(branch.offset(0), SegmentOffset::default());
    }

    #[test]
    fn test_offsets_survive_rebuild() {
        let (mut doc, mut branch) = built();
        assert!(branch.set_offset(&mut doc, 0, SegmentOffset::new(10.0, 0.0)).is_ok());
        assert!(branch.set_thickness(&mut doc, 4.0).is_ok());
        let Some(tube) = doc.get(&branch.tubes()[0]) else {
            panic!("tube exists");
        };
        assert_relative_eq!(tube.base().x, -10.0, epsilon = 1e-9);
        assert_eq!(branch.purge(&mut doc), 5);
        assert!(doc.is_empty());
    }
}
