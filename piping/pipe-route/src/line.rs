//! Pipe lines: containers that regenerate their pipes and bends from a path.

use pipe_place::{Assembly, PlacedComponent};
use pipe_types::PipeResult;
use tracing::{debug, info};

use crate::assembler::{commit, PathAssembler, PieceKind};
use crate::config::LineParams;
use crate::path::Path;

/// A named pipe line.
///
/// The line owns the pipes and bends it generates along its path and
/// rebuilds all of them whenever the path or the section changes. Fittings
/// inserted by hand can be adopted; they stay in the line but are neither
/// regenerated nor purged. Without a path the line is a plain container.
///
/// # Example
///
/// ```
/// use pipe_place::Assembly;
/// use pipe_route::{LineParams, Path, PipeLine};
/// use nalgebra::Point3;
///
/// let mut doc = Assembly::new("plant");
/// let mut line = PipeLine::new("L1", LineParams::default());
/// let path = Path::from_points(&[
///     Point3::origin(),
///     Point3::new(0.0, 0.0, 2000.0),
///     Point3::new(1500.0, 0.0, 2000.0),
/// ])
/// .unwrap();
///
/// line.set_path(&mut doc, path).unwrap();
/// assert_eq!(doc.len(), 3);
///
/// line.set_outer_diameter(&mut doc, 88.9).unwrap();
/// assert_eq!(doc.len(), 3);
/// assert!((line.params().bend_radius() - 66.675).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct PipeLine {
    name: String,
    params: LineParams,
    path: Option<Path>,
    assembler: PathAssembler,
    /// Pipes and bends made by the last rebuild, in path order.
    generated: Vec<String>,
    /// Fittings added by hand.
    adopted: Vec<String>,
}

impl PipeLine {
    /// Creates an empty line.
    #[must_use]
    pub fn new(name: impl Into<String>, params: LineParams) -> Self {
        Self {
            name: name.into(),
            params,
            path: None,
            assembler: PathAssembler::default(),
            generated: Vec::new(),
            adopted: Vec::new(),
        }
    }

    /// Same line using a different assembler.
    #[must_use]
    pub fn with_assembler(mut self, assembler: PathAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Get the line name.
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

    /// IDs of the generated pipes and bends, in path order.
    #[must_use]
    pub fn generated(&self) -> &[String] {
        &self.generated
    }

    /// IDs of adopted fittings.
    #[must_use]
    pub fn adopted(&self) -> &[String] {
        &self.adopted
    }

    /// Returns `true` if the component belongs to this line.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.generated.iter().chain(&self.adopted).any(|m| m == id)
    }

    // =========================================================================
    // Rebuild
    // =========================================================================

    /// Purges the generated components and builds them again from the path.
    ///
    /// Returns the number of generated components. New components are all
    /// computed first; on error nothing in `doc` changes.
    ///
    /// # Errors
    ///
    /// Returns the assembler's error, or [`pipe_types::PipeError::DuplicateComponent`]
    /// if a generated ID is already used by a component outside the line.
    pub fn rebuild(&mut self, doc: &mut Assembly) -> PipeResult<usize> {
        let path = self.path.clone();
        let params = self.params.clone();
        self.rebuild_with(doc, path, params)
    }

    /// Replaces the path and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild); the old path is kept on error.
    pub fn set_path(&mut self, doc: &mut Assembly, path: Path) -> PipeResult<usize> {
        self.rebuild_with(doc, Some(path), self.params.clone())
    }

    /// Changes the outside diameter, resets the bend radius to match it and
    /// rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild); the old section is kept on error.
    pub fn set_outer_diameter(&mut self, doc: &mut Assembly, od: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_outer_diameter(od);
        self.rebuild_with(doc, self.path.clone(), params)
    }

    /// Changes the wall thickness and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild); the old section is kept on error.
    pub fn set_thickness(&mut self, doc: &mut Assembly, thk: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_thickness(thk);
        self.rebuild_with(doc, self.path.clone(), params)
    }

    /// Changes the bend radius and rebuilds.
    ///
    /// # Errors
    ///
    /// See [`rebuild`](Self::rebuild); the old section is kept on error.
    pub fn set_bend_radius(&mut self, doc: &mut Assembly, radius: f64) -> PipeResult<usize> {
        let params = self.params.clone().with_bend_radius(radius);
        self.rebuild_with(doc, self.path.clone(), params)
    }

    fn rebuild_with(
        &mut self,
        doc: &mut Assembly,
        path: Option<Path>,
        params: LineParams,
    ) -> PipeResult<usize> {
        let pieces = match &path {
            Some(path) => self.assembler.assemble(path, &params, &self.name)?,
            None => Vec::new(),
        };
        let bends = pieces.iter().filter(|p| p.kind != PieceKind::Tube).count();
        let ids: Vec<String> = pieces
            .iter()
            .map(|p| p.component.id().to_string())
            .collect();
        commit(
            doc,
            &self.generated,
            pieces.into_iter().map(|p| p.component).collect(),
        )?;

        info!(
            line = %self.name,
            tubes = ids.len() - bends,
            bends,
            "Rebuilt pipe line"
        );
        self.generated = ids;
        self.path = path;
        self.params = params;
        Ok(self.generated.len())
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Adds a hand-placed fitting to `doc` as a member of this line.
    ///
    /// # Errors
    ///
    /// Returns [`pipe_types::PipeError::DuplicateComponent`] if the ID is
    /// taken.
    pub fn adopt(&mut self, doc: &mut Assembly, component: PlacedComponent) -> PipeResult<()> {
        let id = component.id().to_string();
        doc.add(component)?;
        debug!(line = %self.name, id = %id, "Adopted component");
        self.adopted.push(id);
        Ok(())
    }

    /// Removes the generated pipes and bends from `doc`, keeping adopted
    /// fittings. Returns the number removed.
    pub fn purge(&mut self, doc: &mut Assembly) -> usize {
        let removed = self
            .generated
            .drain(..)
            .filter(|id| doc.remove(id).is_some())
            .count();
        self.adopted.retain(|id| doc.contains(id));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use pipe_fittings::FlangeDims;

    fn l_path(leg: f64) -> Path {
        let Ok(path) = Path::from_points(&[
            Point3::origin(),
            Point3::new(leg, 0.0, 0.0),
            Point3::new(leg, leg, 0.0),
        ]) else {
            panic!("three points");
        };
        path
    }

    #[test]
    fn test_rebuild_replaces_generated() {
        let mut doc = Assembly::new("doc");
        let mut line = PipeLine::new("L1", LineParams::default());
        assert!(matches!(line.set_path(&mut doc, l_path(1000.0)), Ok(3)));
        let first: Vec<String> = line.generated().to_vec();

        assert!(matches!(line.set_bend_radius(&mut doc, 90.0), Ok(3)));
        assert_eq!(doc.len(), 3);
        assert_eq!(line.generated(), &first[..]);
        let Some(height) = doc.get("L1_Tube001").and_then(PlacedComponent::height) else {
            panic!("first tube exists");
        };
        assert!((height - 910.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_rebuild_keeps_everything() {
        let mut doc = Assembly::new("doc");
        let mut line = PipeLine::new("L1", LineParams::default());
        let Ok(path) = Path::from_points(&[
            Point3::origin(),
            Point3::new(1000.0, 0.0, 0.0),
            Point3::new(1000.0, 1000.0, 0.0),
            Point3::new(0.0, 1000.0, 0.0),
        ]) else {
            panic!("four points");
        };
        assert!(matches!(line.set_path(&mut doc, path), Ok(5)));
        let before: Vec<_> = doc.iter().cloned().collect();

        // Two bends of radius 800 do not fit on the 1000 mm middle leg.
        assert!(line.set_bend_radius(&mut doc, 800.0).is_err());
        assert!((line.params().bend_radius() - 45.225).abs() < 1e-12);
        assert_eq!(doc.iter().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_purge_keeps_adopted() {
        let mut doc = Assembly::new("doc");
        let mut line = PipeLine::new("L1", LineParams::default());
        assert!(line.set_path(&mut doc, l_path(1000.0)).is_ok());
        let Ok(flange) = PlacedComponent::new("F1", FlangeDims::default().into()) else {
            panic!("flange should build");
        };
        assert!(line.adopt(&mut doc, flange).is_ok());
        assert!(line.contains("F1"));

        assert_eq!(line.purge(&mut doc), 3);
        assert_eq!(doc.ids().collect::<Vec<_>>(), vec!["F1"]);
        assert_eq!(line.adopted(), &["F1".to_string()]);
    }

    #[test]
    fn test_rebuild_refuses_foreign_id() {
        let mut doc = Assembly::new("doc");
        let Ok(squatter) = PlacedComponent::new("L1_Tube001", FlangeDims::default().into()) else {
            panic!("flange should build");
        };
        assert!(doc.add(squatter).is_ok());
        let mut line = PipeLine::new("L1", LineParams::default());
        assert!(line.set_path(&mut doc, l_path(1000.0)).is_err());
        assert_eq!(doc.len(), 1);
        assert!(line.path().is_none());
    }
}
