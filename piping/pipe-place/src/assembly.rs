//! The placed-component table.
//!
//! An [`Assembly`] is the document-side object table: placed components in
//! insertion order, looked up by ID, plus the union groups that merge branch
//! pipes into their header.

use hashbrown::HashMap;
use pipe_types::{PipeError, PipeResult, Port, ShapeRequest};
use tracing::{debug, info};

use crate::engine::PlacementEngine;
use crate::placed::PlacedComponent;

/// A header pipe and the branches merged into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionGroup {
    header: String,
    members: Vec<String>,
}

impl UnionGroup {
    /// Get the header ID.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Get the merged branch IDs, in merge order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Check if a branch is merged into this group.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

/// An insertion-ordered table of placed components.
///
/// # Example
///
/// ```
/// use pipe_fittings::PipeDims;
/// use pipe_place::{Assembly, PlacedComponent, PlacementEngine};
///
/// let mut assembly = Assembly::new("line-1");
/// let id = assembly.unique_id("Tube");
/// assembly.add(PlacedComponent::new(&id, PipeDims::default().into()).unwrap()).unwrap();
/// let next = assembly.unique_id("Tube");
/// assembly.add(PlacedComponent::new(&next, PipeDims::default().into()).unwrap()).unwrap();
///
/// PlacementEngine::default().join(&mut assembly, &id, 1, &next, 0).unwrap();
/// let far = assembly.get(&next).unwrap().world_port_position(1).unwrap();
/// assert!((far.z - 2000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Assembly name.
    name: String,

    /// Components in insertion order.
    components: Vec<PlacedComponent>,

    /// Position of each ID in `components`.
    index: HashMap<String, usize>,

    /// Header merges recorded by branch routing.
    unions: Vec<UnionGroup>,
}

impl Assembly {
    /// Create a new empty assembly.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get the assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Component Management
    // =========================================================================

    /// Add a component.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::DuplicateComponent`] if the ID is taken.
    pub fn add(&mut self, component: PlacedComponent) -> PipeResult<()> {
        if self.index.contains_key(component.id()) {
            return Err(PipeError::DuplicateComponent {
                id: component.id().to_string(),
            });
        }
        self.index
            .insert(component.id().to_string(), self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Remove a component.
    ///
    /// Returns the removed component, or `None` if not found. The component
    /// also leaves every union group; a group whose header is removed is
    /// dropped.
    pub fn remove(&mut self, id: &str) -> Option<PlacedComponent> {
        let position = self.index.remove(id)?;
        let removed = self.components.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.unions.retain(|group| group.header != id);
        for group in &mut self.unions {
            group.members.retain(|m| m != id);
        }
        debug!(id, "Removed component");
        Some(removed)
    }

    /// Get a component by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PlacedComponent> {
        self.index.get(id).map(|&i| &self.components[i])
    }

    /// Get a mutable reference to a component by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlacedComponent> {
        self.index.get(id).map(|&i| &mut self.components[i])
    }

    /// Get a component by ID or fail.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] if there is no such ID.
    pub fn require(&self, id: &str) -> PipeResult<&PlacedComponent> {
        self.get(id).ok_or_else(|| PipeError::not_found(id))
    }

    /// Get a mutable component by ID or fail.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] if there is no such ID.
    pub fn require_mut(&mut self, id: &str) -> PipeResult<&mut PlacedComponent> {
        self.get_mut(id).ok_or_else(|| PipeError::not_found(id))
    }

    /// Replaces a component with an updated copy of itself.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] if the ID is not in the table.
    pub fn replace(&mut self, component: PlacedComponent) -> PipeResult<()> {
        let slot = self.require_mut(component.id())?;
        *slot = component;
        Ok(())
    }

    /// Check if a component exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over components in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedComponent> {
        self.components.iter()
    }

    /// Get an iterator over component IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(PlacedComponent::id)
    }

    /// Get the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the assembly is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// First free ID of the form `prefix`, `prefix001`, `prefix002`, ...
    #[must_use]
    pub fn unique_id(&self, prefix: &str) -> String {
        if !self.contains(prefix) {
            return prefix.to_string();
        }
        (1_usize..)
            .map(|n| format!("{prefix}{n:03}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| format!("{prefix}{}", self.len()))
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// World port of a component.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] or [`PipeError::PortOutOfRange`].
    pub fn world_port(&self, id: &str, port: usize) -> PipeResult<Port> {
        self.require(id)?.world_port(port)
    }

    /// Mates port `port_m` of `moving` onto port `port_s` of `stationary`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] when both IDs are the same,
    /// [`PipeError::ComponentNotFound`] for a missing ID, or the engine's
    /// error.
    pub fn mate(
        &mut self,
        engine: &PlacementEngine,
        moving: &str,
        port_m: usize,
        stationary: &str,
        port_s: usize,
    ) -> PipeResult<()> {
        if moving == stationary {
            return Err(PipeError::invalid_selection(format!(
                "cannot mate '{moving}' onto itself"
            )));
        }
        let target = self.world_port(stationary, port_s)?;
        let component = self.require_mut(moving)?;
        engine.mate_to(
            component,
            port_m,
            target.position,
            target.direction.into_inner(),
        )
    }

    // =========================================================================
    // Union Groups
    // =========================================================================

    /// Records that `member` is merged into `header`.
    ///
    /// Returns `false` when the merge was already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] if either ID is missing, or
    /// [`PipeError::InvalidSelection`] if they are the same.
    pub fn record_union(&mut self, header: &str, member: &str) -> PipeResult<bool> {
        self.require(header)?;
        self.require(member)?;
        if header == member {
            return Err(PipeError::invalid_selection(format!(
                "'{header}' cannot be merged into itself"
            )));
        }
        let group = match self.unions.iter().position(|g| g.header == header) {
            Some(i) => &mut self.unions[i],
            None => {
                self.unions.push(UnionGroup {
                    header: header.to_string(),
                    members: Vec::new(),
                });
                let last = self.unions.len() - 1;
                &mut self.unions[last]
            }
        };
        if group.contains(member) {
            return Ok(false);
        }
        group.members.push(member.to_string());
        info!(header, member, "Merged branch into header");
        Ok(true)
    }

    /// Union group of a header, if any merge was recorded.
    #[must_use]
    pub fn union_group(&self, header: &str) -> Option<&UnionGroup> {
        self.unions.iter().find(|g| g.header == header)
    }

    /// All union groups.
    #[must_use]
    pub fn unions(&self) -> &[UnionGroup] {
        &self.unions
    }

    /// World-frame solid of a header fused with its merged branches.
    #[must_use]
    pub fn union_shape(&self, header: &str) -> Option<ShapeRequest> {
        let group = self.union_group(header)?;
        let mut shape = self.get(header)?.world_shape();
        for member in &group.members {
            if let Some(component) = self.get(member) {
                shape = shape.fuse(component.world_shape());
            }
        }
        Some(shape)
    }
}
