//! Components positioned in the world.
//!
//! A [`PlacedComponent`] couples a dimension record with the component it
//! builds and a local-to-world placement. Port queries are answered in world
//! coordinates.

use pipe_fittings::{BuiltComponent, ComponentBuilder, ComponentSpec};
use pipe_types::{
    ComponentFamily, PipeError, PipeResult, Placement, Point3, Port, ShapeRequest, Unit, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A built component with an identity and a placement.
///
/// # Example
///
/// ```
/// use pipe_fittings::PipeDims;
/// use pipe_place::PlacedComponent;
/// use nalgebra::{Isometry3, Vector3};
///
/// let pipe = PlacedComponent::new("pipe-1", PipeDims::default().into())
///     .unwrap()
///     .with_placement(Isometry3::translation(0.0, 0.0, 100.0));
///
/// let top = pipe.world_port_position(1).unwrap();
/// assert!((top.z - 1100.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedComponent {
    /// Unique identifier within an assembly.
    id: String,

    /// Dimension record the component was built from.
    spec: ComponentSpec,

    /// Solid recipe and ports in the local frame.
    built: BuiltComponent,

    /// Local-to-world transform.
    placement: Placement,

    /// Pressure or schedule rating, e.g. `"SCH-STD"`.
    rating: Option<String>,
}

impl PlacedComponent {
    /// Builds `spec` and places it at the world origin.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error when the record is inconsistent.
    pub fn new(id: impl Into<String>, spec: ComponentSpec) -> PipeResult<Self> {
        let built = spec.build()?;
        Ok(Self {
            id: id.into(),
            spec,
            built,
            placement: Placement::identity(),
            rating: None,
        })
    }

    /// Same component at a different placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Same component with a rating label.
    #[must_use]
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Get the component ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the dimension record.
    #[must_use]
    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    /// Get the built recipe and local ports.
    #[must_use]
    pub fn built(&self) -> &BuiltComponent {
        &self.built
    }

    /// Family of the component.
    #[must_use]
    pub fn family(&self) -> ComponentFamily {
        self.built.family
    }

    /// Get the rating label.
    #[must_use]
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref()
    }

    /// Get the local-to-world transform.
    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Replace the local-to-world transform.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Replaces the dimension record and rebuilds.
    ///
    /// The placement is kept. On error the component is left unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error when the new record is inconsistent.
    pub fn set_spec(&mut self, spec: ComponentSpec) -> PipeResult<()> {
        let built = spec.build()?;
        self.spec = spec;
        self.built = built;
        Ok(())
    }

    /// Edits a copy of the dimension record and rebuilds from it.
    ///
    /// # Errors
    ///
    /// Returns the edit's or the builder's error; the component is then left
    /// unchanged.
    pub fn update_spec<F>(&mut self, edit: F) -> PipeResult<()>
    where
        F: FnOnce(&mut ComponentSpec) -> PipeResult<()>,
    {
        let mut spec = self.spec.clone();
        edit(&mut spec)?;
        self.set_spec(spec)
    }

    // =========================================================================
    // World-frame queries
    // =========================================================================

    /// Number of ports.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.built.ports.len()
    }

    /// Port `index` in world coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] if the component has no such port.
    pub fn world_port(&self, index: usize) -> PipeResult<Port> {
        self.built
            .ports
            .get(index)
            .map(|port| port.transformed(&self.placement))
            .ok_or_else(|| PipeError::PortOutOfRange {
                id: self.id.clone(),
                index,
                count: self.port_count(),
            })
    }

    /// World position of port `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] if the component has no such port.
    pub fn world_port_position(&self, index: usize) -> PipeResult<Point3<f64>> {
        Ok(self.world_port(index)?.position)
    }

    /// World outward direction of port `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] if the component has no such port.
    pub fn world_port_direction(&self, index: usize) -> PipeResult<Unit<Vector3<f64>>> {
        Ok(self.world_port(index)?.direction)
    }

    /// All ports in world coordinates.
    pub fn world_ports(&self) -> impl Iterator<Item = Port> {
        self.built
            .ports
            .iter()
            .map(|port| port.transformed(&self.placement))
    }

    /// World origin of the local frame.
    #[must_use]
    pub fn base(&self) -> Point3<f64> {
        Point3::from(self.placement.translation.vector)
    }

    /// World image of a local direction.
    #[must_use]
    pub fn world_axis(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.placement.rotation * local
    }

    /// World image of the local Z axis; the run direction of straight members.
    #[must_use]
    pub fn axis(&self) -> Unit<Vector3<f64>> {
        self.placement.rotation * Vector3::z_axis()
    }

    /// Index of the port nearest to a world point.
    #[must_use]
    pub fn nearest_port(&self, point: &Point3<f64>) -> Option<usize> {
        let local = self.placement.inverse_transform_point(point);
        self.built.ports.nearest(&local)
    }

    /// The solid recipe carried to the world frame.
    #[must_use]
    pub fn world_shape(&self) -> ShapeRequest {
        self.built.shape.clone().transformed(self.placement)
    }

    /// Length of a straight member.
    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.spec.height()
    }
}
