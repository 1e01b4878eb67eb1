//! Port mating, bend placement and axial moves.
//!
//! Every operation computes the complete new placement (and, where needed,
//! the new dimension record) before touching the component, so a failed call
//! leaves it as it was.

use std::f64::consts::PI;

use pipe_fittings::{ComponentBuilder, ComponentSpec};
use pipe_types::geom::{shortest_arc, signed_angle};
use pipe_types::{
    PipeError, PipeResult, Placement, Point3, Tolerances, Unit, UnitQuaternion, Vector3,
};
use tracing::debug;

use crate::assembly::Assembly;
use crate::placed::PlacedComponent;

/// Places components relative to each other.
///
/// # Example
///
/// ```
/// use pipe_fittings::PipeDims;
/// use pipe_place::{PlacedComponent, PlacementEngine};
///
/// let engine = PlacementEngine::default();
/// let first = PlacedComponent::new("a", PipeDims::default().into()).unwrap();
/// let mut second = PlacedComponent::new("b", PipeDims::default().into()).unwrap();
///
/// engine.mate(&mut second, 0, &first, 1).unwrap();
/// let far = second.world_port_position(1).unwrap();
/// assert!((far.z - 2000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementEngine {
    tolerances: Tolerances,
}

impl PlacementEngine {
    /// Creates an engine with the given thresholds.
    #[must_use]
    pub const fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Get the thresholds in use.
    #[must_use]
    pub const fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    // =========================================================================
    // Mating
    // =========================================================================

    /// Moves `moving` so its port `port_m` coincides with, and opposes, port
    /// `port_s` of `stationary`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] for a bad port index.
    pub fn mate(
        &self,
        moving: &mut PlacedComponent,
        port_m: usize,
        stationary: &PlacedComponent,
        port_s: usize,
    ) -> PipeResult<()> {
        let target = stationary.world_port(port_s)?;
        self.mate_to(moving, port_m, target.position, target.direction.into_inner())
    }

    /// Mates port `port` of `moving` onto a bare world attachment: afterwards
    /// the port sits at `position` and faces `-direction`.
    ///
    /// When the port already faces `-direction` only a translation is applied.
    /// When it faces `direction` the component is turned half way about an
    /// axis perpendicular to the port.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `direction` has no
    /// length, or [`PipeError::PortOutOfRange`] for a bad port index.
    pub fn mate_to(
        &self,
        moving: &mut PlacedComponent,
        port: usize,
        position: Point3<f64>,
        direction: Vector3<f64>,
    ) -> PipeResult<()> {
        let Some(facing) = direction.try_normalize(1e-12) else {
            return Err(PipeError::degenerate("mating direction has zero length"));
        };
        let current = moving.world_port(port)?;
        let local = moving.built().ports.positions()[port];

        let turn = shortest_arc(&current.direction, &(-facing), self.tolerances.aligned)?;
        let mut placement = *moving.placement();
        placement.rotation = turn * placement.rotation;
        let moved = placement * local;
        placement.translation.vector += position - moved;

        debug!(
            id = moving.id(),
            port,
            angle = turn.angle(),
            "Mated port"
        );
        moving.set_placement(placement);
        Ok(())
    }

    /// Mates port `port2` of `id2` onto port `port1` of `id1` within an
    /// assembly; `id1` stays put.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::ComponentNotFound`] or
    /// [`PipeError::PortOutOfRange`] before anything moves.
    pub fn join(
        &self,
        assembly: &mut Assembly,
        id1: &str,
        port1: usize,
        id2: &str,
        port2: usize,
    ) -> PipeResult<()> {
        for (id, port) in [(id1, port1), (id2, port2)] {
            let component = assembly
                .get(id)
                .ok_or_else(|| PipeError::not_found(id))?;
            if port >= component.port_count() {
                return Err(PipeError::PortOutOfRange {
                    id: id.to_string(),
                    index: port,
                    count: component.port_count(),
                });
            }
        }
        assembly.mate(self, id2, port2, id1, port1)
    }

    // =========================================================================
    // Placement from scratch
    // =========================================================================

    /// Builds `spec` with its local origin at `position` and its local Z
    /// along `z`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `z` has no length, or
    /// the builder's error.
    pub fn place_at(
        &self,
        id: impl Into<String>,
        spec: ComponentSpec,
        position: Point3<f64>,
        z: Vector3<f64>,
    ) -> PipeResult<PlacedComponent> {
        let rotation = shortest_arc(&Vector3::z(), &z, self.tolerances.aligned)?;
        let placement = Placement::from_parts(position.coords.into(), rotation);
        Ok(PlacedComponent::new(id, spec)?.with_placement(placement))
    }

    /// Turns a bend to `angle(v1, v2)` and orients it between the incoming
    /// tangent `v1` and the outgoing tangent `v2`, both taken along the
    /// direction of flow.
    ///
    /// Port 0 ends up facing `-v1` and port 1 facing `v2`. The local corner
    /// (where both port tangents meet) moves to `through` when given;
    /// otherwise the component stays where it is.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] if the component is not a
    /// bend, or [`PipeError::GeometricDegeneracy`] if a tangent is zero or
    /// the tangents are parallel.
    pub fn place_bend(
        &self,
        bend: &mut PlacedComponent,
        v1: &Vector3<f64>,
        v2: &Vector3<f64>,
        through: Option<Point3<f64>>,
    ) -> PipeResult<()> {
        if !bend.family().is_bend() {
            return Err(PipeError::invalid_selection(format!(
                "'{}' is a {}, not a bend",
                bend.id(),
                bend.family()
            )));
        }
        let (Some(v1), Some(v2)) = (v1.try_normalize(1e-12), v2.try_normalize(1e-12)) else {
            return Err(PipeError::degenerate("bend tangent has zero length"));
        };
        let Some(ortho) = v1.cross(&v2).try_normalize(self.tolerances.parallel) else {
            return Err(PipeError::degenerate(
                "bend tangents are parallel, no bend plane",
            ));
        };
        let angle = v1.angle(&v2);

        let mut spec = bend.spec().clone();
        spec.set_bend_angle(angle.to_degrees())?;
        let built = spec.build()?;
        let [d0, d1] = built.ports.directions() else {
            return Err(PipeError::invalid_selection("bend must have two ports"));
        };
        let local_normal = d1.cross(d0);
        let local_bisector = d0.into_inner() + d1.into_inner();

        let tilt = shortest_arc(&local_normal, &ortho, self.tolerances.aligned)?;
        let spin = signed_angle(&(tilt * local_bisector), &(v2 - v1), &ortho);
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(ortho), spin) * tilt;
        let base = through.unwrap_or_else(|| bend.base());

        bend.set_spec(spec)?;
        bend.set_placement(Placement::from_parts(base.coords.into(), rotation));
        debug!(
            id = bend.id(),
            angle = angle.to_degrees(),
            x = base.x,
            y = base.y,
            z = base.z,
            "Placed bend"
        );
        Ok(())
    }

    // =========================================================================
    // Rotations
    // =========================================================================

    /// Rotates a component by `angle` radians about one of its local
    /// directions, taken through its local origin.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `local_axis` is zero.
    pub fn rotate_about_axis(
        &self,
        component: &mut PlacedComponent,
        local_axis: &Vector3<f64>,
        angle: f64,
    ) -> PipeResult<()> {
        let world = Unit::try_new(component.world_axis(local_axis), 1e-12)
            .ok_or_else(|| PipeError::degenerate("rotation axis has zero length"))?;
        let mut placement = *component.placement();
        placement.rotation = UnitQuaternion::from_axis_angle(&world, angle) * placement.rotation;
        component.set_placement(placement);
        Ok(())
    }

    /// Spins a component by `angle` radians about the axis of one of its
    /// ports, keeping that port where it is.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] for a bad port index.
    pub fn rotate_about_port(
        &self,
        component: &mut PlacedComponent,
        port: usize,
        angle: f64,
    ) -> PipeResult<()> {
        let before = component.world_port(port)?;
        let mut placement = *component.placement();
        placement.rotation =
            UnitQuaternion::from_axis_angle(&before.direction, angle) * placement.rotation;
        let local = component.built().ports.positions()[port];
        placement.translation.vector += before.position - placement * local;
        component.set_placement(placement);
        Ok(())
    }

    /// Flips a component half a turn about its local X axis.
    ///
    /// With a `pivot`, the component is then moved by twice the signed axial
    /// offset from its base to the pivot, so a pivot on the axis keeps its
    /// position.
    ///
    /// # Errors
    ///
    /// Never fails for a rigid placement; the result type matches the other
    /// operations.
    pub fn reverse(
        &self,
        component: &mut PlacedComponent,
        pivot: Option<&Point3<f64>>,
    ) -> PipeResult<()> {
        let axis = component.axis();
        let base = component.base();
        self.rotate_about_axis(component, &Vector3::x(), PI)?;
        if let Some(pivot) = pivot {
            let shift = axis.into_inner() * (2.0 * (pivot - base).dot(&axis));
            let mut placement = *component.placement();
            placement.translation.vector += shift;
            component.set_placement(placement);
        }
        debug!(id = component.id(), "Reversed component");
        Ok(())
    }

    // =========================================================================
    // Straight members
    // =========================================================================

    /// Extends or trims a straight member along its axis so the end nearer
    /// to the projection of `target` lands on it.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] if the member is not straight,
    /// or [`PipeError::DimensionInconsistency`] if the remaining length would
    /// not be positive. The member is left unchanged on error.
    pub fn trim_to(&self, member: &mut PlacedComponent, target: &Point3<f64>) -> PipeResult<()> {
        let Some(height) = member.height() else {
            return Err(PipeError::invalid_selection(format!(
                "'{}' is a {}, not a straight member",
                member.id(),
                member.family()
            )));
        };
        let axis = member.axis();
        let base = member.base();
        let s_base = (target - base).dot(&axis);
        let s_top = s_base - height;

        let (new_base, new_height) = if s_top.abs() < s_base.abs() {
            (base, s_base)
        } else {
            (base + axis.into_inner() * s_base, height - s_base)
        };
        if new_height <= self.tolerances.min_length {
            return Err(PipeError::dimension(
                "height",
                format!(
                    "trimming '{}' to the target leaves length {new_height}",
                    member.id()
                ),
            ));
        }

        member.update_spec(|spec| spec.set_height(new_height))?;
        let mut placement = *member.placement();
        placement.translation.vector = new_base.coords;
        member.set_placement(placement);
        debug!(id = member.id(), height = new_height, "Trimmed straight member");
        Ok(())
    }
}
