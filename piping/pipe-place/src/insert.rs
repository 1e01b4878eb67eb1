//! Inserting new components at attachments and on host surfaces.

use nalgebra::Rotation3;
use pipe_fittings::ComponentSpec;
use pipe_types::{
    ComponentFamily, PipeError, PipeResult, Placement, Point3, Unit, UnitQuaternion, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::PlacementEngine;
use crate::placed::PlacedComponent;

/// A world point and outward direction that a new component mates onto.
///
/// `source` names the component and port the attachment was taken from,
/// when there is one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attachment {
    /// World position.
    pub position: Point3<f64>,
    /// Outward unit direction; the inserted port ends up facing against it.
    pub direction: Unit<Vector3<f64>>,
    /// Originating component ID and port index.
    pub source: Option<(String, usize)>,
}

impl Default for Attachment {
    /// The world origin facing +Z, with no source.
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            direction: Vector3::z_axis(),
            source: None,
        }
    }
}

impl Attachment {
    /// Creates a sourceless attachment.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `direction` is zero.
    pub fn new(position: Point3<f64>, direction: Vector3<f64>) -> PipeResult<Self> {
        let direction = Unit::try_new(direction, 1e-12)
            .ok_or_else(|| PipeError::degenerate("attachment direction has zero length"))?;
        Ok(Self {
            position,
            direction,
            source: None,
        })
    }

    /// The world port `index` of `component`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::PortOutOfRange`] for a bad port index.
    pub fn from_port(component: &PlacedComponent, index: usize) -> PipeResult<Self> {
        let port = component.world_port(index)?;
        Ok(Self {
            position: port.position,
            direction: port.direction,
            source: Some((component.id().to_string(), index)),
        })
    }
}

/// Builds `spec` and mates one of its ports onto `attachment`.
///
/// `port` defaults to the family's insertion port. Families without ports
/// are placed with their local origin on the attachment point and local Z
/// along its direction.
///
/// # Errors
///
/// Returns the builder's error, or [`PipeError::PortOutOfRange`] when `port`
/// does not exist on the built component.
///
/// # Example
///
/// ```
/// use pipe_fittings::{FlangeDims, PipeDims};
/// use pipe_place::{attach, Attachment, PlacedComponent, PlacementEngine};
///
/// let engine = PlacementEngine::default();
/// let pipe = PlacedComponent::new("pipe", PipeDims::default().into()).unwrap();
/// let end = Attachment::from_port(&pipe, 1).unwrap();
///
/// let flange = attach(&engine, "flange", FlangeDims::default().into(), &end, None).unwrap();
/// let weld_end = flange.world_port_position(1).unwrap();
/// assert!((weld_end.z - 1000.0).abs() < 1e-9);
/// ```
pub fn attach(
    engine: &PlacementEngine,
    id: impl Into<String>,
    spec: ComponentSpec,
    attachment: &Attachment,
    port: Option<usize>,
) -> PipeResult<PlacedComponent> {
    let mut component = PlacedComponent::new(id, spec)?;
    if !component.family().has_ports() {
        let rotation = pipe_types::geom::shortest_arc(
            &Vector3::z(),
            &attachment.direction,
            engine.tolerances().aligned,
        )?;
        component.set_placement(Placement::from_parts(
            attachment.position.coords.into(),
            rotation,
        ));
        return Ok(component);
    }
    let port = port.unwrap_or_else(|| component.family().insertion_port());
    engine.mate_to(
        &mut component,
        port,
        attachment.position,
        attachment.direction.into_inner(),
    )?;
    Ok(component)
}

// =============================================================================
// Outlet surface placement
// =============================================================================

/// Frame with local +Z along `normal` and local +Y along `run` (made
/// orthogonal to `normal`), spun by `alpha` radians about `normal`.
fn surface_frame(
    position: Point3<f64>,
    normal: Vector3<f64>,
    run: Vector3<f64>,
    alpha: f64,
) -> PipeResult<Placement> {
    let z = Unit::try_new(normal, 1e-12)
        .ok_or_else(|| PipeError::degenerate("surface normal has zero length"))?;
    let y = Unit::try_new(run - z.into_inner() * run.dot(&z), 1e-12)
        .ok_or_else(|| PipeError::degenerate("run direction is parallel to the surface normal"))?;
    let x = y.cross(&z);
    let frame = UnitQuaternion::from_rotation_matrix(&Rotation3::from_basis_unchecked(&[
        x,
        y.into_inner(),
        z.into_inner(),
    ]));
    let spin = UnitQuaternion::from_axis_angle(&z, alpha);
    Ok(Placement::from_parts(position.coords.into(), spin * frame))
}

fn require_family(host: &PlacedComponent, family: ComponentFamily) -> PipeResult<()> {
    if host.family() == family {
        Ok(())
    } else {
        Err(PipeError::invalid_selection(format!(
            "'{}' is a {}, expected a {family}",
            host.id(),
            host.family()
        )))
    }
}

/// Radial attachment on a cylinder of radius `r` about local Z, at local
/// height `z` and angle `phi` from local +X.
fn on_cylinder(host: &PlacedComponent, r: f64, z: f64, phi: f64, alpha: f64) -> PipeResult<Placement> {
    let (s, c) = phi.sin_cos();
    let local = Point3::new(r * c, r * s, z);
    surface_frame(
        host.placement() * local,
        host.world_axis(&Vector3::new(c, s, 0.0)),
        host.axis().into_inner(),
        alpha,
    )
}

/// Placement of an outlet on the outer surface of a pipe.
///
/// `t` is the axial distance from port 0, clamped to the pipe length. `phi`
/// is the angle in radians from the pipe's local +X about its axis, and
/// `alpha` spins the outlet about its own axis; at zero the outlet's local
/// +Y runs along the pipe.
///
/// # Errors
///
/// Returns [`PipeError::InvalidSelection`] if `host` is not a pipe.
pub fn outlet_on_pipe(host: &PlacedComponent, t: f64, phi: f64, alpha: f64) -> PipeResult<Placement> {
    require_family(host, ComponentFamily::Pipe)?;
    let ComponentSpec::Pipe(dims) = host.spec() else {
        return Err(PipeError::invalid_selection("host record is not a pipe"));
    };
    on_cylinder(host, dims.od / 2.0, t.clamp(0.0, dims.height), phi, alpha)
}

/// Placement of an outlet on the run of a tee.
///
/// `t` is measured from the run's port 0 (local `z = -C`) and clamped to the
/// run length `2C`. A `phi` of a quarter turn points at the branch.
///
/// # Errors
///
/// Returns [`PipeError::InvalidSelection`] if `host` is not a tee.
pub fn outlet_on_tee(host: &PlacedComponent, t: f64, phi: f64, alpha: f64) -> PipeResult<Placement> {
    require_family(host, ComponentFamily::Tee)?;
    let ComponentSpec::Tee(dims) = host.spec() else {
        return Err(PipeError::invalid_selection("host record is not a tee"));
    };
    let z = -dims.c + t.clamp(0.0, 2.0 * dims.c);
    on_cylinder(host, dims.od / 2.0, z, phi, alpha)
}

/// Placement of an outlet at the outer midpoint of an elbow; at zero spin
/// the outlet's local +Y follows the arc.
///
/// # Errors
///
/// Returns [`PipeError::InvalidSelection`] if `host` is not an elbow.
pub fn outlet_on_elbow(host: &PlacedComponent, alpha: f64) -> PipeResult<Placement> {
    require_family(host, ComponentFamily::Elbow)?;
    let ComponentSpec::Elbow(dims) = host.spec() else {
        return Err(PipeError::invalid_selection("host record is not an elbow"));
    };
    let (position, normal, tangent) = dims.outer_midpoint();
    surface_frame(
        host.placement() * position,
        host.world_axis(&normal),
        host.world_axis(&tangent),
        alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pipe_fittings::{ElbowDims, FlangeDims, OutletDims, PipeDims, ShellDims, TeeDims};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn placed(id: &str, spec: ComponentSpec) -> PlacedComponent {
        let Ok(placed) = PlacedComponent::new(id, spec) else {
            panic!("{id} should build");
        };
        placed
    }

    #[test]
    fn test_default_attachment_is_origin_up() {
        let engine = PlacementEngine::default();
        let Ok(pipe) = attach(&engine, "p", PipeDims::default().into(), &Attachment::default(), None)
        else {
            panic!("attach should succeed");
        };
        assert_relative_eq!(pipe.axis().into_inner(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(pipe.base(), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_flange_mates_weld_end() {
        let engine = PlacementEngine::default();
        let host = placed("p", PipeDims::default().into());
        let Ok(end) = Attachment::from_port(&host, 0) else {
            panic!("port exists");
        };
        assert_eq!(end.source, Some(("p".to_string(), 0)));
        let Ok(flange) = attach(&engine, "f", FlangeDims::default().into(), &end, None) else {
            panic!("attach should succeed");
        };
        let Ok(weld) = flange.world_port(1) else {
            panic!("port exists");
        };
        assert_relative_eq!(weld.position, Point3::origin(), epsilon = 1e-9);
        assert_relative_eq!(weld.direction.into_inner(), Vector3::z(), epsilon = 1e-9);
        assert!(attach(&engine, "f", FlangeDims::default().into(), &end, Some(5)).is_err());
    }

    #[test]
    fn test_portless_component_sits_on_attachment() {
        let engine = PlacementEngine::default();
        let Ok(at) = Attachment::new(Point3::new(1.0, 2.0, 3.0), Vector3::x()) else {
            panic!("attachment");
        };
        let Ok(tank) = attach(&engine, "t", ShellDims::default().into(), &at, None) else {
            panic!("attach should succeed");
        };
        assert_relative_eq!(tank.axis().into_inner(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(tank.base(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_outlet_on_pipe_surface() {
        let host = placed("p", PipeDims::default().into());
        let Ok(placement) = outlet_on_pipe(&host, 400.0, FRAC_PI_2, 0.0) else {
            panic!("pipe host");
        };
        let origin = placement * Point3::origin();
        assert_relative_eq!(origin, Point3::new(0.0, 30.15, 400.0), epsilon = 1e-9);
        assert_relative_eq!(placement * Vector3::z(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(placement * Vector3::y(), Vector3::z(), epsilon = 1e-12);

        // Spinning keeps the outlet axis and turns its +Y off the run.
        let Ok(spun) = outlet_on_pipe(&host, 400.0, FRAC_PI_2, FRAC_PI_2) else {
            panic!("pipe host");
        };
        assert_relative_eq!(spun * Vector3::z(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!((spun * Vector3::y()).dot(&Vector3::z()), 0.0, epsilon = 1e-12);

        // t is clamped to the pipe.
        let Ok(clamped) = outlet_on_pipe(&host, 5000.0, 0.0, 0.0) else {
            panic!("pipe host");
        };
        assert_relative_eq!((clamped * Point3::origin()).z, 1000.0);
    }

    #[test]
    fn test_outlet_on_tee_and_elbow() {
        let tee = placed("t", TeeDims::default().into());
        let Ok(placement) = outlet_on_tee(&tee, 178.0, 1.5 * PI, 0.0) else {
            panic!("tee host");
        };
        assert_relative_eq!(
            placement * Point3::origin(),
            Point3::new(0.0, -168.27 / 2.0, 0.0),
            epsilon = 1e-9
        );

        let elbow_dims = ElbowDims::default();
        let elbow = placed("e", elbow_dims.clone().into());
        let Ok(placement) = outlet_on_elbow(&elbow, 0.0) else {
            panic!("elbow host");
        };
        let (position, normal, _) = elbow_dims.outer_midpoint();
        assert_relative_eq!(placement * Point3::origin(), position, epsilon = 1e-9);
        assert_relative_eq!(placement * Vector3::z(), normal, epsilon = 1e-12);

        let Ok(outlet) = PlacedComponent::new("o", OutletDims::default().into()) else {
            panic!("outlet should build");
        };
        let placed_outlet = outlet.with_placement(placement);
        assert!(outlet_on_pipe(&placed_outlet, 0.0, 0.0, 0.0).is_err_and(|e| e.is_invalid_selection()));
    }
}
