//! Connection ports.
//!
//! A component exposes its ports as two parallel, equal-length lists in its
//! local frame: positions and outward unit directions. Port 0 is the family's
//! primary port.

use crate::error::{PipeError, PipeResult};
use nalgebra::{Isometry3, Point3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single connection point: local position plus outward unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Port {
    /// Position of the port.
    pub position: Point3<f64>,
    /// Outward unit direction of the port.
    pub direction: Unit<Vector3<f64>>,
}

impl Port {
    /// Creates a port, normalizing `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `direction` has no length.
    pub fn new(position: Point3<f64>, direction: Vector3<f64>) -> PipeResult<Self> {
        let direction = Unit::try_new(direction, 1e-12)
            .ok_or_else(|| PipeError::degenerate("port direction has zero length"))?;
        Ok(Self {
            position,
            direction,
        })
    }

    /// Maps this port through a local-to-world placement.
    #[must_use]
    pub fn transformed(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            position: placement * self.position,
            direction: placement.rotation * self.direction,
        }
    }
}

/// Parallel port-position and port-direction lists.
///
/// # Example
///
/// ```
/// use pipe_types::Ports;
/// use nalgebra::{Point3, Vector3};
///
/// let mut ports = Ports::new();
/// ports.push(Point3::origin(), -Vector3::z()).unwrap();
/// ports.push(Point3::new(0.0, 0.0, 1000.0), Vector3::z()).unwrap();
///
/// assert_eq!(ports.len(), 2);
/// assert_eq!(ports.positions().len(), ports.directions().len());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ports {
    positions: Vec<Point3<f64>>,
    directions: Vec<Unit<Vector3<f64>>>,
}

impl Ports {
    /// Creates an empty port list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            directions: Vec::new(),
        }
    }

    /// Builds a port list from parallel position and direction lists.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::DimensionInconsistency`] if the lists differ in
    /// length, or [`PipeError::GeometricDegeneracy`] if a direction is zero.
    pub fn from_lists(
        positions: Vec<Point3<f64>>,
        directions: Vec<Vector3<f64>>,
    ) -> PipeResult<Self> {
        if positions.len() != directions.len() {
            return Err(PipeError::dimension(
                "ports",
                format!(
                    "{} positions but {} directions",
                    positions.len(),
                    directions.len()
                ),
            ));
        }
        let mut ports = Self::new();
        for (position, direction) in positions.into_iter().zip(directions) {
            ports.push(position, direction)?;
        }
        Ok(ports)
    }

    /// Appends a port, normalizing its direction.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::GeometricDegeneracy`] if `direction` is zero.
    pub fn push(&mut self, position: Point3<f64>, direction: Vector3<f64>) -> PipeResult<()> {
        let port = Port::new(position, direction)?;
        self.positions.push(port.position);
        self.directions.push(port.direction);
        Ok(())
    }

    /// Number of ports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no ports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns port `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Port> {
        Some(Port {
            position: *self.positions.get(index)?,
            direction: *self.directions.get(index)?,
        })
    }

    /// Port positions in the local frame.
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Outward port directions in the local frame.
    #[must_use]
    pub fn directions(&self) -> &[Unit<Vector3<f64>>] {
        &self.directions
    }

    /// Iterates over the ports in index order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        self.positions
            .iter()
            .zip(&self.directions)
            .map(|(position, direction)| Port {
                position: *position,
                direction: *direction,
            })
    }

    /// Index of the port whose position is nearest to `point`.
    ///
    /// Ties keep the lower index. Returns `None` for an empty list.
    #[must_use]
    pub fn nearest(&self, point: &Point3<f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.positions.iter().enumerate() {
            let d = (p - point).norm();
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion};
    use std::f64::consts::FRAC_PI_2;

    fn two_ports() -> Ports {
        Ports::from_lists(
            vec![Point3::origin(), Point3::new(0.0, 0.0, 10.0)],
            vec![-Vector3::z(), Vector3::z() * 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_directions_normalized() {
        let ports = two_ports();
        assert_eq!(ports.len(), 2);
        assert_relative_eq!(ports.directions()[1].norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_lists() {
        let result = Ports::from_lists(vec![Point3::origin()], vec![]);
        assert!(result.is_err_and(|e| e.is_dimension()));
    }

    #[test]
    fn test_zero_direction_rejected() {
        let mut ports = Ports::new();
        assert!(ports.push(Point3::origin(), Vector3::zeros()).is_err());
        assert!(ports.is_empty());
    }

    #[test]
    fn test_nearest() {
        let ports = two_ports();
        assert_eq!(ports.nearest(&Point3::new(0.0, 1.0, 9.0)), Some(1));
        assert_eq!(ports.nearest(&Point3::new(0.0, 0.0, 5.0)), Some(0));
        assert_eq!(Ports::new().nearest(&Point3::origin()), None);
    }

    #[test]
    fn test_transformed() {
        let placement = Isometry3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
        );
        let port = two_ports().get(1).unwrap().transformed(&placement);
        assert_relative_eq!(port.position, Point3::new(1.0, -8.0, 3.0), epsilon = 1e-10);
        assert_relative_eq!(
            port.direction.into_inner(),
            -Vector3::y(),
            epsilon = 1e-10
        );
    }
}
