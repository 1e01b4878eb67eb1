//! Spiral-wound gasket with inner and centering rings.

use crate::common::{BuiltComponent, ComponentBuilder};
use pipe_types::{ComponentFamily, PipeError, PipeResult, Point3, Ports, ShapeRequest, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a gasket. Diameters grow from the inner ring outward.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasketDims {
    /// Nominal size label.
    pub size: String,
    /// Pressure class, e.g. `"150lb"`.
    pub class: String,
    /// Inner ring inside diameter.
    pub irid: f64,
    /// Sealing element inside diameter.
    pub seid: f64,
    /// Sealing element outside diameter.
    pub seod: f64,
    /// Centering ring outside diameter.
    pub crod: f64,
    /// Sealing element thickness.
    pub se_thk: f64,
    /// Ring thickness.
    pub r_thk: f64,
}

impl Default for GasketDims {
    fn default() -> Self {
        Self {
            size: "DN50".to_string(),
            class: "150lb".to_string(),
            irid: 55.6,
            seid: 69.9,
            seod: 85.9,
            crod: 104.9,
            se_thk: 4.5,
            r_thk: 3.2,
        }
    }
}

impl GasketDims {
    /// Axial offset that centers the thinner rings on the sealing element.
    #[must_use]
    pub fn ring_offset(&self) -> f64 {
        (self.se_thk - self.r_thk) / 2.0
    }

    fn validate(&self) -> PipeResult<()> {
        let checks = [
            (self.irid > 0.0, "irid", "must be positive"),
            (self.seid > self.irid, "seid", "must exceed the inner ring diameter"),
            (self.seod > self.seid, "seod", "must exceed the sealing element inside diameter"),
            (self.crod > self.seod, "crod", "must exceed the sealing element outside diameter"),
            (self.se_thk > 0.0, "se_thk", "must be positive"),
            (self.r_thk > 0.0, "r_thk", "must be positive"),
        ];
        match checks.iter().find(|(ok, ..)| !ok) {
            Some((_, field, reason)) => Err(PipeError::dimension(*field, *reason)),
            None => Ok(()),
        }
    }
}

/// Flat ring between two radii from `z` along +Z.
fn ring(outer: f64, inner: f64, height: f64, z: f64) -> ShapeRequest {
    let base = Point3::new(0.0, 0.0, z);
    ShapeRequest::cylinder(outer, height, base, Vector3::z_axis())
        .cut(vec![ShapeRequest::cylinder(inner, height, base, Vector3::z_axis())])
}

impl ComponentBuilder for GasketDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Gasket
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        self.validate()?;
        let z = self.ring_offset();
        let shape = ShapeRequest::Union(vec![
            ring(self.seid / 2.0, self.irid / 2.0, self.r_thk, z),
            ring(self.seod / 2.0, self.seid / 2.0, self.se_thk, 0.0),
            ring(self.crod / 2.0, self.seod / 2.0, self.r_thk, z),
        ]);

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;
        ports.push(Point3::new(0.0, 0.0, self.se_thk), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Gasket, &self.size, shape, ports)
            .with_profile(self.class.clone()))
    }
}
