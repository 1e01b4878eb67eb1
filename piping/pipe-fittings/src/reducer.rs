//! Concentric and eccentric reducers.

use crate::common::{positive, profile_label, BuiltComponent, ComponentBuilder};
use pipe_types::{
    Circle3, ComponentFamily, PipeError, PipeResult, Point3, Ports, ShapeRequest, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a reducer. The major end sits at the origin.
///
/// # Example
///
/// ```
/// use pipe_fittings::ReducerDims;
///
/// let dims = ReducerDims::new("DN50", 60.3, 48.3, 3.0);
/// assert!((dims.effective_height() - 36.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReducerDims {
    /// Nominal size label of the major end.
    pub size: String,
    /// Major outside diameter.
    pub od: f64,
    /// Minor outside diameter.
    pub od2: f64,
    /// Major-end wall thickness.
    pub thk: f64,
    /// Minor-end wall thickness; `None` uses `thk`.
    pub thk2: Option<f64>,
    /// Length; `None` or zero derives it from the diameters.
    pub height: Option<f64>,
    /// `false` for an eccentric reducer.
    pub concentric: bool,
}

impl Default for ReducerDims {
    fn default() -> Self {
        Self::new("DN50", 60.3, 48.3, 3.0)
    }
}

impl ReducerDims {
    /// Concentric reducer with derived length.
    #[must_use]
    pub fn new(size: impl Into<String>, od: f64, od2: f64, thk: f64) -> Self {
        Self {
            size: size.into(),
            od,
            od2,
            thk,
            thk2: None,
            height: None,
            concentric: true,
        }
    }

    /// Sets an explicit length.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the minor-end wall thickness.
    #[must_use]
    pub fn with_minor_thk(mut self, thk2: f64) -> Self {
        self.thk2 = Some(thk2);
        self
    }

    /// Makes the reducer eccentric.
    #[must_use]
    pub fn eccentric(mut self) -> Self {
        self.concentric = false;
        self
    }

    /// Length after deriving the default `3 * (OD - OD2)`.
    #[must_use]
    pub fn effective_height(&self) -> f64 {
        match self.height {
            Some(h) if h > 0.0 => h,
            _ => 3.0 * (self.od - self.od2),
        }
    }

    /// Lateral offset of the minor end.
    #[must_use]
    pub fn offset(&self) -> f64 {
        if self.concentric {
            0.0
        } else {
            (self.od - self.od2) / 2.0
        }
    }

    fn minor_thk(&self) -> f64 {
        self.thk2.filter(|v| *v > 0.0).unwrap_or(self.thk)
    }

    fn frustum(&self, r1: f64, r2: f64, height: f64) -> ShapeRequest {
        if self.concentric {
            ShapeRequest::cone(r1, r2, height, Point3::origin(), Vector3::z_axis())
        } else {
            ShapeRequest::Loft {
                sections: vec![
                    Circle3 {
                        center: Point3::new(self.offset(), 0.0, height),
                        normal: Vector3::z_axis(),
                        radius: r2,
                    },
                    Circle3 {
                        center: Point3::origin(),
                        normal: Vector3::z_axis(),
                        radius: r1,
                    },
                ],
            }
        }
    }
}

impl ComponentBuilder for ReducerDims {
    fn family(&self) -> ComponentFamily {
        ComponentFamily::Reducer
    }

    fn size(&self) -> &str {
        &self.size
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        let od = positive("od", self.od)?;
        let od2 = positive("od2", self.od2)?;
        if od <= od2 {
            return Err(PipeError::dimension(
                "od2",
                format!("minor diameter {od2} must be smaller than major diameter {od}"),
            ));
        }
        let height = self.effective_height();
        let thk2 = self.minor_thk();

        let outer = self.frustum(od / 2.0, od2 / 2.0, height);
        let shape = if self.thk < od / 2.0 && thk2 < od2 / 2.0 {
            outer.cut(vec![self.frustum(od / 2.0 - self.thk, od2 / 2.0 - thk2, height)])
        } else {
            outer
        };

        let mut ports = Ports::new();
        ports.push(Point3::origin(), -Vector3::z())?;
        ports.push(Point3::new(self.offset(), 0.0, height), Vector3::z())?;

        Ok(BuiltComponent::new(ComponentFamily::Reducer, &self.size, shape, ports)
            .with_profile(profile_label(od, od2)))
    }
}
