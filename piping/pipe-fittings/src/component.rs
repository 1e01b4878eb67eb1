//! The closed set of component dimension records.

use crate::adapter::TerminalAdapterDims;
use crate::beam::BeamDims;
use crate::cap::CapDims;
use crate::common::{BuiltComponent, ComponentBuilder};
use crate::elbow::ElbowDims;
use crate::flange::FlangeDims;
use crate::gasket::GasketDims;
use crate::outlet::OutletDims;
use crate::pipe::PipeDims;
use crate::reducer::ReducerDims;
use crate::shell::ShellDims;
use crate::socket::{SocketCapDims, SocketElbowDims, SocketTeeDims};
use crate::tee::TeeDims;
use crate::ubolt::UBoltDims;
use crate::valve::ValveDims;
use pipe_types::{ComponentFamily, PipeError, PipeResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimension record of any component family.
///
/// # Example
///
/// ```
/// use pipe_fittings::{ComponentBuilder, ComponentSpec, PipeDims};
/// use pipe_types::ComponentFamily;
///
/// let mut spec = ComponentSpec::from(PipeDims::default());
/// spec.set_height(250.0).unwrap();
/// assert_eq!(spec.family(), ComponentFamily::Pipe);
/// assert_eq!(spec.height(), Some(250.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentSpec {
    /// Straight pipe.
    Pipe(PipeDims),
    /// Butt-weld elbow.
    Elbow(ElbowDims),
    /// Socket-weld elbow.
    SocketElbow(SocketElbowDims),
    /// Butt-weld tee.
    Tee(TeeDims),
    /// Socket-weld tee.
    SocketTee(SocketTeeDims),
    /// Reducer.
    Reducer(ReducerDims),
    /// Butt-weld cap.
    Cap(CapDims),
    /// Socket-weld cap.
    SocketCap(SocketCapDims),
    /// Flange.
    Flange(FlangeDims),
    /// Gasket.
    Gasket(GasketDims),
    /// Valve.
    Valve(ValveDims),
    /// Branch outlet.
    Outlet(OutletDims),
    /// U-bolt.
    UBolt(UBoltDims),
    /// Terminal adapter.
    TerminalAdapter(TerminalAdapterDims),
    /// Structural beam.
    Beam(BeamDims),
    /// Tank shell.
    Shell(ShellDims),
}

macro_rules! spec_from {
    ($($variant:ident($dims:ty)),* $(,)?) => {
        $(
            impl From<$dims> for ComponentSpec {
                fn from(dims: $dims) -> Self {
                    Self::$variant(dims)
                }
            }
        )*
    };
}

spec_from!(
    Pipe(PipeDims),
    Elbow(ElbowDims),
    SocketElbow(SocketElbowDims),
    Tee(TeeDims),
    SocketTee(SocketTeeDims),
    Reducer(ReducerDims),
    Cap(CapDims),
    SocketCap(SocketCapDims),
    Flange(FlangeDims),
    Gasket(GasketDims),
    Valve(ValveDims),
    Outlet(OutletDims),
    UBolt(UBoltDims),
    TerminalAdapter(TerminalAdapterDims),
    Beam(BeamDims),
    Shell(ShellDims),
);

impl ComponentSpec {
    fn builder(&self) -> &dyn ComponentBuilder {
        match self {
            Self::Pipe(d) => d,
            Self::Elbow(d) => d,
            Self::SocketElbow(d) => d,
            Self::Tee(d) => d,
            Self::SocketTee(d) => d,
            Self::Reducer(d) => d,
            Self::Cap(d) => d,
            Self::SocketCap(d) => d,
            Self::Flange(d) => d,
            Self::Gasket(d) => d,
            Self::Valve(d) => d,
            Self::Outlet(d) => d,
            Self::UBolt(d) => d,
            Self::TerminalAdapter(d) => d,
            Self::Beam(d) => d,
            Self::Shell(d) => d,
        }
    }

    /// Outside diameter of the main run, where the family has one.
    #[must_use]
    pub fn outer_diameter(&self) -> Option<f64> {
        match self {
            Self::Pipe(d) => Some(d.od),
            Self::Elbow(d) => Some(d.od),
            Self::SocketElbow(d) => Some(d.od),
            Self::Tee(d) => Some(d.od),
            Self::SocketTee(d) => Some(d.od),
            Self::Reducer(d) => Some(d.od),
            Self::Cap(d) => Some(d.od),
            Self::SocketCap(d) => Some(d.od),
            Self::Outlet(d) => Some(d.od),
            Self::Valve(d) => Some(d.od),
            Self::TerminalAdapter(d) => Some(d.od),
            Self::Beam(d) if d.profile == crate::beam::BeamProfile::Circle => Some(d.h),
            _ => None,
        }
    }

    /// Wall thickness of the main run, where the family has one.
    #[must_use]
    pub fn thickness(&self) -> Option<f64> {
        match self {
            Self::Pipe(d) => Some(d.effective_thk()),
            Self::Elbow(d) => Some(d.thk),
            Self::Tee(d) => Some(d.thk),
            Self::Reducer(d) => Some(d.thk),
            Self::Cap(d) => Some(d.effective_thk()),
            Self::Outlet(d) => Some(d.thk),
            _ => None,
        }
    }

    /// Length of a straight member.
    #[must_use]
    pub fn height(&self) -> Option<f64> {
        match self {
            Self::Pipe(d) => Some(d.height),
            Self::Beam(d) => Some(d.height),
            _ => None,
        }
    }

    /// Changes the length of a straight member.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] when the family is not straight.
    pub fn set_height(&mut self, height: f64) -> PipeResult<()> {
        match self {
            Self::Pipe(d) => d.height = height,
            Self::Beam(d) => d.height = height,
            other => {
                return Err(PipeError::invalid_selection(format!(
                    "{} has no adjustable length",
                    other.family()
                )))
            }
        }
        Ok(())
    }

    /// Bend angle in degrees of a bend.
    #[must_use]
    pub fn bend_angle(&self) -> Option<f64> {
        match self {
            Self::Elbow(d) => Some(d.bend_angle),
            Self::SocketElbow(d) => Some(d.bend_angle),
            _ => None,
        }
    }

    /// Changes the bend angle, in degrees, of a bend.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] when the family is not a bend.
    pub fn set_bend_angle(&mut self, degrees: f64) -> PipeResult<()> {
        match self {
            Self::Elbow(d) => d.bend_angle = degrees,
            Self::SocketElbow(d) => d.bend_angle = degrees,
            other => {
                return Err(PipeError::invalid_selection(format!(
                    "{} is not a bend",
                    other.family()
                )))
            }
        }
        Ok(())
    }
}

impl ComponentBuilder for ComponentSpec {
    fn family(&self) -> ComponentFamily {
        self.builder().family()
    }

    fn size(&self) -> &str {
        self.builder().size()
    }

    fn build(&self) -> PipeResult<BuiltComponent> {
        self.builder().build()
    }
}
