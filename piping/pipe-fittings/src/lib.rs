//! Parametric builders for piping components.
//!
//! Each family has a dimension record that builds a kernel-independent solid
//! recipe plus its ports in the local frame. Builders are stateless, so the
//! same record always yields the same component.
//!
//! # Overview
//!
//! - Straight members: [`PipeDims`], [`BeamDims`]
//! - Butt-weld fittings: [`ElbowDims`], [`TeeDims`], [`ReducerDims`], [`CapDims`]
//! - Socket-weld fittings: [`SocketElbowDims`], [`SocketTeeDims`], [`SocketCapDims`]
//! - Flanged joints: [`FlangeDims`], [`GasketDims`]
//! - Inline parts and supports: [`ValveDims`], [`OutletDims`], [`UBoltDims`],
//!   [`TerminalAdapterDims`]
//! - Equipment: [`ShellDims`]
//! - [`ComponentSpec`] - the closed enum over every record
//! - [`Catalog`] - `;`-delimited dimension tables keyed by size
//! - [`units`] - DN / NPS size designations
//!
//! # Example
//!
//! ```
//! use pipe_fittings::{measured_bend_angle, ComponentBuilder, ElbowDims};
//!
//! let elbow = ElbowDims::default().with_bend_angle(60.0).build().unwrap();
//! let angle = measured_bend_angle(&elbow.ports).unwrap();
//! assert!((angle - 60.0).abs() < 1e-9);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all dimension records

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod adapter;
mod beam;
mod cap;
mod catalog;
mod common;
mod component;
mod elbow;
mod flange;
mod gasket;
mod outlet;
mod pipe;
mod reducer;
mod shell;
mod socket;
mod tee;
mod ubolt;
pub mod units;
mod valve;

pub use adapter::TerminalAdapterDims;
pub use beam::{BeamDims, BeamProfile};
pub use cap::CapDims;
pub use catalog::{Catalog, CatalogRow, SIZE_COLUMN};
pub use common::{BuiltComponent, ComponentBuilder};
pub use component::ComponentSpec;
pub use elbow::{measured_bend_angle, ElbowDims};
pub use flange::{FlangeDims, FlangeKind};
pub use gasket::GasketDims;
pub use outlet::{OutletAngle, OutletDims, OutletEnd};
pub use pipe::PipeDims;
pub use reducer::ReducerDims;
pub use shell::ShellDims;
pub use socket::{SocketCapDims, SocketElbowDims, SocketTeeDims};
pub use tee::TeeDims;
pub use ubolt::UBoltDims;
pub use valve::{ValveDims, ValveKind};
