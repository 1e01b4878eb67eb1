//! Placing piping components relative to each other.
//!
//! This crate positions built components in the world: port-to-port mating,
//! bend orientation between two tangents, axial spins and reversal, trimming
//! straight members, and surface placement of outlets on a host.
//!
//! # Overview
//!
//! - [`PlacedComponent`] - a built component with an ID and a placement
//! - [`PlacementEngine`] - mate, place bends, rotate, reverse and trim
//! - [`Assembly`] - the insertion-ordered component table with union groups
//! - [`Attachment`] / [`attach`] - insert a new component onto a port or a
//!   bare world point
//! - [`outlet_on_pipe`], [`outlet_on_tee`], [`outlet_on_elbow`] - placements
//!   on a host's outer surface
//!
//! # Mating
//!
//! After `mate(moving, pm, stationary, ps)` the two ports coincide and their
//! outward directions are opposite. Every operation either succeeds
//! completely or leaves the component untouched.
//!
//! ```
//! use pipe_fittings::{ElbowDims, PipeDims};
//! use pipe_place::{PlacedComponent, PlacementEngine};
//!
//! let engine = PlacementEngine::default();
//! let pipe = PlacedComponent::new("pipe", PipeDims::default().into()).unwrap();
//! let mut elbow = PlacedComponent::new("elbow", ElbowDims::default().into()).unwrap();
//!
//! engine.mate(&mut elbow, 0, &pipe, 1).unwrap();
//! let a = elbow.world_port(0).unwrap();
//! let b = pipe.world_port(1).unwrap();
//! assert!((a.position - b.position).norm() < 1e-9);
//! assert!((a.direction.into_inner() + b.direction.into_inner()).norm() < 1e-9);
//! ```
//!
//! # Units
//!
//! Lengths are millimetres. Angles passed to the engine are radians; bend
//! angles stored in dimension records are degrees.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for placed components

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod assembly;
mod engine;
mod insert;
mod placed;

pub use assembly::{Assembly, UnionGroup};
pub use engine::PlacementEngine;
pub use insert::{attach, outlet_on_elbow, outlet_on_pipe, outlet_on_tee, Attachment};
pub use placed::PlacedComponent;

pub use pipe_types::{Placement, Tolerances};
