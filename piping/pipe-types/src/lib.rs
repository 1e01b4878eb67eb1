//! Core types for parametric piping components.
//!
//! This crate provides the contracts every other piping crate builds on:
//! ports, component family tags, the kernel-independent solid recipe and the
//! seam to an external solid-modeling kernel.
//!
//! # Overview
//!
//! - [`Port`] / [`Ports`] - connection points as parallel position and
//!   outward-direction lists in a component's local frame
//! - [`ComponentFamily`] - the closed set of families, each statically known
//!   to expose ports or not
//! - [`ShapeRequest`] - a solid described as a tree of primitives, booleans,
//!   sweeps, lofts, fillets and hollows
//! - [`GeometryKernel`] / [`realize`] - the consumed kernel interface and the
//!   recipe walker, including midpoint-based fillet edge selection
//! - [`Line3`], [`Plane`], [`geom::shortest_arc`] - geometric helpers shared
//!   by placement and routing
//! - [`Tolerances`] - numeric thresholds for geometric decisions
//! - [`PipeError`] - the error taxonomy, with [`ErrorCategory`]
//!
//! A placement is an [`Isometry3<f64>`](nalgebra::Isometry3) mapping a
//! component's local frame to the world.
//!
//! # Example
//!
//! ```
//! use pipe_types::{Placement, Ports};
//! use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};
//!
//! let mut ports = Ports::new();
//! ports.push(Point3::origin(), -Vector3::z()).unwrap();
//! ports.push(Point3::new(0.0, 0.0, 1000.0), Vector3::z()).unwrap();
//!
//! let placement = Placement::from_parts(
//!     Translation3::new(0.0, 0.0, 500.0),
//!     UnitQuaternion::identity(),
//! );
//! let top = ports.get(1).unwrap().transformed(&placement);
//! assert!((top.position.z - 1500.0).abs() < 1e-12);
//! ```
//!
//! # Layer 0 Crate
//!
//! This crate has no modeling-kernel or UI dependencies. It can be used in
//! CLI tools, servers, tests with mock kernels, and host CAD plugins alike.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod family;
pub mod geom;
pub mod kernel;
pub mod port;
pub mod shape;

pub use config::Tolerances;
pub use error::{ErrorCategory, PipeError, PipeResult};
pub use family::ComponentFamily;
pub use geom::{Line3, Plane};
pub use kernel::{realize, EdgeProbe, GeometryKernel};
pub use port::{Port, Ports};
pub use shape::{
    Circle3, Contour, CylinderSurface, EdgeSelector, FaceSelector, PathPiece, Profile,
    ShapeRequest,
};

// Re-export commonly used math types for convenience
pub use nalgebra::{Isometry3, Point3, Unit, UnitQuaternion, Vector3};

/// Local-to-world rigid transform of a component.
pub type Placement = Isometry3<f64>;
