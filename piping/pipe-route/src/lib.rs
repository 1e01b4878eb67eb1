//! Routing piping through an assembly.
//!
//! Builds pipe runs from centerline paths and edits existing members by
//! their intersections.
//!
//! # Overview
//!
//! - [`Path`] / [`Segment`] - a centerline of straight and arc segments
//! - [`PathAssembler`] - pipes and bends along a path, trimmed at corners
//! - [`PipeLine`] / [`PipeBranch`] - named runs that regenerate their
//!   members whenever the path or section changes
//! - [`IntersectionRouter`] - bends between members, extension to an
//!   intersection, header merges, laydown and breaking pipes
//! - [`resolve`] / [`resolve_all`] - host picks to [`Attachment`]s
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use pipe_place::Assembly;
//! use pipe_route::{LineParams, Path, PipeBranch, SegmentOffset};
//!
//! let mut doc = Assembly::new("plant");
//! let mut branch = PipeBranch::new("B1", LineParams::default());
//! let path = Path::from_points(&[
//!     Point3::origin(),
//!     Point3::new(1000.0, 0.0, 0.0),
//!     Point3::new(1000.0, 1000.0, 0.0),
//! ])
//! .unwrap();
//! branch.set_path(&mut doc, path).unwrap();
//!
//! // Pull the first pipe back 50 mm from its start.
//! branch
//!     .set_offset(&mut doc, 0, SegmentOffset::new(50.0, 0.0))
//!     .unwrap();
//! let first = doc.get(&branch.tubes()[0]).unwrap();
//! assert!((first.base().x + 50.0).abs() < 1e-9);
//! ```
//!
//! # Failure
//!
//! Rebuilds and router operations compute every new component before they
//! touch the assembly. On error the assembly and the run are unchanged.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for paths and parameters

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod assembler;
mod branch;
mod config;
mod line;
mod path;
mod router;
mod selection;

pub use assembler::{PathAssembler, Piece, PieceKind};
pub use branch::{PipeBranch, SegmentOffset};
pub use config::{LineParams, DEFAULT_BEND_RATIO};
pub use line::PipeLine;
pub use path::{Path, Segment};
pub use router::{HeaderReport, IntersectionRouter, LineEdge, Thing};
pub use selection::{resolve, resolve_all, Pick, SubShape};

pub use pipe_place::Attachment;
