//! # Spatial Octree
//!
//! A generic octree for broad-phase spatial indexing. Items of any type are
//! filed into nodes by a caller-supplied overlap predicate; subdivision and
//! collapse are always explicit calls.
//!
//! ## Features
//!
//! - **Caller-defined overlap**: point, box, sphere or any custom test
//! - **Multi-membership**: items straddling octant borders live in every leaf they touch
//! - **Coarse-to-fine queries**: find every node an item overlaps, internal nodes included
//! - **Debug gizmos**: hand node boxes to any wireframe drawer
//! - **Config files**: root box and pre-split depth from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_octree::prelude::*;
//!
//! let bounds = Bounds::new(Vec3::zeros(), Vec3::new(8.0, 8.0, 8.0));
//! let mut root = SpatialNode::new(bounds, OverlapPredicate::point(|p: &Vec3| *p));
//!
//! root.insert(Vec3::new(3.0, 3.0, 3.0));
//! root.subdivide().unwrap();
//! assert_eq!(root.child(7).unwrap().items().len(), 1);
//!
//! root.collapse().unwrap();
//! assert_eq!(root.items().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod foundation;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, OctreeConfig},
        debug::{DebugDrawSystem, GizmoSink},
        foundation::math::Vec3,
        spatial::{Bounds, OctreeError, OverlapPredicate, SpatialNode},
    };
}
