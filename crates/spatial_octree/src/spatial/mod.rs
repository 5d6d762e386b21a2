//! Spatial partitioning data structures
//!
//! Provides a caller-driven octree for broad-phase overlap queries in 3D space.

mod bounds;
mod octree;
mod predicate;

pub use bounds::Bounds;
pub use octree::{OctreeError, SpatialNode, OCTANT_COUNT};
pub use predicate::OverlapPredicate;
