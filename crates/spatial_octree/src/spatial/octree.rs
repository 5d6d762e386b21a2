//! Octree spatial partitioning structure
//!
//! A tree of [`SpatialNode`]s. There is no wrapper type: the root is just a
//! node created with [`SpatialNode::new`]. Subdivision is always triggered by
//! the caller; nothing here splits a node on its own.
//!
//! Items are filtered by the tree's [`OverlapPredicate`] at every node they
//! reach. An internal node forwards an accepted item to all eight children and
//! each child tests it again, so an item that straddles several octants ends
//! up in several leaves. This multi-membership is what makes the tree usable
//! for broad-phase queries across region borders; results are not deduplicated.

use crate::debug::GizmoSink;
use crate::foundation::math::Vec3;
use crate::spatial::{Bounds, OverlapPredicate};
use thiserror::Error;

/// Number of children of an internal node
pub const OCTANT_COUNT: usize = 8;

/// Misuse of the subdivide/collapse lifecycle, or bad geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// Subdivide called on a node that already has children
    #[error("node at depth {depth} is already subdivided")]
    AlreadySubdivided {
        /// Depth of the offending node
        depth: u32,
    },

    /// Collapse called on a leaf
    #[error("node at depth {depth} is a leaf and cannot be collapsed")]
    NotSubdivided {
        /// Depth of the offending node
        depth: u32,
    },

    /// Bounds that cannot describe a real volume
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
}

/// Single node in the octree hierarchy
///
/// A node is either a leaf holding items or an internal node owning exactly
/// eight children; it is never both.
#[derive(Debug, Clone)]
pub struct SpatialNode<T> {
    /// World-space box this node covers
    bounds: Bounds,

    /// Items held by this node (leaf only), in insertion order
    items: Vec<T>,

    /// Child nodes (8 octants), None if this is a leaf
    children: Option<Box<[SpatialNode<T>; OCTANT_COUNT]>>,

    /// Overlap test shared by the whole tree
    predicate: OverlapPredicate<T>,

    /// Depth in the tree (0 = root)
    depth: u32,
}

impl<T> SpatialNode<T> {
    /// Create a new root leaf covering `bounds`
    ///
    /// Any box is accepted, including zero-sized ones; use
    /// [`Bounds::validate`] beforehand if the geometry comes from outside.
    pub fn new(bounds: Bounds, predicate: OverlapPredicate<T>) -> Self {
        Self::with_depth(bounds, predicate, 0)
    }

    fn with_depth(bounds: Bounds, predicate: OverlapPredicate<T>, depth: u32) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: None,
            predicate,
            depth,
        }
    }

    /// Box covered by this node
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Items held directly by this node (always empty for internal nodes)
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The eight children, or None for a leaf
    pub fn children(&self) -> Option<&[SpatialNode<T>; OCTANT_COUNT]> {
        self.children.as_deref()
    }

    /// Child at octant `index` (`x + 2*y + 4*z`), if subdivided
    pub fn child(&self, index: usize) -> Option<&SpatialNode<T>> {
        self.children.as_ref().and_then(|children| children.get(index))
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Overlap predicate shared by every node of this tree
    pub fn predicate(&self) -> &OverlapPredicate<T> {
        &self.predicate
    }

    /// Whether the predicate accepts `item` for this node's box
    pub fn overlaps(&self, item: &T) -> bool {
        self.predicate.overlaps(item, &self.bounds)
    }

    /// Insert an item into this subtree
    ///
    /// Returns false, without storing anything, if the predicate rejects the
    /// item for this node's box. An internal node forwards the item to all
    /// eight children, each of which filters it again.
    pub fn insert(&mut self, item: T) -> bool
    where
        T: Clone,
    {
        if !self.predicate.overlaps(&item, &self.bounds) {
            log::trace!("Item rejected by node at depth {}", self.depth);
            return false;
        }

        match self.children.as_deref_mut() {
            None => self.items.push(item),
            Some(children) => {
                for child in children.iter_mut() {
                    child.insert(item.clone());
                }
            }
        }

        true
    }

    /// Insert each item in order, returning how many this node accepted
    pub fn insert_all<I>(&mut self, items: I) -> usize
    where
        T: Clone,
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .map(|item| self.insert(item))
            .filter(|accepted| *accepted)
            .count()
    }

    /// Subdivide this leaf into 8 children
    ///
    /// Children are created in z, y, x order (x varies fastest), each half
    /// the size of this node. Every held item is re-inserted into every child
    /// through the normal insert path before this node's items are cleared.
    ///
    /// Fails with [`OctreeError::AlreadySubdivided`] on an internal node,
    /// leaving it untouched.
    pub fn subdivide(&mut self) -> Result<(), OctreeError>
    where
        T: Clone,
    {
        if self.children.is_some() {
            log::warn!("Ignoring subdivide on internal node at depth {}", self.depth);
            return Err(OctreeError::AlreadySubdivided { depth: self.depth });
        }

        let mut children: [SpatialNode<T>; OCTANT_COUNT] = std::array::from_fn(|octant| {
            SpatialNode::with_depth(
                self.bounds.octant(octant),
                self.predicate.clone(),
                self.depth + 1,
            )
        });

        for child in &mut children {
            for item in &self.items {
                child.insert(item.clone());
            }
        }

        log::debug!(
            "Subdivided node at depth {} (center {:?}), redistributed {} items",
            self.depth,
            self.bounds.center,
            self.items.len()
        );

        self.children = Some(Box::new(children));
        self.items.clear();
        Ok(())
    }

    /// Keep subdividing until every leaf sits `levels` below this node
    ///
    /// Existing internal nodes are descended into, not re-split.
    pub fn subdivide_to_depth(&mut self, levels: u32) -> Result<(), OctreeError>
    where
        T: Clone,
    {
        if levels == 0 {
            return Ok(());
        }

        if self.is_leaf() {
            self.subdivide()?;
        }

        if let Some(ref mut children) = self.children {
            for child in children.iter_mut() {
                child.subdivide_to_depth(levels - 1)?;
            }
        }

        Ok(())
    }

    /// All items in this subtree, pre-order (own items, then children in octant order)
    ///
    /// An item stored in several leaves appears once per leaf.
    pub fn collect_all(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.all_items().into_iter().cloned().collect()
    }

    /// Borrowing variant of [`Self::collect_all`]
    pub fn all_items(&self) -> Vec<&T> {
        let mut items = Vec::new();
        self.collect_refs(&mut items);
        items
    }

    fn collect_refs<'a>(&'a self, items: &mut Vec<&'a T>) {
        items.extend(self.items.iter());

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect_refs(items);
            }
        }
    }

    fn drain_into(self, items: &mut Vec<T>) {
        items.extend(self.items);

        if let Some(children) = self.children {
            for child in *children {
                child.drain_into(items);
            }
        }
    }

    /// Turn this internal node back into a leaf holding every descendant item
    ///
    /// Items are moved up in [`Self::collect_all`] order and are not
    /// re-filtered. Fails with [`OctreeError::NotSubdivided`] on a leaf.
    pub fn collapse(&mut self) -> Result<(), OctreeError> {
        let Some(children) = self.children.take() else {
            log::warn!("Ignoring collapse on leaf node at depth {}", self.depth);
            return Err(OctreeError::NotSubdivided { depth: self.depth });
        };

        let mut collected = std::mem::take(&mut self.items);
        for child in *children {
            child.drain_into(&mut collected);
        }

        log::debug!(
            "Collapsed node at depth {} into {} items",
            self.depth,
            collected.len()
        );

        self.items = collected;
        Ok(())
    }

    /// Every node whose box the predicate accepts for `item`, pre-order
    ///
    /// Internal nodes are included. A rejected node's subtree is skipped.
    pub fn find_nodes_containing(&self, item: &T) -> Vec<&SpatialNode<T>> {
        let mut nodes = Vec::new();
        self.search_nodes_containing(item, &mut nodes);
        nodes
    }

    fn search_nodes_containing<'a>(&'a self, item: &T, found: &mut Vec<&'a SpatialNode<T>>) {
        if !self.predicate.overlaps(item, &self.bounds) {
            return;
        }

        found.push(self);

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.search_nodes_containing(item, found);
            }
        }
    }

    /// Leaves whose box the predicate accepts for `item`
    pub fn find_leaves_containing(&self, item: &T) -> Vec<&SpatialNode<T>> {
        self.find_nodes_containing(item)
            .into_iter()
            .filter(|node| node.is_leaf())
            .collect()
    }

    /// Items of every leaf whose box touches the sphere
    ///
    /// Broad-phase only: the items themselves are not tested.
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<&T> {
        let mut results = Vec::new();
        self.query_sphere_into(center, radius, &mut results);
        results
    }

    fn query_sphere_into<'a>(&'a self, center: Vec3, radius: f32, results: &mut Vec<&'a T>) {
        if !self.bounds.intersects_sphere(center, radius) {
            return;
        }

        results.extend(self.items.iter());

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_sphere_into(center, radius, results);
            }
        }
    }

    /// Items of every leaf whose box the ray passes through
    pub fn query_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Vec<&T> {
        let mut results = Vec::new();
        self.query_ray_into(ray_origin, ray_dir, &mut results);
        results
    }

    fn query_ray_into<'a>(&'a self, ray_origin: Vec3, ray_dir: Vec3, results: &mut Vec<&'a T>) {
        if self.bounds.intersect_ray(ray_origin, ray_dir).is_none() {
            return;
        }

        results.extend(self.items.iter());

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_ray_into(ray_origin, ray_dir, results);
            }
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<&SpatialNode<T>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a SpatialNode<T>>) {
        match self.children {
            None => leaves.push(self),
            Some(ref children) => {
                for child in children.iter() {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// Get all nodes at an absolute tree depth
    pub fn nodes_at_depth(&self, target_depth: u32) -> Vec<&SpatialNode<T>> {
        let mut nodes = Vec::new();
        self.collect_nodes_at_depth(target_depth, &mut nodes);
        nodes
    }

    fn collect_nodes_at_depth<'a>(&'a self, target_depth: u32, nodes: &mut Vec<&'a SpatialNode<T>>) {
        if self.depth == target_depth {
            nodes.push(self);
        } else if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect_nodes_at_depth(target_depth, nodes);
            }
        }
    }

    /// Count this node and all its descendants
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(SpatialNode::node_count).sum())
    }

    /// Count item memberships in this subtree (duplicates included)
    pub fn item_count(&self) -> usize {
        let mut count = self.items.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.item_count();
            }
        }

        count
    }

    /// Deepest absolute depth reached in this subtree
    pub fn max_depth(&self) -> u32 {
        self.children.as_ref().map_or(self.depth, |children| {
            children
                .iter()
                .map(SpatialNode::max_depth)
                .max()
                .unwrap_or(self.depth)
        })
    }

    /// Drop every item and child, keeping bounds and predicate
    pub fn clear(&mut self) {
        self.items.clear();
        self.children = None;
    }

    /// Ask `sink` to draw this node's box as a wireframe
    pub fn draw_gizmo<S: GizmoSink + ?Sized>(&self, sink: &mut S) {
        sink.draw_wire_box(self.bounds.center, self.bounds.size, self.depth);
    }

    /// Draw this node and every descendant, pre-order
    pub fn draw_gizmos<S: GizmoSink + ?Sized>(&self, sink: &mut S) {
        self.draw_gizmo(sink);

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.draw_gizmos(sink);
            }
        }
    }
}
