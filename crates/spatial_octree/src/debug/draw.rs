//! Debug drawing primitives and system
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing facilities allow programmers to render simple shapes like
//! lines, points, spheres and boxes for debugging and visualization purposes."
//!
//! Nothing here renders. Shapes are collected for a host renderer to pick up
//! through [`DebugDrawSystem::get_shapes`].

use crate::foundation::math::{Vec3, Vec4};
use crate::spatial::SpatialNode;
use std::collections::HashMap;

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Depth at which the gizmo color gradient reaches its deep end
const GRADIENT_DEPTH: f32 = 8.0;

/// Receiver for node wireframe requests
///
/// Implemented by whatever can draw a box outline: the in-crate
/// [`DebugDrawSystem`], or a host renderer.
pub trait GizmoSink {
    /// Draw the outline of an axis-aligned box belonging to a node at `depth`
    fn draw_wire_box(&mut self, center: Vec3, size: Vec3, depth: u32);
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug)]
pub enum DebugShape {
    /// Axis-aligned wireframe box
    WireBox {
        /// Box center
        center: Vec3,
        /// Full box size
        size: Vec3,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Point at position
    Point {
        /// Point position
        position: Vec3,
        /// RGBA color
        color: Vec4,
        /// Marker size
        size: f32,
        /// Remaining lifetime in seconds
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::WireBox { duration, .. } | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        match &mut self {
            DebugShape::WireBox { duration, .. } | DebugShape::Point { duration, .. } => {
                *duration = new_duration;
            }
        }
        self
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            DebugShape::WireBox { duration, .. } | DebugShape::Point { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Debug drawing system collecting shapes for visualization
///
/// GEA 10.2: "Debug rendering systems typically support both temporary shapes
/// (which expire after a certain time) and persistent shapes (which remain
/// until explicitly removed)."
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,

    /// Lifetime given to boxes received through [`GizmoSink`]
    pub gizmo_duration: f32,

    /// Gizmo colors for the root and for deep nodes
    pub depth_colors: (Vec4, Vec4),
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
            gizmo_duration: 0.0,
            depth_colors: (
                Vec4::new(0.5, 0.8, 1.0, 0.6),  // Light blue
                Vec4::new(1.0, 0.3, 0.1, 0.15), // Orange, transparent
            ),
        }
    }

    /// Draw a wireframe box (temporary)
    pub fn draw_box(&mut self, center: Vec3, size: Vec3, color: Vec4, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::WireBox {
            center,
            size,
            color,
            duration,
        });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Draw every node of an octree subtree, colored by depth
    pub fn draw_octree<T>(&mut self, root: &SpatialNode<T>) {
        root.draw_gizmos(self);
    }

    /// Gizmo color for a node at `depth`
    pub fn depth_color(&self, depth: u32) -> Vec4 {
        let t = (depth as f32 / GRADIENT_DEPTH).min(1.0);
        self.depth_colors.0.lerp(&self.depth_colors.1, t)
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl GizmoSink for DebugDrawSystem {
    fn draw_wire_box(&mut self, center: Vec3, size: Vec3, depth: u32) {
        let color = self.depth_color(depth);
        let duration = self.gizmo_duration;
        self.draw_box(center, size, color, duration);
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
