//! Tunable canvas parameters, shared by geometry and interaction code.

use serde::{Deserialize, Serialize};

/// Outward handle distance per node side, in world units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandleOffsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for HandleOffsets {
    fn default() -> Self {
        Self {
            top: 24.0,
            right: 24.0,
            bottom: 24.0,
            left: 24.0,
        }
    }
}

/// All interaction/geometry tunables in one place so geometry and snap
/// functions take state by reference instead of closing over globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Grid size in world units. `0.0` disables grid snapping.
    pub grid_size: f32,
    /// Object-alignment snap threshold in world units.
    pub snap_threshold: f32,
    pub handle_offsets: HandleOffsets,
    /// Cap on inward curve padding (`min(max_curve_padding, distance/2.5)`).
    pub max_curve_padding: f32,
    /// Path sampling step in world units.
    pub sample_step: f32,
    /// Direction reversals required to trigger shake-to-disconnect.
    pub shake_sensitivity: u32,
    /// Minimum interval between shake samples, in ms.
    pub shake_sample_ms: f64,
    /// Marquee-start debounce, in ms.
    pub select_debounce_ms: f64,
    /// Max distance between a dropped node's center and an edge path for
    /// the drop to splice the edge.
    pub edge_drop_tolerance: f32,
    /// Padding around a new group's member bounding box.
    pub group_padding: f32,
    /// Hit radii (world units) for connection handles and routing points.
    pub handle_hit_radius: f32,
    pub routing_hit_radius: f32,
    /// Width of the resize zone along node borders.
    pub resize_zone: f32,
    /// Max distance for edge click selection / routing point insertion.
    pub edge_hit_tolerance: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_size: 0.0,
            snap_threshold: 8.0,
            handle_offsets: HandleOffsets::default(),
            max_curve_padding: 60.0,
            sample_step: 5.0,
            shake_sensitivity: 4,
            shake_sample_ms: 50.0,
            select_debounce_ms: 150.0,
            edge_drop_tolerance: 12.0,
            group_padding: 40.0,
            handle_hit_radius: 10.0,
            routing_hit_radius: 8.0,
            resize_zone: 10.0,
            edge_hit_tolerance: 8.0,
        }
    }
}
