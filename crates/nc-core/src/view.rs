//! Pan/zoom view transform: world space ↔ screen space.

use crate::model::{Node, Point, Rect};
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;

/// The canvas pan/zoom state. All pointer coordinates pass through here
/// before touching world-space node/edge data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Set a new scale, recomputing the offset so the world point under
    /// `screen_point` stays fixed. Scale is clamped to `[0.1, 3.0]`.
    pub fn zoom_at(&mut self, screen_point: Point, new_scale: f32) {
        let new_scale = new_scale.clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.offset_x = screen_point.x - (screen_point.x - self.offset_x) * ratio;
        self.offset_y = screen_point.y - (screen_point.y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Fit the view to a world-space bounding box within a viewport,
    /// leaving `margin` screen pixels on every side.
    pub fn fit_bounds(&mut self, bounds: Rect, viewport_w: f32, viewport_h: f32, margin: f32) {
        if bounds.width <= 0.0 || bounds.height <= 0.0 || viewport_w <= 0.0 || viewport_h <= 0.0 {
            return;
        }
        let sx = (viewport_w - margin * 2.0) / bounds.width;
        let sy = (viewport_h - margin * 2.0) / bounds.height;
        self.scale = sx.min(sy).clamp(MIN_SCALE, MAX_SCALE);
        let center = bounds.center();
        self.offset_x = viewport_w / 2.0 - center.x * self.scale;
        self.offset_y = viewport_h / 2.0 - center.y * self.scale;
    }

    /// A node's rectangle in world space. Pinned nodes are stored in screen
    /// coordinates; converting here lets geometry, snapping, and hit-testing
    /// treat every node uniformly.
    pub fn node_world_rect(&self, node: &Node) -> Rect {
        if node.pinned {
            let origin = self.screen_to_world(Point::new(node.x, node.y));
            Rect::new(
                origin.x,
                origin.y,
                node.width / self.scale,
                node.height / self.scale,
            )
        } else {
            node.rect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};

    #[test]
    fn screen_world_roundtrip() {
        let mut view = ViewTransform::default();
        view.scale = 1.5;
        view.offset_x = 40.0;
        view.offset_y = -10.0;

        let p = Point::new(123.0, 456.0);
        let back = view.world_to_screen(view.screen_to_world(p));
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn zoom_at_keeps_cursor_point_fixed() {
        let mut view = ViewTransform::default();
        view.pan_by(100.0, 50.0);

        let cursor = Point::new(300.0, 200.0);
        let world_before = view.screen_to_world(cursor);
        view.zoom_at(cursor, 2.0);
        let world_after = view.screen_to_world(cursor);

        assert!((world_before.x - world_after.x).abs() < 1e-3);
        assert!((world_before.y - world_after.y).abs() < 1e-3);
        assert_eq!(view.scale, 2.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewTransform::default();
        view.zoom_at(Point::new(0.0, 0.0), 100.0);
        assert_eq!(view.scale, MAX_SCALE);
        view.zoom_at(Point::new(0.0, 0.0), 0.0001);
        assert_eq!(view.scale, MIN_SCALE);
    }

    #[test]
    fn pinned_node_rect_passes_through_inverse_transform() {
        let mut view = ViewTransform::default();
        view.scale = 2.0;
        view.offset_x = 100.0;

        let mut node = Node::new(NodeKind::card("markdown"), 300.0, 40.0, 200.0, 100.0);
        node.pinned = true;
        let rect = view.node_world_rect(&node);
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.width, 100.0);

        node.pinned = false;
        assert_eq!(view.node_world_rect(&node).x, 300.0);
    }

    #[test]
    fn fit_bounds_centers_content() {
        let mut view = ViewTransform::default();
        view.fit_bounds(Rect::new(0.0, 0.0, 400.0, 300.0), 800.0, 600.0, 0.0);
        assert_eq!(view.scale, 2.0);
        let center = view.world_to_screen(Point::new(200.0, 150.0));
        assert_eq!(center.x, 400.0);
        assert_eq!(center.y, 300.0);
    }
}
