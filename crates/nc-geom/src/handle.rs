//! Connection handle placement.

use nc_core::model::{HandleSide, Point, Rect};
use nc_core::settings::HandleOffsets;

/// The point where edges attach for a given side: the node's mid-edge
/// offset outward by the configured per-side distance.
pub fn handle_position(rect: Rect, side: HandleSide, offsets: &HandleOffsets) -> Point {
    match side {
        HandleSide::Top => Point::new(rect.x + rect.width / 2.0, rect.y - offsets.top),
        HandleSide::Right => Point::new(
            rect.x + rect.width + offsets.right,
            rect.y + rect.height / 2.0,
        ),
        HandleSide::Bottom => Point::new(
            rect.x + rect.width / 2.0,
            rect.y + rect.height + offsets.bottom,
        ),
        HandleSide::Left => Point::new(rect.x - offsets.left, rect.y + rect.height / 2.0),
    }
}
