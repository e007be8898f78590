//! Grid and object-alignment snapping.
//!
//! Object snap compares the moving node's six alignment lines (left,
//! h-center, right, top, v-center, bottom) against every other node's
//! lines each drag tick. The nearest match within the threshold wins;
//! exact ties break by candidate node id string, so the result never
//! depends on map iteration order.

use nc_core::NodeId;
use nc_core::model::{Point, Rect};

/// Orientation of an infinite alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// A vertical line at `position` on the x axis.
    Vertical,
    /// A horizontal line at `position` on the y axis.
    Horizontal,
}

/// An infinite guide line drawn through a matched alignment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f32,
}

/// Round to the nearest grid multiple. A non-positive grid disables it.
pub fn grid_snap(v: f32, grid: f32) -> f32 {
    if grid <= 0.0 {
        v
    } else {
        (v / grid).round() * grid
    }
}

pub fn grid_snap_point(p: Point, grid: f32) -> Point {
    Point::new(grid_snap(p.x, grid), grid_snap(p.y, grid))
}

/// Result of snapping a dragged node's position.
#[derive(Debug, Clone, Default)]
pub struct PositionSnap {
    /// Overridden x for the node's origin, when an x-axis line matched.
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub guides: Vec<Guide>,
}

/// Result of snapping the moving right/bottom edge during a resize.
#[derive(Debug, Clone, Default)]
pub struct ResizeSnap {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub guides: Vec<Guide>,
}

#[derive(Clone, Copy)]
struct Candidate {
    distance: f32,
    id: NodeId,
    /// Origin (or dimension) value that makes the lines coincide.
    resolved: f32,
    guide: f32,
}

fn better(best: &Option<Candidate>, next: &Candidate) -> bool {
    match best {
        None => true,
        Some(b) => {
            next.distance < b.distance
                || (next.distance == b.distance && next.id.as_str() < b.id.as_str())
        }
    }
}

fn x_lines(rect: &Rect) -> [f32; 3] {
    [rect.x, rect.x + rect.width / 2.0, rect.x + rect.width]
}

fn y_lines(rect: &Rect) -> [f32; 3] {
    [rect.y, rect.y + rect.height / 2.0, rect.y + rect.height]
}

/// Snap a moving node against every other node's alignment lines.
pub fn snap_position(moving: &Rect, others: &[(NodeId, Rect)], threshold: f32) -> PositionSnap {
    let mut best_x: Option<Candidate> = None;
    let mut best_y: Option<Candidate> = None;

    // Offsets from the node origin to each of its own lines.
    let x_offsets = [0.0, moving.width / 2.0, moving.width];
    let y_offsets = [0.0, moving.height / 2.0, moving.height];

    for (id, rect) in others {
        for line in x_lines(rect) {
            for off in x_offsets {
                let delta = line - (moving.x + off);
                if delta.abs() <= threshold {
                    let cand = Candidate {
                        distance: delta.abs(),
                        id: *id,
                        resolved: moving.x + delta,
                        guide: line,
                    };
                    if better(&best_x, &cand) {
                        best_x = Some(cand);
                    }
                }
            }
        }
        for line in y_lines(rect) {
            for off in y_offsets {
                let delta = line - (moving.y + off);
                if delta.abs() <= threshold {
                    let cand = Candidate {
                        distance: delta.abs(),
                        id: *id,
                        resolved: moving.y + delta,
                        guide: line,
                    };
                    if better(&best_y, &cand) {
                        best_y = Some(cand);
                    }
                }
            }
        }
    }

    let mut snap = PositionSnap::default();
    if let Some(c) = best_x {
        snap.x = Some(c.resolved);
        snap.guides.push(Guide {
            axis: GuideAxis::Vertical,
            position: c.guide,
        });
    }
    if let Some(c) = best_y {
        snap.y = Some(c.resolved);
        snap.guides.push(Guide {
            axis: GuideAxis::Horizontal,
            position: c.guide,
        });
    }
    snap
}

/// Snap the moving edges (right/bottom) of a resizing node.
pub fn snap_resize(moving: &Rect, others: &[(NodeId, Rect)], threshold: f32) -> ResizeSnap {
    let mut best_w: Option<Candidate> = None;
    let mut best_h: Option<Candidate> = None;

    let right = moving.x + moving.width;
    let bottom = moving.y + moving.height;

    for (id, rect) in others {
        for line in x_lines(rect) {
            let delta = line - right;
            let width = moving.width + delta;
            if delta.abs() <= threshold && width >= 1.0 {
                let cand = Candidate {
                    distance: delta.abs(),
                    id: *id,
                    resolved: width,
                    guide: line,
                };
                if better(&best_w, &cand) {
                    best_w = Some(cand);
                }
            }
        }
        for line in y_lines(rect) {
            let delta = line - bottom;
            let height = moving.height + delta;
            if delta.abs() <= threshold && height >= 1.0 {
                let cand = Candidate {
                    distance: delta.abs(),
                    id: *id,
                    resolved: height,
                    guide: line,
                };
                if better(&best_h, &cand) {
                    best_h = Some(cand);
                }
            }
        }
    }

    let mut snap = ResizeSnap::default();
    if let Some(c) = best_w {
        snap.width = Some(c.resolved);
        snap.guides.push(Guide {
            axis: GuideAxis::Vertical,
            position: c.guide,
        });
    }
    if let Some(c) = best_h {
        snap.height = Some(c.resolved);
        snap.guides.push(Guide {
            axis: GuideAxis::Horizontal,
            position: c.guide,
        });
    }
    snap
}
