//! Length-parameterized path sampling.
//!
//! Cut lines, marquee hits, and edge-drop tests all operate on sampled
//! polylines rather than exact curves. The sampling step (≈5 world units)
//! trades accuracy against per-tick cost.

use crate::curve::{EdgePath, PathCmd};
use kurbo::{CubicBez, ParamCurve, ParamCurveArclen};
use nc_core::model::Point;

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

/// Sample a path at roughly `step` world units of arc length. The first
/// and last points of the path are always included. Degenerate paths
/// produce an empty polyline.
pub fn sample_path(path: &EdgePath, step: f32) -> Vec<Point> {
    let step = step.max(0.1) as f64;
    let mut out: Vec<Point> = Vec::new();
    let mut cursor: Option<kurbo::Point> = None;
    // Arc length carried over from the previous segment so spacing stays
    // even across cubic boundaries.
    let mut carry = 0.0f64;

    for cmd in &path.cmds {
        match cmd {
            PathCmd::MoveTo(p) => {
                let kp = to_kurbo(*p);
                if out.is_empty() {
                    out.push(*p);
                }
                cursor = Some(kp);
                carry = 0.0;
            }
            PathCmd::CubicTo(c1, c2, end) => {
                let Some(start) = cursor else { continue };
                let bez = CubicBez::new(start, to_kurbo(*c1), to_kurbo(*c2), to_kurbo(*end));
                let len = bez.arclen(0.1);
                if len > 0.0 {
                    // Walk the curve at fine parameter steps, emitting a
                    // point every `step` units of accumulated chord length.
                    let fine = ((len / step).ceil() as usize * 4).max(8);
                    let mut prev = bez.eval(0.0);
                    let mut acc = carry;
                    for i in 1..=fine {
                        let t = i as f64 / fine as f64;
                        let p = bez.eval(t);
                        acc += prev.distance(p);
                        prev = p;
                        if acc >= step {
                            out.push(from_kurbo(p));
                            acc = 0.0;
                        }
                    }
                    carry = acc;
                }
                if out.last() != Some(end) {
                    out.push(*end);
                }
                cursor = Some(to_kurbo(*end));
            }
        }
    }
    out
}

/// Total arc length of a path.
pub fn path_length(path: &EdgePath) -> f32 {
    let mut total = 0.0f64;
    let mut cursor: Option<kurbo::Point> = None;
    for cmd in &path.cmds {
        match cmd {
            PathCmd::MoveTo(p) => cursor = Some(to_kurbo(*p)),
            PathCmd::CubicTo(c1, c2, end) => {
                if let Some(start) = cursor {
                    total += CubicBez::new(start, to_kurbo(*c1), to_kurbo(*c2), to_kurbo(*end))
                        .arclen(0.1);
                }
                cursor = Some(to_kurbo(*end));
            }
        }
    }
    total as f32
}
