//! Edge path generation: two-point Béziers and Catmull-Rom splines.

use nc_core::model::{HandleSide, Point};

/// Control-point offset cap for the two-point curve.
const MAX_CONTROL_OFFSET: f32 = 100.0;

/// Orientation of the terminal end of a curve. `Auto` is used while an
/// edge is being drawn interactively: the end gets no padding or control
/// offset, so the terminal arrowhead orients itself toward the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOrient {
    Side(HandleSide),
    Auto,
}

/// A single path command, SVG-like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    CubicTo(Point, Point, Point), // c1, c2, end
}

/// A rendered edge path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePath {
    pub cmds: Vec<PathCmd>,
}

impl EdgePath {
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        match self.cmds.first() {
            Some(PathCmd::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<Point> {
        match self.cmds.last() {
            Some(PathCmd::MoveTo(p)) => Some(*p),
            Some(PathCmd::CubicTo(_, _, p)) => Some(*p),
            None => None,
        }
    }

    /// Emit as an SVG path string (`M x y C x1 y1 x2 y2 x y …`).
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for cmd in &self.cmds {
            match cmd {
                PathCmd::MoveTo(p) => {
                    out.push_str(&format!("M {} {} ", p.x, p.y));
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    out.push_str(&format!(
                        "C {} {} {} {} {} {} ",
                        c1.x, c1.y, c2.x, c2.y, p.x, p.y
                    ));
                }
            }
        }
        out.trim_end().to_string()
    }
}

fn along(p: Point, side: HandleSide, dist: f32) -> Point {
    let (dx, dy) = side.outward();
    Point::new(p.x + dx * dist, p.y + dy * dist)
}

/// Cubic Bézier between two handle points.
///
/// Each endpoint is padded along its handle's outward axis by
/// `min(max_padding, distance / 2.5)`, and the control point sits beyond
/// the padded point by `min(100, padded_distance / 2)`. An `Auto` end skips
/// end-side padding and control offset entirely.
pub fn two_point_curve(
    p1: Point,
    o1: HandleSide,
    p2: Point,
    o2: EndOrient,
    max_padding: f32,
) -> EdgePath {
    let distance = p1.distance_to(p2);
    if distance == 0.0 {
        // Degenerate: no path rather than NaN control points.
        return EdgePath::default();
    }
    let padding = max_padding.min(distance / 2.5);

    let p1_padded = along(p1, o1, padding);
    let p2_padded = match o2 {
        EndOrient::Side(side) => along(p2, side, padding),
        EndOrient::Auto => p2,
    };

    let padded_distance = p1_padded.distance_to(p2_padded);
    let offset = MAX_CONTROL_OFFSET.min(padded_distance / 2.0);

    let c1 = along(p1_padded, o1, offset);
    let c2 = match o2 {
        EndOrient::Side(side) => along(p2_padded, side, offset),
        EndOrient::Auto => p2,
    };

    EdgePath {
        cmds: vec![PathCmd::MoveTo(p1), PathCmd::CubicTo(c1, c2, p2)],
    }
}

/// Catmull-Rom-interpolated piecewise cubic through all points. For each
/// interior segment the control points derive from the neighborhood:
/// `cp1 = p1 + (p2 - p0) / 6`, `cp2 = p2 - (p3 - p1) / 6`, duplicating the
/// boundary point when out of range.
pub fn catmull_rom_spline(points: &[Point]) -> EdgePath {
    if points.len() < 2 {
        return EdgePath::default();
    }
    let mut cmds = Vec::with_capacity(points.len());
    cmds.push(PathCmd::MoveTo(points[0]));
    for i in 0..points.len() - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < points.len() {
            points[i + 2]
        } else {
            points[i + 1]
        };

        let cp1 = Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
        let cp2 = Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
        cmds.push(PathCmd::CubicTo(cp1, cp2, p2));
    }
    EdgePath { cmds }
}

/// The full path for an edge: a spline through the routing points when any
/// exist, otherwise the two-point curve.
pub fn edge_path(
    start: Point,
    start_side: HandleSide,
    routing_points: &[Point],
    end: Point,
    end_orient: EndOrient,
    max_padding: f32,
) -> EdgePath {
    if routing_points.is_empty() {
        return two_point_curve(start, start_side, end, end_orient, max_padding);
    }
    let mut points = Vec::with_capacity(routing_points.len() + 2);
    points.push(start);
    points.extend_from_slice(routing_points);
    points.push(end);
    catmull_rom_spline(&points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_curve_padding_and_offsets() {
        // Horizontal layout, 250 apart: padding = min(60, 100) = 60,
        // padded distance = 250 - 120 = 130, offset = min(100, 65) = 65.
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(250.0, 0.0);
        let path = two_point_curve(
            p1,
            HandleSide::Right,
            p2,
            EndOrient::Side(HandleSide::Left),
            60.0,
        );

        assert_eq!(path.start(), Some(p1));
        match path.cmds[1] {
            PathCmd::CubicTo(c1, c2, end) => {
                assert_eq!(c1, Point::new(60.0 + 65.0, 0.0));
                assert_eq!(c2, Point::new(250.0 - 125.0, 0.0));
                assert_eq!(end, p2);
            }
            _ => panic!("expected CubicTo"),
        }
    }

    #[test]
    fn short_curves_scale_padding_by_distance() {
        // 100 apart: padding = min(60, 100/2.5) = 40.
        let path = two_point_curve(
            Point::new(0.0, 0.0),
            HandleSide::Right,
            Point::new(100.0, 0.0),
            EndOrient::Side(HandleSide::Left),
            60.0,
        );
        match path.cmds[1] {
            PathCmd::CubicTo(c1, ..) => {
                // padded distance = 100 - 80 = 20, offset = 10
                assert_eq!(c1.x, 50.0);
            }
            _ => panic!("expected CubicTo"),
        }
    }

    #[test]
    fn auto_end_skips_end_side_shaping() {
        let p2 = Point::new(200.0, 80.0);
        let path = two_point_curve(
            Point::new(0.0, 0.0),
            HandleSide::Right,
            p2,
            EndOrient::Auto,
            60.0,
        );
        match path.cmds[1] {
            PathCmd::CubicTo(_, c2, end) => {
                assert_eq!(c2, p2);
                assert_eq!(end, p2);
            }
            _ => panic!("expected CubicTo"),
        }
    }

    #[test]
    fn zero_length_curve_short_circuits() {
        let p = Point::new(5.0, 5.0);
        let path = two_point_curve(p, HandleSide::Top, p, EndOrient::Auto, 60.0);
        assert!(path.is_empty());
    }

    #[test]
    fn catmull_rom_control_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(60.0, 60.0),
            Point::new(120.0, 0.0),
        ];
        let path = catmull_rom_spline(&points);
        assert_eq!(path.cmds.len(), 3);

        // First segment: p0 duplicated from the boundary.
        match path.cmds[1] {
            PathCmd::CubicTo(cp1, cp2, end) => {
                assert_eq!(cp1, Point::new(10.0, 10.0)); // p1 + (p2-p0)/6
                assert_eq!(cp2, Point::new(40.0, 60.0)); // p2 - (p3-p1)/6
                assert_eq!(end, points[1]);
            }
            _ => panic!("expected CubicTo"),
        }
        // Last segment: p3 duplicated from the boundary.
        match path.cmds[2] {
            PathCmd::CubicTo(cp1, cp2, end) => {
                assert_eq!(cp1, Point::new(80.0, 60.0));
                assert_eq!(cp2, Point::new(110.0, 10.0));
                assert_eq!(end, points[2]);
            }
            _ => panic!("expected CubicTo"),
        }
    }

    #[test]
    fn edge_path_degenerates_to_two_point_curve() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(300.0, 0.0);
        let direct = edge_path(
            start,
            HandleSide::Right,
            &[],
            end,
            EndOrient::Side(HandleSide::Left),
            60.0,
        );
        let expected = two_point_curve(
            start,
            HandleSide::Right,
            end,
            EndOrient::Side(HandleSide::Left),
            60.0,
        );
        assert_eq!(direct, expected);

        let routed = edge_path(
            start,
            HandleSide::Right,
            &[Point::new(150.0, 100.0)],
            end,
            EndOrient::Side(HandleSide::Left),
            60.0,
        );
        assert_eq!(routed.cmds.len(), 3);
    }

    #[test]
    fn svg_emission() {
        let path = EdgePath {
            cmds: vec![
                PathCmd::MoveTo(Point::new(1.0, 2.0)),
                PathCmd::CubicTo(
                    Point::new(3.0, 4.0),
                    Point::new(5.0, 6.0),
                    Point::new(7.0, 8.0),
                ),
            ],
        };
        assert_eq!(path.to_svg(), "M 1 2 C 3 4 5 6 7 8");
    }
}
