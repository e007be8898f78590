//! Segment intersection and distance tests.

use nc_core::model::{Point, Rect};

const EPS: f32 = 1e-6;

fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

/// Classic determinant-based intersection of two line segments.
/// Returns the intersection point, or `None` when the segments are
/// parallel or do not overlap within their extents.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = (a2.x - a1.x, a2.y - a1.y);
    let s = (b2.x - b1.x, b2.y - b1.y);
    let denom = cross(r.0, r.1, s.0, s.1);
    if denom.abs() < EPS {
        return None;
    }
    let qp = (b1.x - a1.x, b1.y - a1.y);
    let t = cross(qp.0, qp.1, s.0, s.1) / denom;
    let u = cross(qp.0, qp.1, r.0, r.1) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(a1.x + t * r.0, a1.y + t * r.1))
    } else {
        None
    }
}

/// Distance from a point to a segment via projection-and-clamp.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let ab = (b.x - a.x, b.y - a.y);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    if len_sq < EPS {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * ab.0 + (p.y - a.y) * ab.1) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * ab.0, a.y + t * ab.1))
}

/// First intersection of a polyline with a segment, walking the polyline
/// from its start.
pub fn polyline_segment_intersection(samples: &[Point], b1: Point, b2: Point) -> Option<Point> {
    samples
        .windows(2)
        .find_map(|pair| segment_intersection(pair[0], pair[1], b1, b2))
}

/// Minimum distance from a point to a sampled polyline.
pub fn polyline_distance(samples: &[Point], p: Point) -> f32 {
    match samples {
        [] => f32::INFINITY,
        [only] => p.distance_to(*only),
        _ => samples
            .windows(2)
            .map(|pair| point_segment_distance(p, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Whether any sample of a polyline falls inside a rectangle
/// (the marquee test for edges).
pub fn polyline_in_rect(samples: &[Point], rect: &Rect) -> bool {
    samples.iter().any(|p| rect.contains(*p))
}

/// Index of the polyline segment nearest to `p` — the insertion index for
/// a new routing point closest to a click.
pub fn nearest_segment_index(points: &[Point], p: Point) -> Option<usize> {
    if points.len() < 2 {
        return None;
    }
    let mut best = (f32::INFINITY, 0usize);
    for (i, pair) in points.windows(2).enumerate() {
        let d = point_segment_distance(p, pair[0], pair[1]);
        if d < best.0 {
            best = (d, i);
        }
    }
    Some(best.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect() {
        let p = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((p.x - 5.0).abs() < 1e-4);
        assert!((p.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn parallel_and_disjoint_segments_do_not() {
        assert_eq!(
            segment_intersection(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(10.0, 1.0),
            ),
            None
        );
        // Lines would cross, segments don't reach.
        assert_eq!(
            segment_intersection(
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ),
            None
        );
    }

    #[test]
    fn point_segment_distance_projects_and_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        // Beyond the endpoint: clamps to the corner.
        assert_eq!(point_segment_distance(Point::new(14.0, 3.0), a, b), 5.0);
        // Degenerate segment.
        assert_eq!(point_segment_distance(Point::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn polyline_helpers() {
        let line = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ];
        assert!(
            polyline_segment_intersection(
                &line,
                Point::new(60.0, -10.0),
                Point::new(60.0, 10.0)
            )
            .is_some()
        );
        assert_eq!(polyline_distance(&line, Point::new(50.0, 7.0)), 7.0);
        assert!(polyline_in_rect(
            &line,
            &Rect::new(40.0, -5.0, 20.0, 10.0)
        ));
        assert!(!polyline_in_rect(
            &line,
            &Rect::new(40.0, 5.0, 20.0, 10.0)
        ));
        assert_eq!(
            nearest_segment_index(&line, Point::new(80.0, 5.0)),
            Some(1)
        );
    }
}
