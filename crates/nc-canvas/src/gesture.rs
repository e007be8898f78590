//! Shake-to-disconnect gesture detection.
//!
//! During a drag the primary node's position is sampled at a minimum
//! interval into a bounded ring buffer. Rapid back-and-forth motion shows
//! up as sign changes in consecutive deltas; enough reversals within the
//! buffer fire the disconnect once per drag.

use nc_core::model::Point;
use smallvec::SmallVec;

/// Ring buffer capacity. About half a second of motion at the 50ms
/// sampling interval.
const CAPACITY: usize = 10;

#[derive(Debug, Default)]
pub struct ShakeDetector {
    samples: SmallVec<[Point; CAPACITY]>,
    last_sample_ms: f64,
    /// Set after a trigger; suppresses re-firing until the next drag.
    cooldown: bool,
}

impl ShakeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at drag start. Clears the buffer and the cooldown.
    pub fn begin(&mut self, now_ms: f64, p: Point) {
        self.samples.clear();
        self.samples.push(p);
        self.last_sample_ms = now_ms;
        self.cooldown = false;
    }

    /// Record a position sample if at least `min_interval_ms` has elapsed
    /// since the previous one. Returns true when the buffer changed.
    pub fn sample(&mut self, now_ms: f64, p: Point, min_interval_ms: f64) -> bool {
        if now_ms - self.last_sample_ms < min_interval_ms {
            return false;
        }
        if self.samples.len() == CAPACITY {
            self.samples.remove(0);
        }
        self.samples.push(p);
        self.last_sample_ms = now_ms;
        true
    }

    /// Count direction reversals (sign changes in consecutive x or y
    /// deltas) across the buffer.
    pub fn reversals(&self) -> u32 {
        let mut count = 0;
        let mut prev_dx = 0.0f32;
        let mut prev_dy = 0.0f32;
        for pair in self.samples.windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            if dx * prev_dx < 0.0 {
                count += 1;
            }
            if dy * prev_dy < 0.0 {
                count += 1;
            }
            if dx != 0.0 {
                prev_dx = dx;
            }
            if dy != 0.0 {
                prev_dy = dy;
            }
        }
        count
    }

    /// Whether the gesture should fire: enough reversals and not in
    /// cooldown. Firing enters cooldown until the next `begin`.
    pub fn should_trigger(&mut self, sensitivity: u32) -> bool {
        if self.cooldown {
            return false;
        }
        if self.reversals() > sensitivity {
            self.cooldown = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(detector: &mut ShakeDetector, swings: usize) {
        let mut now = 0.0;
        detector.begin(now, Point::new(0.0, 0.0));
        for i in 0..swings {
            now += 60.0;
            let x = if i % 2 == 0 { 40.0 } else { -40.0 };
            detector.sample(now, Point::new(x, 0.0), 50.0);
        }
    }

    #[test]
    fn alternating_motion_counts_reversals() {
        let mut d = ShakeDetector::new();
        zigzag(&mut d, 6);
        assert!(d.reversals() >= 4, "reversals = {}", d.reversals());
    }

    #[test]
    fn straight_motion_never_triggers() {
        let mut d = ShakeDetector::new();
        d.begin(0.0, Point::new(0.0, 0.0));
        for i in 1..10 {
            d.sample(i as f64 * 60.0, Point::new(i as f32 * 30.0, 0.0), 50.0);
        }
        assert_eq!(d.reversals(), 0);
        assert!(!d.should_trigger(4));
    }

    #[test]
    fn triggers_once_then_cools_down() {
        let mut d = ShakeDetector::new();
        zigzag(&mut d, 8);
        assert!(d.should_trigger(4));
        // Still shaking, but in cooldown now.
        zigzag_continue(&mut d);
        assert!(!d.should_trigger(4));

        // A fresh drag resets the cooldown.
        zigzag(&mut d, 8);
        assert!(d.should_trigger(4));
    }

    fn zigzag_continue(d: &mut ShakeDetector) {
        let mut now = 1000.0;
        for i in 0..6 {
            now += 60.0;
            let x = if i % 2 == 0 { 40.0 } else { -40.0 };
            d.sample(now, Point::new(x, 0.0), 50.0);
        }
    }

    #[test]
    fn samples_below_interval_are_dropped() {
        let mut d = ShakeDetector::new();
        d.begin(0.0, Point::new(0.0, 0.0));
        assert!(!d.sample(20.0, Point::new(10.0, 0.0), 50.0));
        assert!(d.sample(55.0, Point::new(10.0, 0.0), 50.0));
    }
}
