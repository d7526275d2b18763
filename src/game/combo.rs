//! Consecutive-slice combo scoring.

use super::config::Tuning;

/// Tracks consecutive fruit slices inside a time window and turns them into
/// a score multiplier. Misses and bomb hits zero it out.
pub struct ComboTracker {
    count: u32,
    last_slice_ms: f64,
    multiplier: u32,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self {
            count: 0,
            last_slice_ms: f64::NEG_INFINITY,
            multiplier: 1,
        }
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Register a fruit slice and return the multiplied points to award.
    pub fn on_fruit_slice(&mut self, base_points: i64, now_ms: f64, tuning: &Tuning) -> i64 {
        if now_ms - self.last_slice_ms < tuning.combo_window_ms {
            self.count += 1;
            self.multiplier = (self.count / 3 + 1).min(tuning.combo_multiplier_cap);
        } else {
            self.count = 1;
            self.multiplier = 1;
        }
        self.last_slice_ms = now_ms;
        base_points * self.multiplier as i64
    }

    /// Any miss or bomb hit breaks the chain.
    pub fn reset(&mut self) {
        self.count = 0;
        self.multiplier = 1;
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn two_in_window_slices_stay_at_multiplier_one() {
        let t = tuning();
        let mut combo = ComboTracker::new();
        combo.on_fruit_slice(10, 0.0, &t);
        let points = combo.on_fruit_slice(10, 500.0, &t);
        assert_eq!(combo.multiplier(), 1);
        assert_eq!(points, 10);
    }

    #[test]
    fn third_in_window_slice_doubles() {
        let t = tuning();
        let mut combo = ComboTracker::new();
        combo.on_fruit_slice(10, 0.0, &t);
        combo.on_fruit_slice(10, 500.0, &t);
        let points = combo.on_fruit_slice(10, 1000.0, &t);
        assert_eq!(combo.multiplier(), 2);
        assert_eq!(points, 20);
    }

    #[test]
    fn multiplier_caps() {
        let t = tuning();
        let mut combo = ComboTracker::new();
        let mut now = 0.0;
        for _ in 0..40 {
            combo.on_fruit_slice(10, now, &t);
            now += 100.0;
        }
        assert_eq!(combo.multiplier(), t.combo_multiplier_cap);
    }

    #[test]
    fn lapsed_window_restarts_the_chain() {
        let t = tuning();
        let mut combo = ComboTracker::new();
        combo.on_fruit_slice(10, 0.0, &t);
        combo.on_fruit_slice(10, 500.0, &t);
        combo.on_fruit_slice(10, 1000.0, &t);
        assert_eq!(combo.multiplier(), 2);
        // 3 s gap: back to square one
        let points = combo.on_fruit_slice(10, 4000.0, &t);
        assert_eq!(combo.multiplier(), 1);
        assert_eq!(points, 10);
    }

    #[test]
    fn reset_between_in_window_slices_drops_to_one() {
        let t = tuning();
        let mut combo = ComboTracker::new();
        combo.on_fruit_slice(10, 0.0, &t);
        combo.on_fruit_slice(10, 400.0, &t);
        combo.on_fruit_slice(10, 800.0, &t);
        assert_eq!(combo.multiplier(), 2);
        combo.reset();
        // Next slice lands inside the old window but the chain restarted;
        // count climbs from 1 again.
        combo.on_fruit_slice(10, 1200.0, &t);
        assert_eq!(combo.multiplier(), 1);
    }
}
