//! Gesture classification and the slice decision.
//!
//! The geometric classification is pure and per-frame: it looks only at
//! fingertip-vs-proximal-joint geometry, no temporal memory. The slice
//! decision is stateful (cooldown) and deliberately redundant: an explicit
//! ordered list of independent heuristics is OR'd together, trading false
//! positives for near-zero false negatives so the controls feel instant.

use super::config::SliceTuning;
use super::hand::{
    INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, Landmark, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP,
    RING_MCP, RING_TIP,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureKind {
    #[default]
    Idle,
    Pointing,
    Slicing,
}

/// Classify the hand pose from current-frame finger-extension geometry.
/// A finger counts as extended when its tip sits above its proximal joint
/// (smaller y) by more than the margin. Index extended plus at least one
/// other finger selects `Pointing`/`Slicing`; anything else is `Idle`.
pub fn classify_gesture(landmarks: &[Landmark; LANDMARK_COUNT], margin: f64) -> GestureKind {
    let m = margin as f32;
    let extended = |tip: usize, joint: usize| landmarks[tip].y < landmarks[joint].y - m;

    let index = extended(INDEX_TIP, INDEX_PIP);
    let middle = extended(MIDDLE_TIP, MIDDLE_MCP);
    let ring = extended(RING_TIP, RING_MCP);
    let pinky = extended(PINKY_TIP, PINKY_MCP);

    let count = [index, middle, ring, pinky].iter().filter(|e| **e).count();
    if index && count >= 1 {
        if count >= 2 { GestureKind::Slicing } else { GestureKind::Pointing }
    } else {
        GestureKind::Idle
    }
}

/// Per-frame quantities the slice heuristics read.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliceInputs {
    pub raw_velocity: f64,
    pub smoothed_velocity: f64,
    pub acceleration: f64,
    pub gesture: GestureKind,
    /// Index-tip to thumb-tip distance in screen px.
    pub finger_spread: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SliceDecision {
    pub is_slicing: bool,
    pub strength: f64,
}

/// One slice heuristic: a trigger predicate and the strength it proposes
/// when triggered. Keeping these as a table (rather than nested branches)
/// lets each be exercised in isolation.
pub struct SliceHeuristic {
    pub name: &'static str,
    pub triggered: fn(&SliceInputs, &SliceTuning) -> bool,
    pub strength: fn(&SliceInputs, &SliceTuning) -> f64,
}

fn scaled(value: f64, scale: f64) -> f64 {
    (value / scale).min(1.0)
}

pub static SLICE_HEURISTICS: [SliceHeuristic; 7] = [
    // Raw velocity: the most sensitive trigger.
    SliceHeuristic {
        name: "raw_velocity",
        triggered: |s, t| s.raw_velocity > t.raw_velocity_trigger,
        strength: |s, t| scaled(s.raw_velocity, t.raw_velocity_scale),
    },
    // Sustained movement over the smoothing window.
    SliceHeuristic {
        name: "sustained_velocity",
        triggered: |s, t| s.smoothed_velocity > t.sustained_velocity_trigger,
        strength: |s, t| scaled(s.smoothed_velocity, t.sustained_velocity_scale),
    },
    // Quick flicks show up as acceleration before velocity.
    SliceHeuristic {
        name: "acceleration",
        triggered: |s, t| s.acceleration.abs() > t.acceleration_trigger,
        strength: |s, t| scaled(s.acceleration.abs(), t.acceleration_scale),
    },
    // Pointing pose lowers the velocity bar.
    SliceHeuristic {
        name: "pointing_pose",
        triggered: |s, t| {
            s.gesture == GestureKind::Pointing && s.raw_velocity > t.pointing_velocity_trigger
        },
        strength: |s, t| scaled(s.raw_velocity, t.pointing_velocity_scale),
    },
    // Slicing pose lowers it further.
    SliceHeuristic {
        name: "slicing_pose",
        triggered: |s, t| {
            s.gesture == GestureKind::Slicing && s.raw_velocity > t.slicing_velocity_trigger
        },
        strength: |s, t| scaled(s.raw_velocity, t.slicing_velocity_scale),
    },
    // Spread hand (index away from thumb) moving at moderate speed.
    SliceHeuristic {
        name: "finger_spread",
        triggered: |s, t| {
            s.finger_spread > t.spread_trigger_px && s.raw_velocity > t.spread_velocity_trigger
        },
        strength: |_, t| t.spread_strength,
    },
    // Catch-all: any non-idle pose with even low velocity.
    SliceHeuristic {
        name: "active_pose",
        triggered: |s, t| {
            s.gesture != GestureKind::Idle && s.raw_velocity > t.active_velocity_trigger
        },
        strength: |_, t| t.active_strength,
    },
];

/// Cooldown-gated slice detector. Any single heuristic is sufficient;
/// strength is the maximum proposed by the triggered ones.
pub struct SliceDetector {
    last_slice_ms: f64,
}

impl SliceDetector {
    pub fn new() -> Self {
        Self {
            last_slice_ms: f64::NEG_INFINITY,
        }
    }

    pub fn decide(
        &mut self,
        inputs: &SliceInputs,
        confidence: f64,
        now_ms: f64,
        tuning: &SliceTuning,
    ) -> SliceDecision {
        let cooldown_ok = now_ms - self.last_slice_ms > tuning.cooldown_ms;
        if !cooldown_ok || confidence <= tuning.min_confidence {
            return SliceDecision::default();
        }

        let mut decision = SliceDecision::default();
        for heuristic in SLICE_HEURISTICS.iter() {
            if (heuristic.triggered)(inputs, tuning) {
                decision.is_slicing = true;
                decision.strength = decision.strength.max((heuristic.strength)(inputs, tuning));
            }
        }

        if decision.is_slicing {
            // Restart the cooldown no matter which heuristic fired.
            self.last_slice_ms = now_ms;
        }
        decision
    }
}

impl Default for SliceDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_y(pairs: &[(usize, f32)]) -> [Landmark; LANDMARK_COUNT] {
        // Every joint at y = 0.5; override selected indices.
        let mut lm = [Landmark { x: 0.5, y: 0.5, z: 0.0 }; LANDMARK_COUNT];
        for &(idx, y) in pairs {
            lm[idx].y = y;
        }
        lm
    }

    #[test]
    fn curled_hand_is_idle() {
        let lm = hand_with_y(&[]);
        assert_eq!(classify_gesture(&lm, 0.01), GestureKind::Idle);
    }

    #[test]
    fn index_plus_middle_is_slicing() {
        let lm = hand_with_y(&[(INDEX_TIP, 0.3), (MIDDLE_TIP, 0.3)]);
        assert_eq!(classify_gesture(&lm, 0.01), GestureKind::Slicing);
    }

    #[test]
    fn index_alone_is_pointing() {
        let lm = hand_with_y(&[(INDEX_TIP, 0.3)]);
        assert_eq!(classify_gesture(&lm, 0.01), GestureKind::Pointing);
    }

    #[test]
    fn extension_margin_is_respected() {
        // Tip barely above the joint: inside the margin, still idle.
        let lm = hand_with_y(&[(INDEX_TIP, 0.495), (MIDDLE_TIP, 0.495)]);
        assert_eq!(classify_gesture(&lm, 0.01), GestureKind::Idle);
    }

    fn tuning() -> SliceTuning {
        SliceTuning::default()
    }

    #[test]
    fn each_heuristic_triggers_alone() {
        let t = tuning();
        let cases: [(usize, SliceInputs); 7] = [
            (0, SliceInputs { raw_velocity: 200.0, ..Default::default() }),
            (1, SliceInputs { smoothed_velocity: 150.0, ..Default::default() }),
            (2, SliceInputs { acceleration: -150.0, ..Default::default() }),
            (3, SliceInputs { gesture: GestureKind::Pointing, raw_velocity: 110.0, ..Default::default() }),
            (4, SliceInputs { gesture: GestureKind::Slicing, raw_velocity: 90.0, ..Default::default() }),
            (5, SliceInputs { finger_spread: 60.0, raw_velocity: 90.0, ..Default::default() }),
            (6, SliceInputs { gesture: GestureKind::Pointing, raw_velocity: 70.0, ..Default::default() }),
        ];
        for (idx, inputs) in cases {
            let h = &SLICE_HEURISTICS[idx];
            assert!((h.triggered)(&inputs, &t), "heuristic '{}' should trigger", h.name);
            let s = (h.strength)(&inputs, &t);
            assert!(s > 0.0 && s <= 1.0, "heuristic '{}' strength {} out of range", h.name, s);
        }
    }

    #[test]
    fn idle_slow_hand_triggers_nothing() {
        let t = tuning();
        let inputs = SliceInputs { raw_velocity: 50.0, smoothed_velocity: 40.0, ..Default::default() };
        for h in SLICE_HEURISTICS.iter() {
            assert!(!(h.triggered)(&inputs, &t), "heuristic '{}' must stay quiet", h.name);
        }
    }

    #[test]
    fn strength_is_max_of_triggered_heuristics() {
        let mut det = SliceDetector::new();
        // Raw velocity 400: raw heuristic proposes 0.5, slicing pose 1.0 (capped)
        let inputs = SliceInputs {
            raw_velocity: 400.0,
            gesture: GestureKind::Slicing,
            ..Default::default()
        };
        let d = det.decide(&inputs, 0.9, 1000.0, &tuning());
        assert!(d.is_slicing);
        assert!((d.strength - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cooldown_gates_repeat_decisions() {
        let mut det = SliceDetector::new();
        let inputs = SliceInputs { raw_velocity: 500.0, ..Default::default() };
        let t = tuning();
        assert!(det.decide(&inputs, 0.9, 1000.0, &t).is_slicing);
        // 20 ms later: still cooling down
        assert!(!det.decide(&inputs, 0.9, 1020.0, &t).is_slicing);
        // 60 ms later: allowed again
        assert!(det.decide(&inputs, 0.9, 1061.0, &t).is_slicing);
    }

    #[test]
    fn low_confidence_blocks_the_decision() {
        let mut det = SliceDetector::new();
        let inputs = SliceInputs { raw_velocity: 500.0, ..Default::default() };
        let d = det.decide(&inputs, 0.2, 1000.0, &tuning());
        assert!(!d.is_slicing);
        assert_eq!(d.strength, 0.0);
    }
}
