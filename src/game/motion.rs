//! Motion estimation over the tracked hand.
//!
//! Converts the per-frame fingertip sample into smoothed positions, velocity
//! (instantaneous and windowed), acceleration and movement direction. A
//! bounded history ring buffer backs all derivatives. Tracking loss resets
//! the whole state immediately; nothing stale survives a gap.

use std::collections::VecDeque;

use super::config::MotionTuning;
use super::gesture::{GestureKind, SliceDecision};
use super::hand::HandPoints;

/// Screen-space point / vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f64 {
        Vec2::new(self.x - other.x, self.y - other.y).length()
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2 { x, y }
    }
}

#[derive(Clone, Copy, Debug)]
struct HistoryPoint {
    pos: Vec2,
    t_ms: f64,
}

/// The published motion state the simulation reads every tick. Only one hand
/// is ever tracked; when none is detected every field holds its default.
#[derive(Clone, Debug, Default)]
pub struct MotionState {
    pub index_finger: Option<Vec2>,
    pub middle_finger: Option<Vec2>,
    pub thumb: Option<Vec2>,
    /// px/s over the last displacement.
    pub raw_velocity: f64,
    /// px/s averaged over the trailing window.
    pub smoothed_velocity: f64,
    /// Signed px/s change between the two most recent per-step velocities.
    pub acceleration: f64,
    /// Unit vector of the last displacement (zero vector when still).
    pub movement_direction: Vec2,
    pub gesture: GestureKind,
    pub is_slicing: bool,
    pub slice_strength: f64,
    pub hand_confidence: f64,
    /// Screen distance between index fingertip and thumb tip.
    pub finger_spread: f64,
}

/// Exponential smoothing + derivative pipeline for one tracked hand.
pub struct MotionEstimator {
    tuning: MotionTuning,
    history: VecDeque<HistoryPoint>,
    state: MotionState,
}

impl MotionEstimator {
    pub fn new(tuning: MotionTuning) -> Self {
        Self {
            history: VecDeque::with_capacity(tuning.history_capacity + 1),
            tuning,
            state: MotionState::default(),
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Feed one frame. `None` means no hand was detected, which resets the
    /// whole state at once.
    pub fn update(&mut self, sample: Option<HandPoints>, now_ms: f64) -> &MotionState {
        let Some(points) = sample else {
            self.reset();
            return &self.state;
        };

        let f = self.tuning.smoothing_factor;
        self.state.index_finger = Some(smooth(self.state.index_finger, points.index.into(), f));
        self.state.middle_finger = Some(smooth(self.state.middle_finger, points.middle.into(), f));
        self.state.thumb = Some(smooth(self.state.thumb, points.thumb.into(), f));

        let index = self.state.index_finger.unwrap_or_default();
        self.history.push_back(HistoryPoint { pos: index, t_ms: now_ms });
        while self.history.len() > self.tuning.history_capacity {
            self.history.pop_front();
        }

        self.recompute_kinematics();
        &self.state
    }

    /// Fill in the classification half of the state once the gesture and
    /// slice decision for this frame are known.
    pub fn set_classification(
        &mut self,
        gesture: GestureKind,
        decision: SliceDecision,
        confidence: f64,
    ) {
        self.state.gesture = gesture;
        self.state.is_slicing = decision.is_slicing;
        self.state.slice_strength = decision.strength;
        self.state.hand_confidence = confidence;
        self.state.finger_spread = match (self.state.index_finger, self.state.thumb) {
            (Some(i), Some(t)) => i.distance(t),
            _ => 0.0,
        };
    }

    /// Drop everything: history, positions, derivatives, gesture. Invoked on
    /// any frame with no detected hand.
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = MotionState::default();
    }

    fn recompute_kinematics(&mut self) {
        self.state.raw_velocity = 0.0;
        self.state.smoothed_velocity = 0.0;
        self.state.acceleration = 0.0;
        self.state.movement_direction = Vec2::default();

        let n = self.history.len();
        if n < 2 {
            return;
        }

        let current = self.history[n - 1];
        let previous = self.history[n - 2];
        let dx = current.pos.x - previous.pos.x;
        let dy = current.pos.y - previous.pos.y;
        let dt = current.t_ms - previous.t_ms;
        if dt > 0.0 {
            self.state.raw_velocity = (dx * dx + dy * dy).sqrt() / dt * 1000.0;
            let magnitude = (dx * dx + dy * dy).sqrt();
            if magnitude > 0.0 {
                self.state.movement_direction = Vec2::new(dx / magnitude, dy / magnitude);
            }
        }

        // Windowed mean of per-step velocities (zero-dt steps skipped).
        let window_start = n.saturating_sub(self.tuning.smoothed_window);
        let mut total = 0.0;
        let mut samples = 0u32;
        for i in (window_start + 1)..n {
            if let Some(v) = step_velocity(&self.history[i - 1], &self.history[i]) {
                total += v;
                samples += 1;
            }
        }
        if samples > 0 {
            self.state.smoothed_velocity = total / samples as f64;
        }

        if n >= 3 {
            let v1 = step_velocity(&self.history[n - 3], &self.history[n - 2]);
            let v2 = step_velocity(&self.history[n - 2], &self.history[n - 1]);
            if let (Some(v1), Some(v2)) = (v1, v2) {
                self.state.acceleration = v2 - v1;
            }
        }
    }
}

fn smooth(prev: Option<Vec2>, raw: Vec2, factor: f64) -> Vec2 {
    match prev {
        // First sample for a point is used as-is.
        None => raw,
        Some(p) => Vec2::new(
            p.x * factor + raw.x * (1.0 - factor),
            p.y * factor + raw.y * (1.0 - factor),
        ),
    }
}

fn step_velocity(a: &HistoryPoint, b: &HistoryPoint) -> Option<f64> {
    let dt = b.t_ms - a.t_ms;
    if dt <= 0.0 {
        return None;
    }
    Some(a.pos.distance(b.pos) / dt * 1000.0)
}
