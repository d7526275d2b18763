//! Hand-landmark frame parsing.
//!
//! The embedding page runs the landmark model and pushes each camera frame as
//! flat `f32` slices (`[x, y, z] x 21` per hand, normalized image space, plus
//! an optional world-space batch of the same shape). This module turns one
//! such batch into a typed observation of the single hand that drives play.

/// MediaPipe hand model landmark indices.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One detected hand for one frame: normalized landmarks plus (optionally)
/// the model's world-space points, used only to derive a confidence score.
#[derive(Clone, Debug)]
pub struct HandObservation {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub world: Option<[Landmark; LANDMARK_COUNT]>,
}

/// Screen-space key points extracted from an observation, ready for the
/// motion estimator. `x` is mirrored so on-screen motion matches the player's
/// mirror image.
#[derive(Clone, Copy, Debug)]
pub struct HandPoints {
    pub index: (f64, f64),
    pub middle: (f64, f64),
    pub thumb: (f64, f64),
}

fn parse_hand(flat: &[f32], hand_idx: usize) -> Option<[Landmark; LANDMARK_COUNT]> {
    let base = hand_idx * LANDMARK_COUNT * 3;
    if flat.len() < base + LANDMARK_COUNT * 3 {
        return None;
    }
    let mut out = [Landmark::default(); LANDMARK_COUNT];
    for (i, lm) in out.iter_mut().enumerate() {
        let o = base + i * 3;
        *lm = Landmark {
            x: flat[o],
            y: flat[o + 1],
            z: flat[o + 2],
        };
    }
    Some(out)
}

/// Parse one frame and return the best hand, or `None` when nothing usable
/// was detected this frame. The model orders hands by detection confidence,
/// so "best" is simply index 0; a second hand is ignored.
pub fn best_hand(flat: &[f32], world_flat: &[f32], num_hands: usize) -> Option<HandObservation> {
    if num_hands == 0 {
        return None;
    }
    let landmarks = parse_hand(flat, 0)?;
    let world = parse_hand(world_flat, 0);
    Some(HandObservation { landmarks, world })
}

impl HandObservation {
    /// Detection confidence derived from world-space landmark plausibility:
    /// base 0.6 plus up to 0.4 for the fraction of points inside the
    /// plausible envelope. Without world points the model's own gating is all
    /// we have, so a fixed 0.8 stands in.
    pub fn confidence(&self) -> f64 {
        match &self.world {
            None => 0.8,
            Some(world) => {
                let plausible = world
                    .iter()
                    .filter(|lm| lm.x.abs() < 0.8 && lm.y.abs() < 0.8 && lm.z.abs() < 0.5)
                    .count();
                let confidence = 0.6 + (plausible as f64 / world.len() as f64) * 0.4;
                confidence.min(1.0)
            }
        }
    }

    /// Map the key fingertips to mirrored screen space.
    pub fn screen_points(&self, width: f64, height: f64) -> HandPoints {
        let to_screen = |lm: &Landmark| {
            (
                (1.0 - lm.x as f64) * width,
                lm.y as f64 * height,
            )
        };
        HandPoints {
            index: to_screen(&self.landmarks[INDEX_TIP]),
            middle: to_screen(&self.landmarks[MIDDLE_TIP]),
            thumb: to_screen(&self.landmarks[THUMB_TIP]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(val: f32) -> Vec<f32> {
        vec![val; LANDMARK_COUNT * 3]
    }

    #[test]
    fn empty_frame_yields_no_hand() {
        assert!(best_hand(&[], &[], 0).is_none());
        // num_hands claims one but the buffer is short
        assert!(best_hand(&[0.0; 10], &[], 1).is_none());
    }

    #[test]
    fn parses_first_hand_of_two() {
        let mut flat = flat_hand(0.25);
        flat.extend(flat_hand(0.75));
        let obs = best_hand(&flat, &[], 2).expect("hand");
        assert_eq!(obs.landmarks[WRIST].x, 0.25);
        assert!(obs.world.is_none());
    }

    #[test]
    fn confidence_defaults_without_world_points() {
        let obs = best_hand(&flat_hand(0.5), &[], 1).expect("hand");
        assert_eq!(obs.confidence(), 0.8);
    }

    #[test]
    fn confidence_rewards_plausible_world_points() {
        let flat = flat_hand(0.5);
        // All world points inside the plausible envelope
        let good = flat_hand(0.1);
        let obs = best_hand(&flat, &good, 1).expect("hand");
        assert!((obs.confidence() - 1.0).abs() < 1e-9);

        // All points far outside it: only the base confidence remains
        let bad = flat_hand(5.0);
        let obs = best_hand(&flat, &bad, 1).expect("hand");
        assert!((obs.confidence() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn screen_points_are_mirrored() {
        let mut flat = flat_hand(0.0);
        flat[INDEX_TIP * 3] = 0.25; // x
        flat[INDEX_TIP * 3 + 1] = 0.5; // y
        let obs = best_hand(&flat, &[], 1).expect("hand");
        let pts = obs.screen_points(1000.0, 800.0);
        assert!((pts.index.0 - 750.0).abs() < 1e-9);
        assert!((pts.index.1 - 400.0).abs() < 1e-9);
    }
}
