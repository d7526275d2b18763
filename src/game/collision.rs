//! Collision resolution between the tracked hand and falling objects.
//!
//! Four redundant strategies are tried in order: direct fingertip proximity,
//! recent trail proximity, decaying slice-zone proximity, and a velocity
//! extrapolation for fast swipes. First hit wins; the order only short-cuts
//! work, it never changes the outcome. The zones let a hit land slightly
//! after the fastest part of a swipe has already passed the object.

use super::config::Tuning;
use super::motion::{MotionState, Vec2};
use super::object::FallingObject;

/// One breadcrumb of the fingertip path.
#[derive(Clone, Copy, Debug)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub t_ms: f64,
    pub strength: f64,
    pub velocity: f64,
}

/// Transient contact region left behind by slicing motion.
#[derive(Clone, Copy, Debug)]
pub struct SliceZone {
    pub pos: Vec2,
    pub radius: f64,
    pub strength: f64,
    pub t_ms: f64,
}

impl SliceZone {
    /// Radius grows with both strength and velocity.
    pub fn new(pos: Vec2, strength: f64, velocity: f64, now_ms: f64) -> Self {
        let base_radius = 20.0;
        let velocity_bonus = (velocity / 15.0).min(30.0);
        let strength_bonus = strength * 25.0;
        Self {
            pos,
            radius: base_radius + velocity_bonus + strength_bonus,
            strength,
            t_ms: now_ms,
        }
    }

    pub fn age_fraction(&self, now_ms: f64, tuning: &Tuning) -> f64 {
        ((now_ms - self.t_ms) / tuning.slice_zone_duration_ms).clamp(0.0, 1.0)
    }
}

/// Which strategy produced a hit. Kept around so the redundancy stays
/// observable in logs and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Direct,
    Trail,
    Zone,
    Predictive,
}

/// Test one unsliced object against the current motion state.
pub fn resolve(
    object: &FallingObject,
    motion: &MotionState,
    trail: &[TrailPoint],
    zones: &[SliceZone],
    now_ms: f64,
    tuning: &Tuning,
) -> Option<HitKind> {
    if object.sliced {
        return None;
    }

    // Direct fingertip proximity, inflated while actively slicing.
    if let Some(finger) = motion.index_finger {
        let mut radius = object.radius() + tuning.collision_base_radius;
        if motion.is_slicing {
            radius += tuning.collision_slice_bonus;
            radius += motion.slice_strength * 20.0;
            radius += (motion.raw_velocity / 15.0).min(25.0);
        }
        if object.pos.distance(finger) < radius {
            return Some(HitKind::Direct);
        }
    }

    // Recent trail points: the path swept since the last few frames.
    for point in trail {
        if now_ms - point.t_ms >= tuning.trail_collision_window_ms {
            continue;
        }
        let radius = object.radius() + 35.0 + point.velocity / 20.0;
        if object.pos.distance(point.pos) < radius {
            return Some(HitKind::Trail);
        }
    }

    // Live slice zones.
    for zone in zones {
        if object.pos.distance(zone.pos) < zone.radius + object.radius() {
            return Some(HitKind::Zone);
        }
    }

    // Fast swipes: test a point extrapolated along the movement direction.
    if motion.raw_velocity > tuning.predictive_velocity_trigger {
        if let Some(finger) = motion.index_finger {
            let predicted = Vec2::new(
                finger.x + motion.movement_direction.x * tuning.predictive_reach_px,
                finger.y + motion.movement_direction.y * tuning.predictive_reach_px,
            );
            if object.pos.distance(predicted) < object.radius() + 30.0 {
                return Some(HitKind::Predictive);
            }
        }
    }

    None
}

/// Drop trail points older than the render window and clamp the length.
pub fn prune_trail(trail: &mut Vec<TrailPoint>, now_ms: f64, tuning: &Tuning) {
    trail.retain(|p| now_ms - p.t_ms < tuning.trail_render_window_ms);
    if trail.len() > tuning.trail_capacity {
        let excess = trail.len() - tuning.trail_capacity;
        trail.drain(..excess);
    }
}

/// Drop expired zones and clamp the population.
pub fn prune_zones(zones: &mut Vec<SliceZone>, now_ms: f64, tuning: &Tuning) {
    zones.retain(|z| now_ms - z.t_ms < tuning.slice_zone_duration_ms);
    if zones.len() > tuning.max_slice_zones {
        let excess = zones.len() - tuning.max_slice_zones;
        zones.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::Tuning;
    use crate::game::object::FallingObject;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn object_at(x: f64, y: f64) -> FallingObject {
        let mut rng = StdRng::seed_from_u64(3);
        let mut obj =
            FallingObject::spawn_fruit(1200.0, 800.0, 1, 0.0, &Tuning::default(), &mut rng);
        obj.pos = Vec2::new(x, y);
        obj
    }

    fn motion_at(x: f64, y: f64) -> MotionState {
        MotionState {
            index_finger: Some(Vec2::new(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn object_on_the_finger_always_hits_while_slicing() {
        let obj = object_at(400.0, 300.0);
        let mut motion = motion_at(400.0, 300.0);
        motion.is_slicing = true;
        motion.slice_strength = 1.0;
        let hit = resolve(&obj, &motion, &[], &[], 0.0, &Tuning::default());
        assert_eq!(hit, Some(HitKind::Direct));
    }

    #[test]
    fn far_object_never_hits() {
        let obj = object_at(2000.0, 2000.0);
        let mut motion = motion_at(0.0, 0.0);
        motion.is_slicing = true;
        motion.slice_strength = 1.0;
        motion.raw_velocity = 900.0;
        motion.movement_direction = Vec2::new(1.0, 0.0);
        let trail = [TrailPoint { pos: Vec2::new(10.0, 0.0), t_ms: 0.0, strength: 1.0, velocity: 900.0 }];
        let zones = [SliceZone::new(Vec2::new(20.0, 0.0), 1.0, 900.0, 0.0)];
        assert_eq!(resolve(&obj, &motion, &trail, &zones, 1.0, &Tuning::default()), None);
    }

    #[test]
    fn sliced_object_is_skipped() {
        let mut obj = object_at(400.0, 300.0);
        obj.sliced = true;
        let mut motion = motion_at(400.0, 300.0);
        motion.is_slicing = true;
        assert_eq!(resolve(&obj, &motion, &[], &[], 0.0, &Tuning::default()), None);
    }

    #[test]
    fn slicing_inflates_the_direct_radius() {
        let t = Tuning::default();
        let obj = object_at(400.0, 300.0);
        // Just beyond the idle radius but inside the slicing bonus.
        let gap = obj.radius() + t.collision_base_radius + 10.0;
        let mut motion = motion_at(400.0 - gap, 300.0);
        assert_eq!(resolve(&obj, &motion, &[], &[], 0.0, &t), None);
        motion.is_slicing = true;
        motion.slice_strength = 1.0;
        assert_eq!(resolve(&obj, &motion, &[], &[], 0.0, &t), Some(HitKind::Direct));
    }

    #[test]
    fn stale_trail_points_do_not_hit() {
        let t = Tuning::default();
        let obj = object_at(400.0, 300.0);
        let motion = MotionState::default();
        let stale = [TrailPoint { pos: obj.pos, t_ms: 0.0, strength: 1.0, velocity: 0.0 }];
        assert_eq!(resolve(&obj, &motion, &stale, &[], 1000.0, &t), None);
        let fresh = [TrailPoint { pos: obj.pos, t_ms: 900.0, strength: 1.0, velocity: 0.0 }];
        assert_eq!(resolve(&obj, &motion, &fresh, &[], 1000.0, &t), Some(HitKind::Trail));
    }

    #[test]
    fn zone_hit_works_without_finger_position() {
        // Hand already gone, but a zone from the swipe is still live.
        let t = Tuning::default();
        let obj = object_at(400.0, 300.0);
        let motion = MotionState::default();
        let zones = [SliceZone::new(Vec2::new(405.0, 300.0), 0.8, 600.0, 0.0)];
        assert_eq!(resolve(&obj, &motion, &[], &zones, 50.0, &t), Some(HitKind::Zone));
    }

    #[test]
    fn predictive_hit_requires_fast_motion() {
        let t = Tuning::default();
        let mut obj = object_at(470.0, 300.0);
        obj.actual_size = 70.0;
        // Finger outside the direct radius, moving toward the object.
        let mut motion = motion_at(390.0, 300.0);
        motion.movement_direction = Vec2::new(1.0, 0.0);
        motion.raw_velocity = 50.0;
        assert_eq!(resolve(&obj, &motion, &[], &[], 0.0, &t), None);
        motion.raw_velocity = 400.0;
        assert_eq!(resolve(&obj, &motion, &[], &[], 0.0, &t), Some(HitKind::Predictive));
    }

    #[test]
    fn zone_radius_grows_with_strength_and_velocity() {
        let weak = SliceZone::new(Vec2::default(), 0.1, 100.0, 0.0);
        let strong = SliceZone::new(Vec2::default(), 1.0, 900.0, 0.0);
        assert!(strong.radius > weak.radius);
        // Velocity bonus saturates
        let faster = SliceZone::new(Vec2::default(), 1.0, 9000.0, 0.0);
        assert_eq!(strong.radius.max(faster.radius), faster.radius);
        assert!((faster.radius - strong.radius).abs() < 1e-9);
    }

    #[test]
    fn prune_keeps_trail_bounded_and_fresh() {
        let t = Tuning::default();
        let mut trail: Vec<TrailPoint> = (0..100)
            .map(|i| TrailPoint {
                pos: Vec2::default(),
                t_ms: i as f64 * 10.0,
                strength: 0.0,
                velocity: 0.0,
            })
            .collect();
        prune_trail(&mut trail, 1000.0, &t);
        assert!(trail.len() <= t.trail_capacity);
        assert!(trail.iter().all(|p| 1000.0 - p.t_ms < t.trail_render_window_ms));
    }

    #[test]
    fn prune_caps_zone_population() {
        let t = Tuning::default();
        let mut zones: Vec<SliceZone> = (0..30)
            .map(|i| SliceZone::new(Vec2::default(), 0.5, 100.0, 1000.0 + i as f64))
            .collect();
        prune_zones(&mut zones, 1050.0, &t);
        assert!(zones.len() <= t.max_slice_zones);
    }
}
