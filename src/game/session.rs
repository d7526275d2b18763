//! Session state machine and per-tick orchestration.
//!
//! `Menu -> Playing -> GameOver`, with restart looping back to `Playing`.
//! Only `Playing` runs the pipeline: trail/zone bookkeeping, spawning,
//! kinematics, collision, scoring and life accounting. Everything the
//! renderer needs is exposed read-only; everything the embedder needs to
//! react to comes back as ordered [`SessionEvent`]s.

use rand::Rng;

use super::collision::{self, SliceZone, TrailPoint};
use super::combo::ComboTracker;
use super::config::{DifficultyTier, Tuning};
use super::difficulty;
use super::motion::MotionState;
use super::object::FallingObject;
use super::spawn::ObjectSpawner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

/// Events resolved during one tick, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FruitSliced { points: i64 },
    FruitMissed,
    BombSliced,
    GameOver { score: i64 },
}

pub struct GameSession {
    phase: Phase,
    score: i64,
    lives: i32,
    width: f64,
    height: f64,
    tuning: Tuning,
    objects: Vec<FallingObject>,
    trail: Vec<TrailPoint>,
    zones: Vec<SliceZone>,
    combo: ComboTracker,
    spawner: ObjectSpawner,
}

impl GameSession {
    pub fn new(width: f64, height: f64, tuning: Tuning) -> Self {
        Self {
            phase: Phase::Menu,
            score: 0,
            lives: tuning.max_lives,
            width,
            height,
            tuning,
            objects: Vec::new(),
            trail: Vec::new(),
            zones: Vec::new(),
            combo: ComboTracker::new(),
            spawner: ObjectSpawner::new(),
        }
    }

    // --- Read access for the renderer / HUD --------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn score(&self) -> i64 {
        self.score
    }
    pub fn lives(&self) -> i32 {
        self.lives
    }
    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }
    pub fn trail(&self) -> &[TrailPoint] {
        &self.trail
    }
    pub fn zones(&self) -> &[SliceZone] {
        &self.zones
    }
    pub fn combo_multiplier(&self) -> u32 {
        self.combo.multiplier()
    }
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level(&self) -> u32 {
        difficulty::level_for_score(self.score, &self.tuning)
    }

    pub fn tier(&self) -> &'static DifficultyTier {
        difficulty::tier_for_level(self.level())
    }

    pub fn fruit_count(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_bomb() && !o.sliced).count()
    }

    pub fn bomb_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_bomb() && !o.sliced).count()
    }

    // --- Transitions --------------------------------------------------------

    /// Enter (or re-enter) play with a fresh session.
    pub fn start(&mut self) {
        self.phase = Phase::Playing;
        self.score = 0;
        self.lives = self.tuning.max_lives;
        self.objects.clear();
        self.trail.clear();
        self.zones.clear();
        self.combo = ComboTracker::new();
        self.spawner = ObjectSpawner::new();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // --- Tick ----------------------------------------------------------------

    /// Advance one frame. A no-op outside `Playing`.
    pub fn tick(
        &mut self,
        motion: &MotionState,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Playing {
            return events;
        }

        self.track_hand(motion, now_ms);
        self.run_spawner(now_ms, rng);
        self.advance_objects(motion, now_ms, rng, &mut events);

        if self.lives <= 0 {
            self.phase = Phase::GameOver;
            events.push(SessionEvent::GameOver { score: self.score });
        }
        events
    }

    /// Record the fingertip into the trail and open a slice zone when the
    /// hand is actively slicing (or simply moving fast enough to count).
    fn track_hand(&mut self, motion: &MotionState, now_ms: f64) {
        collision::prune_trail(&mut self.trail, now_ms, &self.tuning);
        collision::prune_zones(&mut self.zones, now_ms, &self.tuning);

        let Some(finger) = motion.index_finger else {
            return;
        };
        self.trail.push(TrailPoint {
            pos: finger,
            t_ms: now_ms,
            strength: motion.slice_strength,
            velocity: motion.raw_velocity,
        });
        if self.trail.len() > self.tuning.trail_capacity {
            let excess = self.trail.len() - self.tuning.trail_capacity;
            self.trail.drain(..excess);
        }

        if motion.is_slicing || motion.raw_velocity > self.tuning.slice.raw_velocity_trigger {
            self.push_zone(SliceZone::new(
                finger,
                motion.slice_strength,
                motion.raw_velocity,
                now_ms,
            ));
        }
    }

    fn push_zone(&mut self, zone: SliceZone) {
        self.zones.push(zone);
        if self.zones.len() > self.tuning.max_slice_zones {
            let excess = self.zones.len() - self.tuning.max_slice_zones;
            self.zones.drain(..excess);
        }
    }

    fn run_spawner(&mut self, now_ms: f64, rng: &mut impl Rng) {
        let level = self.level();
        let tier = self.tier();
        if let Some(fruit) = self.spawner.poll_fruit(
            now_ms,
            level,
            tier,
            self.fruit_count(),
            self.width,
            self.height,
            &self.tuning,
            rng,
        ) {
            self.objects.push(fruit);
        }
        if let Some(bomb) = self.spawner.poll_bomb(
            now_ms,
            level,
            tier,
            self.bomb_count(),
            self.width,
            self.height,
            &self.tuning,
            rng,
        ) {
            self.objects.push(bomb);
        }
    }

    fn advance_objects(
        &mut self,
        motion: &MotionState,
        now_ms: f64,
        rng: &mut impl Rng,
        events: &mut Vec<SessionEvent>,
    ) {
        let mut objects = std::mem::take(&mut self.objects);
        objects.retain_mut(|object| {
            object.update(&self.tuning);

            if !object.sliced {
                if let Some(_hit) =
                    collision::resolve(object, motion, &self.trail, &self.zones, now_ms, &self.tuning)
                {
                    object.slice(rng);
                    if object.is_bomb() {
                        self.lives -= 1;
                        self.combo.reset();
                        events.push(SessionEvent::BombSliced);
                    } else {
                        let points =
                            self.combo.on_fruit_slice(object.base_points(), now_ms, &self.tuning);
                        self.score += points;
                        events.push(SessionEvent::FruitSliced { points });
                    }
                    // Leave a full-strength contact zone at the finger so a
                    // continuing swipe carries through neighbors.
                    if let Some(finger) = motion.index_finger {
                        self.push_zone(SliceZone::new(finger, 1.0, motion.raw_velocity, now_ms));
                    }
                }
            }

            if !object.sliced && object.is_expired(self.width, self.height, now_ms, &self.tuning) {
                // Only a fruit that fell past the player costs a life.
                if object.falling_down() && !object.is_bomb() {
                    self.lives -= 1;
                    self.combo.reset();
                    events.push(SessionEvent::FruitMissed);
                }
                return false;
            }

            // Sliced objects linger until their burst has drained.
            !(object.sliced && object.particles.is_empty())
        });
        self.objects = objects;
    }
}
