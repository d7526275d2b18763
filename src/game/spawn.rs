//! Per-tick spawn gating for fruit and bombs.
//!
//! Fruit and bombs are gated independently: each has its own level-shrinking
//! cooldown, population cap and probability roll, and a shared minimum gap
//! keeps a bomb from materializing right next to a fresh fruit (fast threats
//! stay readable). Bombs are off entirely at level 1.

use rand::Rng;

use super::config::{DifficultyTier, Tuning};
use super::object::FallingObject;

pub struct ObjectSpawner {
    last_fruit_ms: f64,
    last_bomb_ms: f64,
}

impl ObjectSpawner {
    pub fn new() -> Self {
        Self {
            last_fruit_ms: f64::NEG_INFINITY,
            last_bomb_ms: f64::NEG_INFINITY,
        }
    }

    fn fruit_cooldown_ms(level: u32) -> f64 {
        (1000.0 - level as f64 * 50.0).max(300.0)
    }

    fn bomb_cooldown_ms(level: u32) -> f64 {
        (4000.0 - level as f64 * 200.0).max(2000.0)
    }

    /// Consider launching a fruit this tick.
    pub fn poll_fruit(
        &mut self,
        now_ms: f64,
        level: u32,
        tier: &DifficultyTier,
        fruit_count: usize,
        width: f64,
        height: f64,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Option<FallingObject> {
        let cooled = now_ms - self.last_fruit_ms > Self::fruit_cooldown_ms(level);
        let below_cap = fruit_count < tier.max_fruits;
        let clear_of_bomb = now_ms - self.last_bomb_ms > tuning.bomb_fruit_gap_ms;
        if !(cooled && below_cap && clear_of_bomb) {
            return None;
        }
        let rate = tuning.base_fruit_spawn_rate * tier.spawn_multiplier;
        if rng.gen_range(0.0..1.0) >= rate {
            return None;
        }
        self.last_fruit_ms = now_ms;
        Some(FallingObject::spawn_fruit(width, height, level, now_ms, tuning, rng))
    }

    /// Consider launching a bomb this tick. Never fires at level 1.
    pub fn poll_bomb(
        &mut self,
        now_ms: f64,
        level: u32,
        tier: &DifficultyTier,
        bomb_count: usize,
        width: f64,
        height: f64,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Option<FallingObject> {
        if level <= 1 {
            return None;
        }
        let cooled = now_ms - self.last_bomb_ms > Self::bomb_cooldown_ms(level);
        let below_cap = bomb_count < tuning.max_bombs;
        let clear_of_fruit = now_ms - self.last_fruit_ms > tuning.bomb_fruit_gap_ms;
        if !(cooled && below_cap && clear_of_fruit) {
            return None;
        }
        let rate = (tuning.bomb_spawn_rate + level as f64 * tuning.bomb_spawn_increase)
            * tier.bomb_chance;
        if rng.gen_range(0.0..1.0) >= rate {
            return None;
        }
        self.last_bomb_ms = now_ms;
        Some(FallingObject::spawn_bomb(width, height, level, now_ms, tuning, rng))
    }
}

impl Default for ObjectSpawner {
    fn default() -> Self {
        Self::new()
    }
}
