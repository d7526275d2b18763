//! Tuning data for the whole game: physics constants, spawn rates, slice
//! detection thresholds, archetype tables and the difficulty ladder.
//!
//! Everything numeric lives here as data so gameplay feel can be tuned without
//! touching logic. The `serde` feature makes [`Tuning`] (de)serializable so an
//! embedding page can override it as JSON.

/// Rarity tier of a fruit archetype. Gates availability by difficulty level
/// and drives selection weight and particle-burst scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// Selection weight among eligible archetypes (common heaviest).
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 60,
            Rarity::Uncommon => 25,
            Rarity::Rare => 10,
            Rarity::Legendary => 5,
        }
    }

    /// Minimum difficulty level at which the tier may spawn.
    pub fn min_level(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 3,
            Rarity::Rare => 6,
            Rarity::Legendary => 8,
        }
    }

    /// Particle-burst scale on slice (rarer fruit bursts bigger).
    pub fn burst_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 2.0,
            Rarity::Rare => 2.5,
            Rarity::Legendary => 3.0,
        }
    }
}

/// Immutable description of one fruit kind.
pub struct FruitArchetype {
    pub name: &'static str,
    pub color: &'static str,
    pub size: f64,
    pub points: i64,
    pub glyph: &'static str,
    pub rarity: Rarity,
}

pub static FRUIT_ARCHETYPES: [FruitArchetype; 8] = [
    FruitArchetype { name: "apple", color: "#ff4757", size: 40.0, points: 10, glyph: "\u{1F34E}", rarity: Rarity::Common },
    FruitArchetype { name: "banana", color: "#ffa502", size: 45.0, points: 15, glyph: "\u{1F34C}", rarity: Rarity::Common },
    FruitArchetype { name: "orange", color: "#ff6348", size: 38.0, points: 12, glyph: "\u{1F34A}", rarity: Rarity::Common },
    FruitArchetype { name: "watermelon", color: "#2ed573", size: 55.0, points: 20, glyph: "\u{1F349}", rarity: Rarity::Uncommon },
    FruitArchetype { name: "pineapple", color: "#ffc048", size: 50.0, points: 25, glyph: "\u{1F34D}", rarity: Rarity::Uncommon },
    FruitArchetype { name: "strawberry", color: "#ff3838", size: 35.0, points: 18, glyph: "\u{1F353}", rarity: Rarity::Common },
    // High-value archetypes, only seen deep into a run.
    FruitArchetype { name: "dragon_fruit", color: "#e056fd", size: 48.0, points: 50, glyph: "\u{1F409}", rarity: Rarity::Rare },
    FruitArchetype { name: "golden_apple", color: "#f1c40f", size: 42.0, points: 100, glyph: "\u{1F3C6}", rarity: Rarity::Legendary },
];

/// The single bomb archetype.
pub struct BombArchetype {
    pub name: &'static str,
    pub color: &'static str,
    pub size: f64,
    pub glyph: &'static str,
}

pub static BOMB_ARCHETYPE: BombArchetype = BombArchetype {
    name: "bomb",
    color: "#2c2c2c",
    size: 45.0,
    glyph: "\u{1F4A3}",
};

/// Explosion palette for bomb particle bursts.
pub static BOMB_BURST_COLORS: [&str; 4] = ["#ff4757", "#ff6b35", "#2c2c2c", "#ff9ff3"];

/// One row of the difficulty ladder. Levels past the table reuse the last row.
pub struct DifficultyTier {
    pub level: u32,
    pub name: &'static str,
    pub spawn_multiplier: f64,
    pub speed_multiplier: f64,
    pub max_fruits: usize,
    pub bomb_chance: f64,
}

pub static DIFFICULTY_TIERS: [DifficultyTier; 10] = [
    DifficultyTier { level: 1, name: "Beginner", spawn_multiplier: 1.0, speed_multiplier: 1.0, max_fruits: 3, bomb_chance: 0.02 },
    DifficultyTier { level: 2, name: "Easy", spawn_multiplier: 1.2, speed_multiplier: 1.1, max_fruits: 4, bomb_chance: 0.03 },
    DifficultyTier { level: 3, name: "Normal", spawn_multiplier: 1.4, speed_multiplier: 1.2, max_fruits: 5, bomb_chance: 0.04 },
    DifficultyTier { level: 4, name: "Challenging", spawn_multiplier: 1.6, speed_multiplier: 1.3, max_fruits: 6, bomb_chance: 0.05 },
    DifficultyTier { level: 5, name: "Hard", spawn_multiplier: 1.8, speed_multiplier: 1.4, max_fruits: 7, bomb_chance: 0.06 },
    DifficultyTier { level: 6, name: "Expert", spawn_multiplier: 2.0, speed_multiplier: 1.5, max_fruits: 8, bomb_chance: 0.07 },
    DifficultyTier { level: 7, name: "Master", spawn_multiplier: 2.2, speed_multiplier: 1.6, max_fruits: 9, bomb_chance: 0.08 },
    DifficultyTier { level: 8, name: "Insane", spawn_multiplier: 2.4, speed_multiplier: 1.7, max_fruits: 10, bomb_chance: 0.09 },
    DifficultyTier { level: 9, name: "Nightmare", spawn_multiplier: 2.6, speed_multiplier: 1.8, max_fruits: 11, bomb_chance: 0.10 },
    DifficultyTier { level: 10, name: "LEGENDARY", spawn_multiplier: 3.0, speed_multiplier: 2.0, max_fruits: 12, bomb_chance: 0.12 },
];

/// Smoothing / derivative parameters for the motion estimator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionTuning {
    /// Weight given to the previous smoothed position (0 = no smoothing).
    pub smoothing_factor: f64,
    /// Bounded velocity-history length backing all derivatives.
    pub history_capacity: usize,
    /// Number of trailing history points averaged into the smoothed velocity.
    pub smoothed_window: usize,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.3,
            history_capacity: 15,
            smoothed_window: 5,
        }
    }
}

/// Thresholds and strength scales for the slice decision heuristics.
/// Each `*_trigger` / `*_scale` pair belongs to one heuristic; strengths map
/// the driving quantity to 0..1 via division by the scale.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceTuning {
    pub cooldown_ms: f64,
    pub min_confidence: f64,
    pub raw_velocity_trigger: f64,
    pub raw_velocity_scale: f64,
    pub sustained_velocity_trigger: f64,
    pub sustained_velocity_scale: f64,
    pub acceleration_trigger: f64,
    pub acceleration_scale: f64,
    pub pointing_velocity_trigger: f64,
    pub pointing_velocity_scale: f64,
    pub slicing_velocity_trigger: f64,
    pub slicing_velocity_scale: f64,
    pub spread_trigger_px: f64,
    pub spread_velocity_trigger: f64,
    pub spread_strength: f64,
    pub active_velocity_trigger: f64,
    pub active_strength: f64,
    /// Normalized-space margin a fingertip must clear its proximal joint by
    /// to count as extended.
    pub finger_extension_margin: f64,
}

impl Default for SliceTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 50.0,
            min_confidence: 0.3,
            raw_velocity_trigger: 150.0,
            raw_velocity_scale: 800.0,
            sustained_velocity_trigger: 120.0,
            sustained_velocity_scale: 600.0,
            acceleration_trigger: 100.0,
            acceleration_scale: 400.0,
            pointing_velocity_trigger: 100.0,
            pointing_velocity_scale: 500.0,
            slicing_velocity_trigger: 80.0,
            slicing_velocity_scale: 400.0,
            spread_trigger_px: 50.0,
            spread_velocity_trigger: 80.0,
            spread_strength: 0.6,
            active_velocity_trigger: 60.0,
            active_strength: 0.4,
            finger_extension_margin: 0.01,
        }
    }
}

/// Top-level tuning for the simulation. Defaults reproduce the shipped feel.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuning {
    pub gravity: f64,
    pub max_lives: i32,

    // Spawning
    pub base_fruit_spawn_rate: f64,
    pub base_fruit_min_velocity: f64,
    pub base_fruit_max_velocity: f64,
    pub velocity_increase: f64,
    pub bomb_spawn_rate: f64,
    pub bomb_spawn_increase: f64,
    pub bomb_min_velocity: f64,
    pub bomb_max_velocity: f64,
    pub bomb_fruit_gap_ms: f64,
    pub max_bombs: usize,

    // Difficulty ramp
    pub difficulty_score_interval: i64,
    pub max_difficulty_level: u32,

    // Object lifecycle
    pub object_lifetime_ms: f64,
    pub fruit_size_multiplier: f64,
    pub bomb_size_multiplier: f64,
    pub offscreen_margin: f64,

    // Collision
    pub collision_base_radius: f64,
    pub collision_slice_bonus: f64,
    pub trail_capacity: usize,
    pub trail_render_window_ms: f64,
    pub trail_collision_window_ms: f64,
    pub slice_zone_duration_ms: f64,
    pub max_slice_zones: usize,
    pub predictive_velocity_trigger: f64,
    pub predictive_reach_px: f64,

    // Combo
    pub combo_window_ms: f64,
    pub combo_multiplier_cap: u32,

    pub motion: MotionTuning,
    pub slice: SliceTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.4,
            max_lives: 3,

            base_fruit_spawn_rate: 0.015,
            base_fruit_min_velocity: 20.0,
            base_fruit_max_velocity: 28.0,
            velocity_increase: 2.0,
            bomb_spawn_rate: 0.008,
            bomb_spawn_increase: 0.002,
            bomb_min_velocity: 18.0,
            bomb_max_velocity: 25.0,
            bomb_fruit_gap_ms: 2000.0,
            max_bombs: 2,

            difficulty_score_interval: 100,
            max_difficulty_level: 20,

            object_lifetime_ms: 15_000.0,
            fruit_size_multiplier: 1.75,
            bomb_size_multiplier: 1.5,
            offscreen_margin: 200.0,

            collision_base_radius: 35.0,
            collision_slice_bonus: 25.0,
            trail_capacity: 50,
            trail_render_window_ms: 800.0,
            trail_collision_window_ms: 300.0,
            slice_zone_duration_ms: 300.0,
            max_slice_zones: 10,
            predictive_velocity_trigger: 100.0,
            predictive_reach_px: 50.0,

            combo_window_ms: 2000.0,
            combo_multiplier_cap: 5,

            motion: MotionTuning::default(),
            slice: SliceTuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_weights_order_common_heaviest() {
        assert!(Rarity::Common.weight() > Rarity::Uncommon.weight());
        assert!(Rarity::Uncommon.weight() > Rarity::Rare.weight());
        assert!(Rarity::Rare.weight() > Rarity::Legendary.weight());
    }

    #[test]
    fn archetype_table_is_consistent() {
        use std::collections::HashSet;
        let mut names = HashSet::new();
        for a in FRUIT_ARCHETYPES.iter() {
            assert!(names.insert(a.name), "duplicate archetype '{}'", a.name);
            assert!(a.size > 0.0);
            assert!(a.points > 0, "fruit '{}' must award points", a.name);
        }
    }

    #[test]
    fn difficulty_tiers_ramp_monotonically() {
        for pair in DIFFICULTY_TIERS.windows(2) {
            assert!(pair[1].spawn_multiplier >= pair[0].spawn_multiplier);
            assert!(pair[1].speed_multiplier >= pair[0].speed_multiplier);
            assert!(pair[1].max_fruits >= pair[0].max_fruits);
            assert!(pair[1].bomb_chance >= pair[0].bomb_chance);
            assert_eq!(pair[1].level, pair[0].level + 1);
        }
    }
}
