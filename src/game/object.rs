//! Falling objects: fruit and bombs.
//!
//! One kinematic body with a discriminated payload. Objects launch from the
//! bottom of the play area, arc under gravity, and either get sliced (particle
//! burst, then removal once the burst drains) or leave the screen.

use rand::Rng;

use super::config::{
    BOMB_ARCHETYPE, BOMB_BURST_COLORS, BombArchetype, FRUIT_ARCHETYPES, FruitArchetype, Tuning,
};
use super::motion::Vec2;

/// Debris from a slice. Integrates independently of its parent object.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f64,
    pub max_life: f64,
    pub color: &'static str,
    pub size: f64,
}

/// What a falling body actually is. Shared kinematics live on
/// [`FallingObject`]; everything type-specific hangs off this payload.
#[derive(Clone, Copy)]
pub enum Payload {
    Fruit(&'static FruitArchetype),
    Bomb(&'static BombArchetype),
}

pub struct FallingObject {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f64,
    spin: f64,
    pub payload: Payload,
    pub sliced: bool,
    pub actual_size: f64,
    created_ms: f64,
    level: u32,
    pub particles: Vec<Particle>,
}

/// Rarity-gated weighted pick among the archetypes available at this level.
pub fn pick_fruit_archetype(level: u32, rng: &mut impl Rng) -> &'static FruitArchetype {
    let eligible: Vec<&'static FruitArchetype> = FRUIT_ARCHETYPES
        .iter()
        .filter(|a| level >= a.rarity.min_level())
        .collect();
    let total: u32 = eligible.iter().map(|a| a.rarity.weight()).sum();
    let mut roll = rng.gen_range(0..total);
    for archetype in &eligible {
        let w = archetype.rarity.weight();
        if roll < w {
            return archetype;
        }
        roll -= w;
    }
    eligible[0]
}

impl FallingObject {
    /// Launch a fruit from the bottom edge with upward velocity and lateral
    /// drift scaled by difficulty.
    pub fn spawn_fruit(
        width: f64,
        height: f64,
        level: u32,
        now_ms: f64,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        let archetype = pick_fruit_archetype(level, rng);
        let base = rng.gen_range(tuning.base_fruit_min_velocity..tuning.base_fruit_max_velocity);
        let vy = -(base + level as f64 * tuning.velocity_increase);
        Self::launch(
            Payload::Fruit(archetype),
            archetype.size * tuning.fruit_size_multiplier,
            width,
            height,
            level,
            vy,
            now_ms,
            rng,
        )
    }

    /// Launch the bomb archetype. Slightly slower than fruit at the same
    /// level so it reads as a heavier object.
    pub fn spawn_bomb(
        width: f64,
        height: f64,
        level: u32,
        now_ms: f64,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        let base = rng.gen_range(tuning.bomb_min_velocity..tuning.bomb_max_velocity);
        let vy = -(base + level as f64 * tuning.velocity_increase * 0.8);
        Self::launch(
            Payload::Bomb(&BOMB_ARCHETYPE),
            BOMB_ARCHETYPE.size * tuning.bomb_size_multiplier,
            width,
            height,
            level,
            vy,
            now_ms,
            rng,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn launch(
        payload: Payload,
        actual_size: f64,
        width: f64,
        height: f64,
        level: u32,
        vy: f64,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let x = rng.gen_range(0.0..1.0) * (width - 200.0).max(1.0) + 100.0;
        let vx = (rng.gen_range(0.0..1.0) - 0.5) * (8.0 + level as f64 * 2.0);
        let spin = (rng.gen_range(0.0..1.0) - 0.5) * (0.4 + level as f64 * 0.1);
        Self {
            pos: Vec2::new(x, height + 50.0),
            vel: Vec2::new(vx, vy),
            rotation: 0.0,
            spin,
            payload,
            sliced: false,
            actual_size,
            created_ms: now_ms,
            level,
            particles: Vec::new(),
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self.payload, Payload::Bomb(_))
    }

    /// Collision radius (half the rendered size).
    pub fn radius(&self) -> f64 {
        self.actual_size / 2.0
    }

    /// Base points before the combo multiplier. Bombs award nothing.
    pub fn base_points(&self) -> i64 {
        match self.payload {
            Payload::Fruit(archetype) => archetype.points,
            Payload::Bomb(_) => 0,
        }
    }

    /// True while the object is dropping back down.
    pub fn falling_down(&self) -> bool {
        self.vel.y > 0.0
    }

    /// Advance one tick: ballistic integration while unsliced, plus particle
    /// decay either way.
    pub fn update(&mut self, tuning: &Tuning) {
        if !self.sliced {
            self.pos.x += self.vel.x;
            self.pos.y += self.vel.y;
            self.vel.y += tuning.gravity;
            self.rotation += self.spin;
            // Mild horizontal drag, a touch stronger at higher levels.
            let air_resistance = 0.999 - self.level as f64 * 0.0001;
            self.vel.x *= air_resistance;
        }

        self.particles.retain_mut(|p| {
            p.pos.x += p.vel.x;
            p.pos.y += p.vel.y;
            p.vel.y += 0.3;
            p.vel.x *= 0.98;
            p.life -= 1.0;
            p.life > 0.0
        });
    }

    /// Mark sliced and emit the particle burst. A second call is a no-op;
    /// the transition is never reversed.
    pub fn slice(&mut self, rng: &mut impl Rng) {
        if self.sliced {
            return;
        }
        self.sliced = true;
        match self.payload {
            Payload::Bomb(_) => self.burst_bomb(rng),
            Payload::Fruit(archetype) => self.burst_fruit(archetype, rng),
        }
    }

    fn burst_bomb(&mut self, rng: &mut impl Rng) {
        for _ in 0..35 {
            let color = BOMB_BURST_COLORS[rng.gen_range(0..BOMB_BURST_COLORS.len())];
            self.particles.push(Particle {
                pos: Vec2::new(
                    self.pos.x + (rng.gen_range(0.0..1.0) - 0.5) * self.actual_size,
                    self.pos.y + (rng.gen_range(0.0..1.0) - 0.5) * self.actual_size,
                ),
                vel: Vec2::new(
                    (rng.gen_range(0.0..1.0) - 0.5) * 25.0,
                    (rng.gen_range(0.0..1.0) - 0.5) * 25.0 - 12.0,
                ),
                life: 50.0 + rng.gen_range(0.0..40.0),
                max_life: 90.0,
                color,
                size: 3.0 + rng.gen_range(0.0..8.0),
            });
        }
    }

    fn burst_fruit(&mut self, archetype: &'static FruitArchetype, rng: &mut impl Rng) {
        let mult = archetype.rarity.burst_multiplier();
        let count = ((20.0 + self.actual_size / 8.0) * mult) as usize;
        for _ in 0..count {
            self.particles.push(Particle {
                pos: Vec2::new(
                    self.pos.x + (rng.gen_range(0.0..1.0) - 0.5) * self.actual_size,
                    self.pos.y + (rng.gen_range(0.0..1.0) - 0.5) * self.actual_size,
                ),
                vel: Vec2::new(
                    (rng.gen_range(0.0..1.0) - 0.5) * (16.0 + mult * 4.0),
                    (rng.gen_range(0.0..1.0) - 0.5) * (16.0 + mult * 4.0) - 8.0,
                ),
                life: 40.0 + rng.gen_range(0.0..(30.0 + mult * 20.0)),
                max_life: 70.0 + mult * 30.0,
                color: archetype.color,
                size: 2.0 + rng.gen_range(0.0..(5.0 + mult)),
            });
        }
    }

    /// Off-screen / stale test, independent of slice state. Used by the
    /// session to garbage-collect forgotten objects.
    pub fn is_expired(&self, width: f64, height: f64, now_ms: f64, tuning: &Tuning) -> bool {
        self.pos.y > height + tuning.offscreen_margin
            || self.pos.x < -tuning.offscreen_margin
            || self.pos.x > width + tuning.offscreen_margin
            || now_ms - self.created_ms > tuning.object_lifetime_ms
    }
}
