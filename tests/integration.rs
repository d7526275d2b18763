// Integration tests (native) for the `fruit-slash` crate.
// These tests avoid wasm-specific functionality and exercise pure game logic
// so they can run under `cargo test` on the host. Randomized paths use a
// seeded StdRng, so every run is deterministic.

use fruit_slash::game::config::Tuning;
use fruit_slash::game::motion::{MotionState, Vec2};
use fruit_slash::game::session::{GameSession, Phase, SessionEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;

const W: f64 = 1200.0;
const H: f64 = 800.0;
const TICK_MS: f64 = 16.0;

fn playing_session() -> GameSession {
    let mut session = GameSession::new(W, H, Tuning::default());
    session.start();
    session
}

/// Motion state of a confident, fast, slicing hand at a given point.
fn slicing_hand_at(x: f64, y: f64) -> MotionState {
    MotionState {
        index_finger: Some(Vec2::new(x, y)),
        middle_finger: Some(Vec2::new(x + 10.0, y)),
        thumb: Some(Vec2::new(x - 30.0, y + 30.0)),
        raw_velocity: 400.0,
        smoothed_velocity: 300.0,
        is_slicing: true,
        slice_strength: 0.9,
        hand_confidence: 0.9,
        ..Default::default()
    }
}

#[test]
fn unattended_session_runs_out_of_lives() {
    let mut session = playing_session();
    let mut rng = StdRng::seed_from_u64(1);
    let idle = MotionState::default();

    let mut misses = 0;
    let mut now = 0.0;
    // Nobody slices anything: fruit falls past the player until the session
    // ends. Two minutes of simulated frames is far more than enough.
    for _ in 0..8000 {
        for event in session.tick(&idle, now, &mut rng) {
            if event == SessionEvent::FruitMissed {
                misses += 1;
            }
        }
        if session.phase() == Phase::GameOver {
            break;
        }
        now += TICK_MS;
    }

    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.lives() <= 0);
    assert!(misses >= Tuning::default().max_lives);
    assert_eq!(session.score(), 0);

    // Terminal state is stable: further ticks produce nothing.
    assert!(session.tick(&idle, now + TICK_MS, &mut rng).is_empty());
}

#[test]
fn slicing_every_fruit_accumulates_score_without_losing_lives() {
    let mut session = playing_session();
    let mut rng = StdRng::seed_from_u64(2);

    let mut total_points = 0;
    let mut lives_lost = 0;
    let mut now = 0.0;
    for _ in 0..4000 {
        // Chase the first live fruit with a slicing hand; park the hand in a
        // corner when nothing is up.
        let target = session
            .objects()
            .iter()
            .find(|o| !o.sliced && !o.is_bomb())
            .map(|o| o.pos);
        let motion = match target {
            Some(p) => slicing_hand_at(p.x, p.y),
            None => MotionState::default(),
        };
        for event in session.tick(&motion, now, &mut rng) {
            match event {
                SessionEvent::FruitSliced { points } => {
                    assert!(points > 0);
                    total_points += points;
                }
                SessionEvent::FruitMissed | SessionEvent::BombSliced => lives_lost += 1,
                SessionEvent::GameOver { .. } => {}
            }
        }
        if session.phase() == Phase::GameOver {
            break;
        }
        now += TICK_MS;
    }

    assert!(total_points > 0, "a minute of play must land some fruit");
    assert_eq!(session.score(), total_points, "score is exactly the event sum");
    assert_eq!(
        session.lives(),
        Tuning::default().max_lives - lives_lost,
        "lives only move with miss/bomb events"
    );
}

#[test]
fn no_bombs_appear_while_on_level_one() {
    let mut session = playing_session();
    let mut rng = StdRng::seed_from_u64(3);
    let idle = MotionState::default();

    let mut now = 0.0;
    for _ in 0..8000 {
        session.tick(&idle, now, &mut rng);
        assert_eq!(session.level(), 1, "idle play cannot leave level 1");
        assert!(
            session.objects().iter().all(|o| !o.is_bomb()),
            "bombs are disabled on level 1"
        );
        if session.phase() == Phase::GameOver {
            break;
        }
        now += TICK_MS;
    }
}

#[test]
fn restart_resets_score_lives_and_phase() {
    let mut session = playing_session();
    let mut rng = StdRng::seed_from_u64(4);
    let idle = MotionState::default();

    let mut now = 0.0;
    while session.phase() != Phase::GameOver {
        session.tick(&idle, now, &mut rng);
        now += TICK_MS;
        assert!(now < 1e7, "session must end in bounded time");
    }

    session.start();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.score(), 0);
    assert_eq!(session.lives(), Tuning::default().max_lives);
    assert!(session.objects().is_empty());
    assert!(session.trail().is_empty());
    assert!(session.zones().is_empty());
}

#[test]
fn game_over_event_carries_the_final_score() {
    let mut session = playing_session();
    let mut rng = StdRng::seed_from_u64(5);
    let idle = MotionState::default();

    let mut now = 0.0;
    let mut final_score = None;
    for _ in 0..10_000 {
        for event in session.tick(&idle, now, &mut rng) {
            if let SessionEvent::GameOver { score } = event {
                final_score = Some(score);
            }
        }
        if final_score.is_some() {
            break;
        }
        now += TICK_MS;
    }
    assert_eq!(final_score, Some(session.score()));
}

#[test]
fn menu_phase_spawns_nothing() {
    let mut session = GameSession::new(W, H, Tuning::default());
    let mut rng = StdRng::seed_from_u64(6);
    let mut now = 0.0;
    for _ in 0..2000 {
        let events = session.tick(&slicing_hand_at(600.0, 400.0), now, &mut rng);
        assert!(events.is_empty());
        now += TICK_MS;
    }
    assert_eq!(session.phase(), Phase::Menu);
    assert!(session.objects().is_empty());
    assert!(session.trail().is_empty());
}
