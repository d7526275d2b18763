//! Canvas rendering for one frame: objects, particle bursts, the motion
//! trail, live slice zones, the hand indicator and the difficulty readout.
//! The canvas is cleared (not painted) each frame so the camera layer behind
//! it stays visible.

use web_sys::CanvasRenderingContext2d;

use super::collision::{SliceZone, TrailPoint};
use super::gesture::GestureKind;
use super::motion::MotionState;
use super::object::{FallingObject, Payload};
use super::session::{GameSession, Phase};

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    session: &GameSession,
    motion: &MotionState,
    now: f64,
    width: f64,
    height: f64,
) {
    ctx.clear_rect(0.0, 0.0, width, height);

    match session.phase() {
        Phase::Menu => {
            draw_menu(ctx, width, height);
            return;
        }
        Phase::Playing => {}
        Phase::GameOver => {
            // Keep the last field of objects visible under the overlay.
            for object in session.objects() {
                draw_object(ctx, object, now);
            }
            draw_game_over(ctx, session, width, height);
            return;
        }
    }

    for object in session.objects() {
        draw_object(ctx, object, now);
    }
    draw_trail(ctx, session.trail(), motion, now, session);
    draw_zones(ctx, session.zones(), now, session);
    draw_hand_indicator(ctx, motion, now);
    draw_difficulty_panel(ctx, session);
}

fn draw_object(ctx: &CanvasRenderingContext2d, object: &FallingObject, now: f64) {
    if !object.sliced {
        ctx.save();
        ctx.translate(object.pos.x, object.pos.y).ok();
        ctx.rotate(object.rotation).ok();
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font(&format!("{}px Arial", object.actual_size as i32));

        match object.payload {
            Payload::Bomb(bomb) => {
                // Pulsing danger glow + warning ring
                ctx.set_shadow_color("#ff4757");
                ctx.set_shadow_blur(20.0 + (now * 0.01).sin() * 10.0);
                ctx.set_global_alpha(0.9 + (now * 0.008).sin() * 0.1);
                ctx.fill_text(bomb.glyph, 0.0, 0.0).ok();

                ctx.set_stroke_style_str("#ff4757");
                ctx.set_line_width(3.0);
                ctx.set_global_alpha(0.6 + (now * 0.012).sin() * 0.4);
                ctx.begin_path();
                ctx.arc(0.0, 0.0, object.radius() + 15.0, 0.0, std::f64::consts::TAU)
                    .ok();
                ctx.stroke();
            }
            Payload::Fruit(archetype) => {
                use crate::game::config::Rarity;
                match archetype.rarity {
                    Rarity::Legendary | Rarity::Rare => {
                        ctx.set_shadow_color(archetype.color);
                        ctx.set_shadow_blur(25.0);
                        ctx.set_global_alpha(0.8 + (now * 0.01).sin() * 0.2);
                    }
                    _ => {
                        ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
                        ctx.set_shadow_blur(10.0);
                        ctx.set_shadow_offset_x(4.0);
                        ctx.set_shadow_offset_y(4.0);
                    }
                }
                ctx.fill_text(archetype.glyph, 0.0, 0.0).ok();
            }
        }
        ctx.restore();
    }

    // Burst debris
    for particle in &object.particles {
        let alpha = (particle.life / particle.max_life).clamp(0.0, 1.0);
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_fill_style_str(particle.color);
        ctx.set_shadow_color(particle.color);
        ctx.set_shadow_blur(if object.is_bomb() { 15.0 } else { 8.0 });
        ctx.begin_path();
        ctx.arc(
            particle.pos.x,
            particle.pos.y,
            particle.size,
            0.0,
            std::f64::consts::TAU,
        )
        .ok();
        ctx.fill();
        ctx.restore();
    }
}

fn draw_trail(
    ctx: &CanvasRenderingContext2d,
    trail: &[TrailPoint],
    motion: &MotionState,
    now: f64,
    session: &GameSession,
) {
    if trail.len() < 2 {
        return;
    }
    let window = session.tuning().trail_render_window_ms;
    ctx.save();
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    // Three stacked layers give the streak some body.
    for layer in 0..3u32 {
        let layer_alpha = 0.8 - layer as f64 * 0.2;
        let layer_width = (3 - layer) as f64 * 2.0;

        for i in 1..trail.len() {
            let current = &trail[i];
            let previous = &trail[i - 1];
            let age = ((now - current.t_ms) / window).clamp(0.0, 1.0);
            let alpha = ((1.0 - age) * layer_alpha).max(0.0);
            if alpha <= 0.0 {
                continue;
            }
            let progress = i as f64 / trail.len() as f64;
            let base_width = if motion.is_slicing { 12.0 } else { 6.0 };
            let velocity_multiplier = 1.0 + (current.velocity / 500.0).min(2.0);
            let width = ((base_width + layer_width) * velocity_multiplier * alpha * progress).max(1.0);

            let color = if motion.is_slicing {
                format!("rgba(255, 71, 87, {alpha:.3})")
            } else {
                format!("rgba(0, 210, 211, {alpha:.3})")
            };
            ctx.set_stroke_style_str(&color);
            ctx.set_line_width(width);
            ctx.set_shadow_color(if motion.is_slicing { "#ff4757" } else { "#00d2d3" });
            ctx.set_shadow_blur(25.0 + current.velocity / 20.0);

            ctx.begin_path();
            ctx.move_to(previous.pos.x, previous.pos.y);
            ctx.line_to(current.pos.x, current.pos.y);
            ctx.stroke();
        }
    }
    ctx.restore();
}

fn draw_zones(ctx: &CanvasRenderingContext2d, zones: &[SliceZone], now: f64, session: &GameSession) {
    for zone in zones {
        let alpha = 1.0 - zone.age_fraction(now, session.tuning());
        if alpha <= 0.0 {
            continue;
        }
        ctx.save();
        ctx.set_global_alpha(alpha * 0.3);
        ctx.set_stroke_style_str("#ff4757");
        ctx.set_fill_style_str("rgba(255, 71, 87, 0.08)");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.arc(zone.pos.x, zone.pos.y, zone.radius, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.fill();
        ctx.stroke();
        ctx.restore();
    }
}

fn draw_hand_indicator(ctx: &CanvasRenderingContext2d, motion: &MotionState, now: f64) {
    let Some(finger) = motion.index_finger else {
        return;
    };
    ctx.save();

    let confidence_alpha = motion.hand_confidence.max(0.5);
    let pulse = 1.0 + (now * 0.01).sin() * 0.2;

    let (color, size) = if motion.is_slicing {
        ("#ff1744", 25.0 + motion.slice_strength * 15.0)
    } else {
        match motion.gesture {
            GestureKind::Pointing => ("#ffa502", 12.0),
            GestureKind::Slicing => ("#ff4757", 20.0),
            GestureKind::Idle => ("#00d2d3", 15.0),
        }
    };
    let final_size = size * pulse;

    for layer in 0..3u32 {
        let layer_size = final_size + layer as f64 * 8.0;
        let layer_alpha = confidence_alpha * 0.8 / (layer as f64 + 1.0);
        ctx.set_fill_style_str(color);
        ctx.set_shadow_color(color);
        ctx.set_shadow_blur(30.0 + motion.raw_velocity / 20.0);
        ctx.set_global_alpha(layer_alpha);
        ctx.begin_path();
        ctx.arc(finger.x, finger.y, layer_size, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.fill();
    }

    // Fast swipes get an extra white ring
    if motion.raw_velocity > 200.0 {
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(4.0);
        ctx.set_global_alpha(0.8);
        ctx.begin_path();
        ctx.arc(finger.x, finger.y, final_size + 20.0, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.stroke();
    }
    ctx.restore();
}

fn draw_difficulty_panel(ctx: &CanvasRenderingContext2d, session: &GameSession) {
    let tier = session.tier();
    ctx.save();
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
    ctx.fill_rect(10.0, 140.0, 300.0, 100.0);

    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    ctx.set_font("16px Arial");
    ctx.fill_text(
        &format!("Level {}: {}", session.level(), tier.name),
        20.0,
        165.0,
    )
    .ok();

    ctx.set_font("12px Arial");
    ctx.fill_text(
        &format!(
            "Fruits: {}/{} | Bombs: {}",
            session.fruit_count(),
            tier.max_fruits,
            session.bomb_count()
        ),
        20.0,
        185.0,
    )
    .ok();
    ctx.fill_text(&format!("Speed: {:.0}%", tier.speed_multiplier * 100.0), 20.0, 200.0)
        .ok();
    ctx.fill_text(
        &format!("Bomb Chance: {:.1}%", tier.bomb_chance * 100.0),
        20.0,
        215.0,
    )
    .ok();

    if session.combo_multiplier() > 1 {
        ctx.set_fill_style_str("#ff4757");
        ctx.set_font("bold 14px Arial");
        ctx.fill_text(&format!("COMBO x{}", session.combo_multiplier()), 180.0, 185.0)
            .ok();
    }
    ctx.restore();
}

fn draw_menu(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.save();
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_text_align("center");
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("64px Arial");
    ctx.fill_text("FRUIT SLASH", width / 2.0, height / 2.0 - 40.0).ok();
    ctx.set_font("20px Arial");
    ctx.set_fill_style_str("#ffd166");
    ctx.fill_text(
        "Wave your hand to slice - press Space or click to start",
        width / 2.0,
        height / 2.0 + 20.0,
    )
    .ok();
    ctx.restore();
}

fn draw_game_over(ctx: &CanvasRenderingContext2d, session: &GameSession, width: f64, height: f64) {
    ctx.save();
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, 0.0, width, height);

    let cx = width / 2.0;
    let cy = height / 2.0;
    ctx.set_text_align("center");
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("72px Arial");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.stroke_text("GAME OVER", cx, cy).ok();
    ctx.fill_text("GAME OVER", cx, cy).ok();

    ctx.set_font("24px Arial");
    ctx.set_fill_style_str("#ffd166");
    ctx.fill_text(&format!("Final score: {}", session.score()), cx, cy + 48.0)
        .ok();
    ctx.set_font("18px Arial");
    ctx.set_fill_style_str("#ffffff");
    let tier = session.tier();
    ctx.fill_text(
        &format!("Reached Level {}: {}", session.level(), tier.name),
        cx,
        cy + 80.0,
    )
    .ok();
    ctx.fill_text("Press Space or click to play again", cx, cy + 116.0)
        .ok();
    ctx.restore();
}
