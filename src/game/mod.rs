//! Browser shell for the game.
//!
//! Everything that touches the DOM lives here: the full-viewport canvas, the
//! score/lives/level overlays, input listeners, the cancellable
//! `requestAnimationFrame` loop, and the wasm API the embedding page calls to
//! push hand-landmark frames. Gameplay itself is in the pure submodules and
//! never sees a browser type.
//!
//! The page is expected to run the hand-landmark model (camera + MediaPipe)
//! and call [`apply_hand_frame`] once per camera frame, plus
//! [`tracker_ready`]/[`tracker_failed`] once when the model comes up or dies.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

pub mod collision;
pub mod combo;
pub mod config;
pub mod difficulty;
pub mod gesture;
pub mod hand;
pub mod motion;
pub mod object;
mod render;
pub mod session;
pub mod spawn;

use config::Tuning;
use gesture::{SliceDetector, SliceInputs, classify_gesture};
use motion::MotionEstimator;
use session::{GameSession, Phase, SessionEvent};

const BEST_SCORE_KEY: &str = "fruitSlashBestScore";

// --- App state ----------------------------------------------------------------

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: GameSession,
    estimator: MotionEstimator,
    slicer: SliceDetector,
    best_score: i64,
    tracker_ready: bool,
    tracker_error: Option<String>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = RefCell::new(None);
}

// --- Frame loop ---------------------------------------------------------------

/// Cancellable `requestAnimationFrame` scheduler. The pending callback id is
/// tracked so `stop()` actually cancels it; nothing keeps firing after
/// teardown.
struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    stopped: Rc<Cell<bool>>,
    closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    fn start<F: FnMut(f64) + 'static>(mut tick: F) -> Result<Self, JsValue> {
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let stopped = Rc::new(Cell::new(false));
        let closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let raf_for_cb = raf_id.clone();
        let stopped_for_cb = stopped.clone();
        let closure_for_cb = closure.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            if stopped_for_cb.get() {
                return;
            }
            tick(ts);
            if stopped_for_cb.get() {
                return;
            }
            if let Some(w) = window() {
                let borrowed = closure_for_cb.borrow();
                if let Some(cb) = borrowed.as_ref() {
                    if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        raf_for_cb.set(Some(id));
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let id = {
            let borrowed = closure.borrow();
            let cb = borrowed.as_ref().expect("closure just installed");
            win.request_animation_frame(cb.as_ref().unchecked_ref())?
        };
        raf_id.set(Some(id));

        Ok(Self { raf_id, stopped, closure })
    }

    fn stop(&self) {
        self.stopped.set(true);
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        self.closure.borrow_mut().take();
    }
}

// --- Boot / teardown ----------------------------------------------------------

pub(crate) fn boot() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (width, height) = viewport_size();

    // Create / reuse the game canvas above the camera layer.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("fs-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("fs-canvas");
        c.set_attribute(
            "style",
            "position:fixed; inset:0; width:100vw; height:100vh; cursor:none; touch-action:none; z-index:2;",
        )
        .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ensure_overlays(&doc)?;

    let tuning = Tuning::default();
    let app = App {
        canvas: canvas.clone(),
        ctx,
        estimator: MotionEstimator::new(tuning.motion.clone()),
        slicer: SliceDetector::new(),
        session: GameSession::new(width, height, tuning),
        best_score: load_best_score(),
        tracker_ready: false,
        tracker_error: None,
    };
    APP.with(|cell| cell.replace(Some(app)));

    install_listeners(&doc, &canvas)?;

    let frame_loop = FrameLoop::start(|ts| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                frame_tick(app, ts);
            }
        });
    })?;
    FRAME_LOOP.with(|cell| cell.replace(Some(frame_loop)));
    Ok(())
}

/// Stop the frame loop and drop all game state. Safe to call twice.
#[wasm_bindgen]
pub fn stop_game() {
    FRAME_LOOP.with(|cell| {
        if let Some(frame_loop) = cell.borrow_mut().take() {
            frame_loop.stop();
        }
    });
    APP.with(|cell| {
        cell.borrow_mut().take();
    });
}

// --- Wasm API: hand tracking --------------------------------------------------

/// Push one camera frame of hand landmarks: `landmarks` and `world_landmarks`
/// are flat `[x, y, z] x 21` per hand. An empty / short frame counts as "no
/// hand detected" and resets motion tracking at once.
#[wasm_bindgen]
pub fn apply_hand_frame(landmarks: &[f32], world_landmarks: &[f32], num_hands: usize) {
    let now = performance_now();
    APP.with(|cell| {
        let mut borrowed = cell.borrow_mut();
        let Some(app) = borrowed.as_mut() else {
            return;
        };
        match hand::best_hand(landmarks, world_landmarks, num_hands) {
            None => {
                app.estimator.update(None, now);
            }
            Some(observation) => {
                let confidence = observation.confidence();
                let width = app.canvas.width() as f64;
                let height = app.canvas.height() as f64;
                let points = observation.screen_points(width, height);
                app.estimator.update(Some(points), now);

                let slice_tuning = app.session.tuning().slice.clone();
                let gesture =
                    classify_gesture(&observation.landmarks, slice_tuning.finger_extension_margin);
                let state = app.estimator.state();
                let finger_spread = match (state.index_finger, state.thumb) {
                    (Some(i), Some(t)) => i.distance(t),
                    _ => 0.0,
                };
                let inputs = SliceInputs {
                    raw_velocity: state.raw_velocity,
                    smoothed_velocity: state.smoothed_velocity,
                    acceleration: state.acceleration,
                    gesture,
                    finger_spread,
                };
                let decision = app.slicer.decide(&inputs, confidence, now, &slice_tuning);
                app.estimator.set_classification(gesture, decision, confidence);
            }
        }
    });
}

/// The page's tracker finished loading; the menu may start a session now.
#[wasm_bindgen]
pub fn tracker_ready() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            app.tracker_ready = true;
            app.tracker_error = None;
        }
    });
}

/// The page's tracker failed to initialize (camera denied, model load
/// failure). Reported once; the session never starts.
#[wasm_bindgen]
pub fn tracker_failed(message: &str) {
    web_sys::console::error_1(&format!("hand tracker failed: {message}").into());
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            app.tracker_ready = false;
            app.tracker_error = Some(message.to_string());
        }
    });
}

// --- Per-frame work -----------------------------------------------------------

fn frame_tick(app: &mut App, now: f64) {
    let motion = app.estimator.state().clone();
    let events = app
        .session
        .tick(&motion, now, &mut rand::thread_rng());
    for event in events {
        handle_event(app, event);
    }

    let width = app.canvas.width() as f64;
    let height = app.canvas.height() as f64;
    render::draw_frame(&app.ctx, &app.session, &motion, now, width, height);
    update_overlays(app);
}

fn handle_event(app: &mut App, event: SessionEvent) {
    match event {
        SessionEvent::FruitSliced { points } => {
            web_sys::console::log_1(&format!("fruit sliced: +{points}").into());
        }
        SessionEvent::BombSliced => {
            web_sys::console::log_1(&"bomb sliced, life lost".into());
        }
        SessionEvent::FruitMissed => {
            web_sys::console::log_1(&"fruit missed".into());
        }
        SessionEvent::GameOver { score } => {
            web_sys::console::log_1(&format!("game over, final score {score}").into());
            if score > app.best_score {
                app.best_score = score;
                store_best_score(score);
            }
        }
    }
}

fn try_start() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            if app.session.phase() == Phase::Playing {
                return;
            }
            if let Some(err) = &app.tracker_error {
                web_sys::console::warn_1(&format!("cannot start: {err}").into());
                return;
            }
            if !app.tracker_ready {
                web_sys::console::warn_1(&"cannot start: hand tracker not ready".into());
                return;
            }
            app.session.start();
        }
    });
}

// --- DOM plumbing -------------------------------------------------------------

fn viewport_size() -> (f64, f64) {
    let win = match window() {
        Some(w) => w,
        None => return (1200.0, 800.0),
    };
    let width = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (width, height)
}

fn ensure_overlays(doc: &web_sys::Document) -> Result<(), JsValue> {
    let overlays: [(&str, &str, &str); 5] = [
        (
            "fs-score",
            "Score: 0",
            "position:fixed; top:10px; left:12px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;",
        ),
        (
            "fs-lives",
            "",
            "position:fixed; top:10px; left:140px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; z-index:44; letter-spacing:0.5px;",
        ),
        (
            "fs-level",
            "Level 1",
            "position:fixed; top:10px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:15px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffb86b; z-index:45; letter-spacing:0.5px;",
        ),
        (
            "fs-best",
            "Best: 0",
            "position:fixed; top:10px; right:12px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#9be29b; z-index:45; letter-spacing:0.5px;",
        ),
        (
            "fs-status",
            "Loading hand tracker...",
            "position:fixed; bottom:10px; left:12px; font-family:'Fira Code', monospace; font-size:13px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#9bd0e2; z-index:45;",
        ),
    ];
    for (id, text, style) in overlays {
        if doc.get_element_by_id(id).is_none() {
            if let Some(body) = doc.body() {
                let div = doc.create_element("div")?;
                div.set_id(id);
                div.set_text_content(Some(text));
                div.set_attribute("style", style).ok();
                body.append_child(&div)?;
            }
        }
    }
    Ok(())
}

fn install_listeners(doc: &web_sys::Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    // Space / Enter starts or restarts a session.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            if key == " " || key == "Enter" {
                try_start();
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // So does clicking the canvas.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            try_start();
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Keep the canvas and play area matched to the viewport.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let (width, height) = viewport_size();
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.canvas.set_width(width as u32);
                    app.canvas.set_height(height as u32);
                    app.session.resize(width, height);
                }
            });
        }) as Box<dyn FnMut(_)>);
        if let Some(win) = window() {
            win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        }
        closure.forget();
    }
    Ok(())
}

fn update_overlays(app: &App) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(el) = doc.get_element_by_id("fs-score") {
        el.set_text_content(Some(&format!("Score: {}", app.session.score())));
    }
    if let Some(el) = doc.get_element_by_id("fs-level") {
        el.set_text_content(Some(&format!(
            "Level {}: {}",
            app.session.level(),
            app.session.tier().name
        )));
    }
    if let Some(el) = doc.get_element_by_id("fs-best") {
        el.set_text_content(Some(&format!("Best: {}", app.best_score)));
    }
    if let Some(el) = doc.get_element_by_id("fs-lives") {
        let max_hearts = app.session.tuning().max_lives.max(0);
        let filled = app.session.lives().clamp(0, max_hearts) as usize;
        let mut html = String::new();
        for _ in 0..filled {
            html.push_str("<span style='color:#ff4d4d;font-size:16px;margin-right:6px;'>\u{2665}</span>");
        }
        for _ in filled..(max_hearts as usize) {
            html.push_str("<span style='color:#6b6b6b;font-size:16px;margin-right:6px;'>\u{2661}</span>");
        }
        el.set_inner_html(&html);
    }
    if let Some(el) = doc.get_element_by_id("fs-status") {
        let status = if let Some(err) = &app.tracker_error {
            format!("Hand tracking failed: {err}")
        } else if !app.tracker_ready {
            "Loading hand tracker...".to_string()
        } else {
            "Hand tracking active".to_string()
        };
        el.set_text_content(Some(&status));
    }
}

// --- Storage & time -----------------------------------------------------------

fn load_best_score() -> i64 {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(BEST_SCORE_KEY).ok().flatten())
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

fn store_best_score(score: i64) {
    if let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(BEST_SCORE_KEY, &score.to_string());
    }
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
