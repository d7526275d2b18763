//! Fruit Slash core crate.
//!
//! A motion-controlled arcade game: the embedding page feeds camera-derived
//! hand landmarks into the crate, and a swipe of the hand slices the fruit
//! arcing across the canvas. Gameplay logic (motion estimation, gesture
//! classification, spawning, collision, scoring) lives in pure submodules
//! under [`game`] and runs under plain `cargo test`; only the thin shell in
//! `game::mod` touches the browser.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Set up the canvas, overlays and frame loop, starting in the menu. The page
/// should follow up with `tracker_ready()` (or `tracker_failed(...)`) and then
/// stream frames through `apply_hand_frame(...)`.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::boot()
}
