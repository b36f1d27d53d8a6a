//! Whack-a-mole core crate.
//!
//! The mole scheduler (`game`) is plain Rust driven by a millisecond clock the
//! caller supplies, so it runs and is tested on the host. The `web` module binds
//! it to a page through wasm-bindgen; the exports below are what the page calls.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod rng;
mod web;

pub use config::{Difficulty, GameConfig};
pub use error::GameError;
pub use game::{Round, Signal, Slot};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Page entrypoints
// -----------------------------------------------------------------------------

/// Wire the start / play-again / mute buttons and the holes. Call once on load.
#[wasm_bindgen]
pub fn bind_page() -> Result<(), JsValue> {
    web::bind_page()
}

/// Start a default round (difficulty from `set_difficulty`, if called).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_game(web::default_config())
}

/// Start with a JSON config, e.g. `{"duration_secs": 60, "max_active": 2}`.
/// "Play again" reuses it.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start_game(config)
}

#[wasm_bindgen]
pub fn stop_game() {
    web::stop_game()
}

#[wasm_bindgen]
pub fn set_difficulty(name: &str) {
    web::set_difficulty(Difficulty::from(name))
}

#[wasm_bindgen]
pub fn toggle_mute() -> bool {
    web::toggle_mute()
}

// -----------------------------------------------------------------------------
// Inspection helpers (exported for page-level checks)
// -----------------------------------------------------------------------------

/// Display duration in ms a freshly spawned mole would get at `difficulty`.
#[wasm_bindgen]
pub fn set_delay(difficulty: &str) -> u32 {
    game::delay::delay_ms(Difficulty::from(difficulty), &mut rng::entropy_rng())
}

/// Uniform integer in `[min, max]`.
#[wasm_bindgen]
pub fn random_integer(min: u32, max: u32) -> u32 {
    rng::random_integer(min, max, &mut rng::entropy_rng())
}
