//! Browser front-end. Binds the round controller to a page with `.hole`
//! elements (each holding a `.mole`), `#start`, `#score`, `#timer`,
//! `#gameOverModal` / `#finalScore` / `#playAgain`, and `#mute`.
//!
//! One controller lives in a thread-local cell. A `requestAnimationFrame` loop
//! advances it to `performance.now()` every frame and applies the resulting
//! signals to the DOM; input handlers do the same right after a hit.
use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, window};

use crate::config::{Difficulty, GameConfig};
use crate::error::GameError;
use crate::game::{EndReason, Round, Signal, Slot};

mod audio;
mod dom;

use audio::AudioBank;

const BLUR_STYLE_ID: &str = "wam-blur-style";
const BLUR_CSS: &str = ".blurred { filter: blur(5px); transition: filter 0.3s ease-in-out; }";

/// Settings that outlive a single round and exist before the first one.
/// `difficulty` is only set once the page calls `set_difficulty`.
#[derive(Clone, Copy, Debug)]
struct Prefs {
    difficulty: Option<Difficulty>,
    muted: bool,
}

struct WebGame {
    round: Round,
    holes: Vec<HtmlElement>,
    score_el: Option<Element>,
    timer_el: Option<Element>,
    audio: AudioBank,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
    static PREFS: Cell<Prefs> = const {
        Cell::new(Prefs { difficulty: None, muted: false })
    };
    // Config of the most recent start; "Play again" replays it.
    static LAST_CONFIG: RefCell<Option<GameConfig>> = const { RefCell::new(None) };
    static LOOP_STARTED: Cell<bool> = const { Cell::new(false) };
}

fn js_err(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn muted() -> bool {
    PREFS.with(|p| p.get().muted)
}

impl WebGame {
    fn apply_signals(&mut self) {
        for signal in self.round.drain_signals() {
            match signal {
                Signal::SlotShown(slot) => self.set_hole(slot, "show", true),
                Signal::SlotHidden(slot) => self.set_hole(slot, "show", false),
                Signal::HitCue { slot, active } => {
                    if let Some(mole) = self
                        .holes
                        .get(slot)
                        .and_then(|h| h.query_selector(".mole").ok().flatten())
                    {
                        dom::set_class(&mole, "hit", active);
                    }
                }
                Signal::ScoreChanged(points) => {
                    dom::set_text(self.score_el.as_ref(), &points.to_string())
                }
                Signal::TimeChanged(secs) => {
                    dom::set_text(self.timer_el.as_ref(), &secs.to_string())
                }
                Signal::RoundEnded { score, reason } => {
                    self.audio.stop_song();
                    if reason == EndReason::TimeUp {
                        show_game_over(score);
                    }
                }
            }
        }
    }

    fn set_hole(&self, slot: Slot, class: &str, on: bool) {
        if let Some(hole) = self.holes.get(slot) {
            dom::set_class(hole, class, on);
        }
    }

    fn whack(&mut self, slot: Slot) {
        if self.round.register_hit_at(slot, dom::now_ms()) > 0 && !muted() {
            self.audio.play_hit();
        }
        self.apply_signals();
    }
}

/// Default config, with the page's difficulty choice if it made one.
pub fn default_config() -> GameConfig {
    let config = GameConfig::default();
    match PREFS.with(|p| p.get().difficulty) {
        Some(difficulty) => config.with_difficulty(difficulty),
        None => config,
    }
}

/// Start again with the config of the previous start.
pub fn replay() -> Result<(), JsValue> {
    let config = LAST_CONFIG
        .with(|c| c.borrow().clone())
        .unwrap_or_else(default_config);
    start_game(config)
}

/// Start (or restart) a round on the current page. The slot count always
/// comes from the `.hole` elements found.
pub fn start_game(mut config: GameConfig) -> Result<(), JsValue> {
    let doc = dom::document()?;
    bind_page()?;

    let holes = dom::html_all(&doc, ".hole")?;
    let prefs = PREFS.with(|p| p.get());
    config.slot_count = holes.len();
    LAST_CONFIG.with(|c| *c.borrow_mut() = Some(config.clone()));
    close_modal();

    GAME.with(|cell| -> Result<(), JsValue> {
        let mut current = cell.borrow_mut();
        if let Some(game) = current.as_mut() {
            // Replay keeps the RNG and the round generation counter.
            game.round.stop();
            game.apply_signals();
            game.round.reconfigure(config);
            game.holes = holes;
            game.score_el = doc.get_element_by_id("score");
            game.timer_el = doc.get_element_by_id("timer");
        } else {
            *current = Some(WebGame {
                round: Round::with_entropy(config),
                holes,
                score_el: doc.get_element_by_id("score"),
                timer_el: doc.get_element_by_id("timer"),
                audio: AudioBank::load(),
            });
        }
        let Some(game) = current.as_mut() else {
            return Ok(());
        };
        game.round.start(dom::now_ms()).map_err(js_err)?;
        game.apply_signals();
        if !prefs.muted {
            game.audio.loop_song();
        }
        Ok(())
    })?;

    start_frame_loop();
    Ok(())
}

pub fn stop_game() {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.round.stop();
            game.apply_signals();
        }
    });
}

pub fn set_difficulty(difficulty: Difficulty) {
    PREFS.with(|p| {
        let mut prefs = p.get();
        prefs.difficulty = Some(difficulty);
        p.set(prefs);
    });
    LAST_CONFIG.with(|c| {
        if let Some(config) = c.borrow_mut().as_mut() {
            config.difficulty = difficulty;
        }
    });
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.round.set_difficulty(difficulty);
        }
    });
}

/// Flip mute; returns the new state.
pub fn toggle_mute() -> bool {
    let now_muted = PREFS.with(|p| {
        let mut prefs = p.get();
        prefs.muted = !prefs.muted;
        p.set(prefs);
        prefs.muted
    });

    if let Some(btn) = dom::document()
        .ok()
        .and_then(|doc| doc.get_element_by_id("mute"))
    {
        dom::set_class(&btn, "muted", now_muted);
        btn.set_attribute("aria-pressed", if now_muted { "true" } else { "false" })
            .ok();
        if let Ok(btn) = btn.dyn_into::<HtmlElement>() {
            btn.set_inner_text(if now_muted { "Unmute" } else { "Mute" });
        }
    }

    GAME.with(|cell| {
        if let Some(game) = cell.borrow().as_ref() {
            if now_muted {
                game.audio.stop_song();
            } else if game.round.is_running() {
                game.audio.loop_song();
            }
        }
    });
    now_muted
}

fn show_game_over(score: u32) {
    let Ok(doc) = dom::document() else {
        return;
    };
    dom::set_text(doc.get_element_by_id("finalScore").as_ref(), &score.to_string());
    if let Some(modal) = dom::html_by_id(&doc, "gameOverModal") {
        modal.style().set_property("display", "flex").ok();
    }
    if let Some(body) = doc.body() {
        dom::set_class(&body, "blurred", true);
    }
}

fn close_modal() {
    let Ok(doc) = dom::document() else {
        return;
    };
    if let Some(modal) = dom::html_by_id(&doc, "gameOverModal") {
        modal.style().set_property("display", "none").ok();
    }
    if let Some(body) = doc.body() {
        dom::set_class(&body, "blurred", false);
    }
}

fn whack_hole(slot: Slot) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.whack(slot);
        }
    });
}

/// Wire buttons, holes and the blur style. Elements already wired are
/// skipped, so this runs on every start to pick up replaced markup.
pub fn bind_page() -> Result<(), JsValue> {
    let doc = dom::document()?;

    if doc.get_element_by_id(BLUR_STYLE_ID).is_none() {
        if let Some(head) = doc.head() {
            let style = doc.create_element("style")?;
            style.set_id(BLUR_STYLE_ID);
            style.set_text_content(Some(BLUR_CSS));
            head.append_child(&style)?;
        }
    }

    // Clicks and key presses on a mole bubble up to its hole.
    for (slot, hole) in dom::html_all(&doc, ".hole")?.into_iter().enumerate() {
        if !dom::claim(&hole) {
            continue;
        }
        dom::make_button(&hole, "Hole - whack the mole if visible");
        if let Ok(Some(mole)) = hole.query_selector(".mole") {
            dom::make_button(&mole, "Whack the mole");
        }
        {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                whack_hole(slot);
            }) as Box<dyn FnMut(_)>);
            hole.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
                let key = evt.key();
                if key == "Enter" || key == " " {
                    evt.prevent_default();
                    whack_hole(slot);
                }
            }) as Box<dyn FnMut(_)>);
            hole.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    for id in ["start", "playAgain"] {
        if let Some(btn) = doc.get_element_by_id(id).filter(dom::claim) {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                if let Err(e) = replay() {
                    log::warn!("start failed: {e:?}");
                }
            }) as Box<dyn FnMut(_)>);
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    if let Some(btn) = doc.get_element_by_id("mute").filter(dom::claim) {
        let now_muted = muted();
        dom::set_class(&btn, "muted", now_muted);
        btn.set_attribute("aria-pressed", if now_muted { "true" } else { "false" })?;
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            toggle_mute();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

type FrameCallback = std::rc::Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    if LOOP_STARTED.with(|s| s.replace(true)) {
        return;
    }
    let f: FrameCallback = std::rc::Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME.with(|cell| {
            if let Some(game) = cell.borrow_mut().as_mut() {
                game.round.advance_to(ts.max(0.0) as u64);
                game.apply_signals();
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
