//! Hit sound and background song. Playback failures (autoplay policy,
//! missing files) are swallowed; the game never depends on audio.

use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

pub const HIT_SRC: &str = "assets/hit.mp3";
pub const SONG_SRC: &str = "assets/molesong.mp3";

thread_local! {
    // Shared rejection handler so each play() does not leak a closure.
    static IGNORE_REJECTION: Closure<dyn FnMut(JsValue)> = Closure::new(|_: JsValue| {});
}

pub struct AudioBank {
    hit: Option<HtmlAudioElement>,
    song: Option<HtmlAudioElement>,
}

impl AudioBank {
    pub fn load() -> Self {
        Self {
            hit: load_clip(HIT_SRC),
            song: load_clip(SONG_SRC),
        }
    }

    pub fn play_hit(&self) {
        if let Some(hit) = &self.hit {
            hit.set_current_time(0.0);
            play(hit);
        }
    }

    pub fn loop_song(&self) {
        if let Some(song) = &self.song {
            song.set_loop(true);
            play(song);
        }
    }

    pub fn stop_song(&self) {
        if let Some(song) = &self.song {
            song.pause().ok();
            song.set_current_time(0.0);
        }
    }
}

fn load_clip(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(clip) => {
            clip.set_preload("auto");
            Some(clip)
        }
        Err(e) => {
            log::warn!("audio {src} unavailable: {e:?}");
            None
        }
    }
}

fn play(clip: &HtmlAudioElement) {
    if let Ok(promise) = clip.play() {
        IGNORE_REJECTION.with(|handler| {
            let _ = promise.catch(handler);
        });
    }
}
