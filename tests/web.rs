// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn build_board(holes: usize) {
    let doc = document();
    let body = doc.body().unwrap();
    let mut html = String::from("<span id='score'></span><span id='timer'></span><button id='mute'>Mute</button>");
    for _ in 0..holes {
        html.push_str("<div class='hole'><div class='mole'></div></div>");
    }
    html.push_str(
        "<div id='gameOverModal' style='display:none'><span id='finalScore'></span>\
         <button id='playAgain'>Play again</button></div>",
    );
    body.set_inner_html(&html);
}

fn shown_holes() -> Vec<HtmlElement> {
    let list = document().query_selector_all(".hole.show").unwrap();
    (0..list.length())
        .filter_map(|i| list.item(i)?.dyn_into::<HtmlElement>().ok())
        .collect()
}

#[wasm_bindgen_test]
fn start_shows_one_mole_and_resets_displays() {
    build_board(9);
    whack_a_mole::start_game().unwrap();
    assert_eq!(shown_holes().len(), 1);
    let doc = document();
    assert_eq!(doc.get_element_by_id("score").unwrap().text_content().unwrap(), "0");
    assert_eq!(doc.get_element_by_id("timer").unwrap().text_content().unwrap(), "30");
    whack_a_mole::stop_game();
    assert!(shown_holes().is_empty());
}

#[wasm_bindgen_test]
fn clicking_the_visible_hole_scores_once() {
    build_board(4);
    whack_a_mole::start_game().unwrap();
    let hole = shown_holes().remove(0);
    hole.click();
    hole.click();
    let score = document().get_element_by_id("score").unwrap().text_content().unwrap();
    assert_eq!(score, "1");
    let mole = hole.query_selector(".mole").unwrap().unwrap();
    assert!(mole.class_list().contains("hit"));
    whack_a_mole::stop_game();
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen_test]
fn play_again_keeps_the_json_config() {
    build_board(6);
    whack_a_mole::start_game_with_config(r#"{"max_active": 2, "duration_secs": 12}"#).unwrap();
    assert_eq!(shown_holes().len(), 2);

    let play_again: HtmlElement = document()
        .get_element_by_id("playAgain")
        .unwrap()
        .dyn_into()
        .unwrap();
    play_again.click();
    assert_eq!(shown_holes().len(), 2);
    let timer = document().get_element_by_id("timer").unwrap().text_content().unwrap();
    assert_eq!(timer, "12");

    // A plain start goes back to the defaults.
    whack_a_mole::start_game().unwrap();
    assert_eq!(shown_holes().len(), 1);
    whack_a_mole::stop_game();
}

#[wasm_bindgen_test]
fn mute_toggle_updates_button() {
    build_board(2);
    whack_a_mole::bind_page().unwrap();
    let now_muted = whack_a_mole::toggle_mute();
    let btn = document().get_element_by_id("mute").unwrap();
    assert_eq!(btn.class_list().contains("muted"), now_muted);
    assert_eq!(whack_a_mole::toggle_mute(), !now_muted);
}

#[wasm_bindgen_test]
fn delay_export_matches_presets() {
    assert_eq!(whack_a_mole::set_delay("easy"), 1500);
    assert_eq!(whack_a_mole::set_delay("normal"), 1000);
}
