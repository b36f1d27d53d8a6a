// Integration tests (native) for the `whack-a-mole` crate.
// These tests avoid wasm-specific functionality and exercise the exported
// helpers and public config API so they can run under `cargo test` on the host.

use whack_a_mole::{Difficulty, GameConfig, GameError};

#[test]
fn set_delay_matches_difficulty_presets() {
    assert_eq!(whack_a_mole::set_delay("easy"), 1500);
    assert_eq!(whack_a_mole::set_delay("normal"), 1000);
    assert_eq!(whack_a_mole::set_delay("bogus"), 1000);
    for _ in 0..1000 {
        let d = whack_a_mole::set_delay("hard");
        assert!((600..=1200).contains(&d), "hard delay {} out of range", d);
    }
}

#[test]
fn random_integer_is_inclusive() {
    for _ in 0..500 {
        let v = whack_a_mole::random_integer(0, 8);
        assert!(v <= 8);
    }
    assert_eq!(whack_a_mole::random_integer(3, 3), 3);
}

#[test]
fn random_integer_covers_the_whole_u32_range() {
    for _ in 0..100 {
        whack_a_mole::random_integer(0, u32::MAX);
        whack_a_mole::random_integer(u32::MAX, 0);
    }
    assert_eq!(whack_a_mole::random_integer(u32::MAX, u32::MAX), u32::MAX);
}

#[test]
fn difficulty_round_trips_through_display() {
    for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
        assert_eq!(Difficulty::from(d.to_string().as_str()), d);
    }
    assert_eq!(Difficulty::Other.to_string(), "other");
}

#[test]
fn invalid_configs_report_invalid_configuration() {
    for cfg in [
        GameConfig::default().with_slots(0),
        GameConfig::default().with_duration(0),
        GameConfig::default().with_slots(2).with_max_active(3),
        GameConfig::default().with_tick(0),
    ] {
        match cfg.validate() {
            Err(GameError::InvalidConfiguration(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }
}
