// Integration tests (native) for the `word-bird` crate.
// These avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use word_bird::game::config::{Difficulty, GameConfig};
use word_bird::game::state::GameStateMachine;
use word_bird::game::words::{GameError, WordBank};

#[test]
fn builtin_bank_is_playable_out_of_the_box() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut machine =
        GameStateMachine::new(GameConfig::default(), WordBank::builtin(), &mut rng);
    assert!(machine.start(Difficulty::Medium, 0.0, &mut rng).is_ok());
    assert!(machine.playing());
    assert!(machine.display_word().is_some());
    assert!(!machine.option_pool().is_empty());
}

#[test]
fn empty_bank_refuses_to_start() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut machine =
        GameStateMachine::new(GameConfig::default(), WordBank::default(), &mut rng);
    assert_eq!(
        machine.start(Difficulty::Low, 0.0, &mut rng),
        Err(GameError::EmptyWordBank)
    );
    assert!(!machine.playing());
}

#[test]
fn csv_import_end_to_end() {
    let csv = "word,meaning,incomplete\n\
               kite,风筝,k_te\n\
               not-enough-columns\n\
               river,河流,r_ver\n\
               mismatch,不匹配,mis_atchx\n";
    let (bank, summary) = WordBank::from_csv(csv);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(bank.len(), 2);

    let mut rng = SmallRng::seed_from_u64(3);
    let mut machine = GameStateMachine::new(GameConfig::default(), bank, &mut rng);
    machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
    assert_eq!(machine.display_word().as_deref(), Some("k_te"));
    assert_eq!(
        machine.current_word().map(|w| w.meaning.as_str()),
        Some("风筝")
    );
}

#[test]
fn imported_bank_replaces_the_builtin_one() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut machine =
        GameStateMachine::new(GameConfig::default(), WordBank::builtin(), &mut rng);
    let (bank, _) = WordBank::from_csv("sunny,晴朗的,s_nny\n");
    machine.set_bank(bank);
    machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
    assert_eq!(machine.display_word().as_deref(), Some("s_nny"));
}

#[test]
fn difficulty_button_cycle_matches_the_policy() {
    // The UI cycles the same enum the machine consumes.
    let mut level = Difficulty::default();
    assert_eq!(level, Difficulty::Medium);
    level = level.next();
    assert_eq!(level, Difficulty::High);
    assert!(level.settings().wrong_answer_falls);
    level = level.next();
    assert_eq!(level, Difficulty::Low);
    assert_eq!(level.settings().fall_interval_ms, 8_000);
    assert_eq!(level.next(), Difficulty::Medium);
}
