//! Topping session integration tests.
//!
//! Whole games played through `ToppingSession`, checking that scores, racks,
//! the bag and the board follow every rewind, replay and correction.

use turn_history::games::topping::{ToppingConfig, ToppingError, ToppingSession, TriedMove};
use turn_history::games::PlayerId;
use turn_history::HistoryError;

fn two_players() -> ToppingSession {
    let config = ToppingConfig::new().with_players(2).with_seed(42);
    let mut session = ToppingSession::new(config).unwrap();
    session.start().unwrap();
    session
}

fn p(index: u8) -> PlayerId {
    PlayerId::new(index)
}

// =============================================================================
// Turn Flow Tests
// =============================================================================

/// Test that moves score immediately and the top move reaches the board.
#[test]
fn test_play_a_turn() {
    let mut session = two_players();
    session.play_move(p(0), "ZEBU", 30).unwrap();
    session.play_move(p(1), "BUZ", 20).unwrap();

    assert_eq!(
        session.tried_moves(),
        vec![
            TriedMove { player: p(0), word: "ZEBU".to_string(), points: 30 },
            TriedMove { player: p(1), word: "BUZ".to_string(), points: 20 },
        ]
    );

    assert!(session.end_turn("ZEBU").unwrap());
    assert_eq!(session.score(p(0)), Some(30));
    assert_eq!(session.score(p(1)), Some(20));
    assert_eq!(session.words(), vec!["ZEBU".to_string()]);
    assert_eq!(session.bag_len(), 86);
    assert!(session.tried_moves().is_empty());
    assert_eq!(session.history().turn_count(), 2);
}

/// Test the timeout penalty, with and without the elapsed time.
#[test]
fn test_timeout_penalties() {
    let mut session = two_players();
    session.timeout(p(0), 12).unwrap();
    assert_eq!(session.score(p(0)), Some(-60));

    let config = ToppingConfig::new().with_timeout_penalty(10).with_elapsed_penalty();
    let mut session = ToppingSession::new(config).unwrap();
    session.start().unwrap();
    session.timeout(p(0), 12).unwrap();
    assert_eq!(session.score(p(0)), Some(-22));
}

// =============================================================================
// Arbitration Tests
// =============================================================================

/// Test adding then withdrawing a penalty after the moves were played.
#[test]
fn test_penalty_round_trip() {
    let mut session = two_players();
    session.play_move(p(0), "ZEBU", 30).unwrap();
    session.play_move(p(1), "BUZ", 20).unwrap();

    let penalty = session.add_penalty(p(1), 5).unwrap();
    assert_eq!(session.score(p(1)), Some(15));
    assert_eq!(session.score(p(0)), Some(30));
    assert_eq!(session.history().current_turn().position(penalty), Some(1));

    session.remove_penalty(penalty).unwrap();
    assert_eq!(session.score(p(1)), Some(20));
    assert_eq!(session.history().current_turn().len(), 4);
}

/// Test that only penalties can be withdrawn.
#[test]
fn test_remove_non_penalty() {
    let mut session = two_players();
    let played = session.play_move(p(0), "ZEBU", 30).unwrap();

    let err = session.remove_penalty(played).unwrap_err();
    assert!(matches!(
        err,
        ToppingError::History(HistoryError::IneligibleAction { .. })
    ));
    assert_eq!(session.score(p(0)), Some(30));
}

/// Test correcting the points of a move that was already played.
#[test]
fn test_correct_move() {
    let mut session = two_players();
    let played = session.play_move(p(0), "ZEBU", 30).unwrap();
    session.play_move(p(1), "BUZ", 20).unwrap();

    let corrected = session.correct_move(played, "ZEBUS", 32).unwrap();

    assert_ne!(corrected, played);
    assert_eq!(session.score(p(0)), Some(32));
    assert_eq!(session.score(p(1)), Some(20));
    assert_eq!(session.tried_moves()[0].word, "ZEBUS");

    let err = session.correct_move(played, "ZEBU", 30).unwrap_err();
    assert!(matches!(err, ToppingError::History(HistoryError::ActionNotFound(_))));
}

// =============================================================================
// Navigation Tests
// =============================================================================

/// Test that rewinding a turn restores the table and replaying redoes it.
#[test]
fn test_rewind_and_replay() {
    let mut session = two_players();
    let first_rack = session.rack();
    session.play_move(p(0), "ZEBU", 30).unwrap();
    session.end_turn("ZEBU").unwrap();
    let second_rack = session.rack();

    // First stop: the new rack, before any move
    session.prev_turn().unwrap();
    assert_eq!(session.history().current_turn_index(), 1);
    assert_eq!(session.rack(), second_rack);
    assert_eq!(session.score(p(0)), Some(30));

    session.prev_turn().unwrap();
    assert_eq!(session.history().current_turn_index(), 0);
    assert_eq!(session.rack(), first_rack);
    assert_eq!(session.score(p(0)), Some(0));
    assert!(session.words().is_empty());
    assert_eq!(session.bag_len(), 93);

    session.next_turn().unwrap();
    assert_eq!(session.history().current_turn_index(), 1);
    assert_eq!(session.score(p(0)), Some(30));
    assert_eq!(session.words(), vec!["ZEBU".to_string()]);
    assert_eq!(session.rack(), second_rack);

    session.last_turn().unwrap();
    assert!(session.history().is_last_turn());
}

/// Test that first and last turn bracket the whole game.
#[test]
fn test_first_and_last_turn() {
    let mut session = two_players();
    for word in ["ZEBU", "QI", "AXE"] {
        session.play_move(p(1), word, 10).unwrap();
        session.end_turn(word).unwrap();
    }

    session.first_turn().unwrap();
    assert!(session.history().is_first_turn());
    assert_eq!(session.score(p(1)), Some(0));
    assert_eq!(session.bag_len(), 93);

    session.last_turn().unwrap();
    assert_eq!(session.score(p(1)), Some(30));
    assert_eq!(session.words().len(), 3);
    assert_eq!(session.bag_len(), 72);
}

/// Test that a move played while rewound discards the future.
#[test]
fn test_play_while_rewound() {
    let mut session = two_players();
    session.play_move(p(0), "ZEBU", 30).unwrap();
    session.end_turn("ZEBU").unwrap();

    session.prev_turn().unwrap();
    session.prev_turn().unwrap();
    session.play_move(p(1), "AXE", 12).unwrap();

    assert_eq!(session.history().turn_count(), 1);
    assert!(session.history().is_last_turn());
    assert_eq!(session.score(p(0)), Some(0));
    assert_eq!(session.score(p(1)), Some(12));
    assert!(session.words().is_empty());
    assert_eq!(session.bag_len(), 93);
    assert_eq!(session.tried_moves().len(), 1);
}

/// Test that a move lands in the viewed turn even when no one played in it.
#[test]
fn test_play_in_rewound_turn_without_moves() {
    let config = ToppingConfig::new().with_letters("ABCDEFGHIJ").with_rack_size(4);
    let mut session = ToppingSession::new(config).unwrap();
    session.start().unwrap();
    assert!(session.end_turn("ABCD").unwrap());
    assert!(!session.end_turn("EFGH").unwrap());

    session.prev_turn().unwrap();
    session.prev_turn().unwrap();
    assert_eq!(session.history().current_turn_index(), 0);
    assert_eq!(session.bag_len(), 6);

    session.play_move(p(0), "AB", 3).unwrap();

    assert_eq!(session.history().turn_count(), 1);
    assert_eq!(session.bag_len(), 6);
    assert!(session.words().is_empty());
    assert_eq!(session.score(p(0)), Some(3));
    assert!(!session.is_finished());
}

/// Test that a finished game only accepts navigation, until rewound.
#[test]
fn test_game_over_then_rewind() {
    let config = ToppingConfig::new().with_letters("ABCDE").with_rack_size(4);
    let mut session = ToppingSession::new(config).unwrap();
    session.start().unwrap();
    assert!(!session.end_turn("ABCD").unwrap());
    assert!(session.is_finished());

    let err = session.end_turn("XYZ").unwrap_err();
    assert!(matches!(err, ToppingError::GameFinished));
    assert_eq!(session.words(), vec!["ABCD".to_string()]);
    assert_eq!(session.history().turn_count(), 2);

    session.prev_turn().unwrap();
    assert!(!session.is_finished());
    session.timeout(p(0), 0).unwrap();
    assert_eq!(session.score(p(0)), Some(-60));
    assert_eq!(session.history().turn_count(), 1);
}

/// Test that the history dump names the actions of each turn.
#[test]
fn test_history_display() {
    let mut session = two_players();
    session.play_move(p(0), "ZEBU", 30).unwrap();
    session.end_turn("ZEBU").unwrap();

    let dump = session.history().to_string();
    assert!(dump.starts_with("Turn 0:\n"));
    assert!(dump.contains("GameMove ZEBU"));
    assert!(dump.contains("Turn 1 (current):"));
}
