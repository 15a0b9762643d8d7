//! Integration tests for the game engine through its public API

use blockfall::core::{GameState, Piece};
use blockfall::types::{GameAction, PieceKind, RunState};

/// A running game whose active piece is a freshly spawned `kind`.
fn game_with_first(kind: PieceKind) -> GameState {
    let mut game = GameState::new(1);
    assert!(game.start());
    assert!(game.spawn(kind));
    game
}

fn lowest_filled_row(piece: &Piece) -> i8 {
    piece.shape.minos().iter().map(|&(_, y)| y).max().unwrap_or(0)
}

#[test]
fn test_game_lifecycle() {
    let mut game = GameState::new(12345);
    assert_eq!(game.run_state(), RunState::Idle);

    assert!(game.apply_action(GameAction::Start));
    assert_eq!(game.run_state(), RunState::Running);
    assert!(game.active().is_some());
    assert!(game.next_piece().is_some());

    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.run_state(), RunState::Paused);
    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.run_state(), RunState::Running);
}

#[test]
fn test_hard_drop_o_lands_on_floor() {
    let mut game = game_with_first(PieceKind::O);
    let height = game.board().height() as u32;

    assert!(game.apply_action(GameAction::HardDrop));
    assert_eq!(game.score(), height - 2);
    assert_eq!(game.board().filled_count(), 4);
    let row = (height - 1) as i8;
    assert!(game.board().is_occupied(5, row));
    assert!(game.board().is_occupied(6, row - 1));
    assert_eq!(game.stats().lifetime().total_pieces, 1);
}

#[test]
fn test_hard_drop_distance_matches_shape() {
    let mut game = GameState::new(77);
    game.start();
    let piece = game.active().unwrap();
    let expected = game.board().height() as i8 - 1 - lowest_filled_row(&piece);

    assert_eq!(game.hard_drop(), expected as u32);
    assert_eq!(game.score(), expected as u32);
}

#[test]
fn test_next_piece_becomes_active_after_lock() {
    let mut game = GameState::new(3);
    game.start();
    let next = game.next_piece().unwrap();
    game.hard_drop();
    assert_eq!(game.active(), Some(next));
}

#[test]
fn test_rotation_kicks_off_left_wall() {
    let mut game = game_with_first(PieceKind::I);
    // Stand the I up, then push it against the left wall.
    assert!(game.rotate());
    while game.move_horizontal(-1) {}
    let before = game.active().unwrap();
    assert!(!game.board().is_valid_move(&before.rotated_cw(), 0, 0));

    assert!(game.rotate());
    let after = game.active().unwrap();
    assert_eq!(after.shape, before.shape.rotate_cw());
    assert_eq!(after.x, before.x + 2);
    assert!(game.board().is_valid_move(&after, 0, 0));
}

#[test]
fn test_gravity_follows_elapsed_time() {
    let mut game = GameState::new(1);
    game.start();
    let y0 = game.active().unwrap().y;
    for _ in 0..62 {
        game.tick(16);
    }
    assert_eq!(game.active().unwrap().y, y0);
    game.tick(16);
    assert_eq!(game.active().unwrap().y, y0 + 1);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_pause_discards_wall_clock_time() {
    let mut game = GameState::new(1);
    game.start();
    game.frame(1_000);
    game.apply_action(GameAction::Pause);
    game.frame(50_000);
    game.apply_action(GameAction::Pause);
    game.frame(100_000);
    game.frame(100_500);
    assert_eq!(game.active().unwrap().y, 0);
}

#[test]
fn test_game_over_freezes_board() {
    let mut game = GameState::new(99);
    game.start();
    for _ in 0..1000 {
        if game.run_state() == RunState::GameOver {
            break;
        }
        game.apply_action(GameAction::HardDrop);
    }
    assert_eq!(game.run_state(), RunState::GameOver);
    assert!(game.active().is_none());
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.history().entries()[0].score, game.score());

    let board = game.board().clone();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::Rotate,
        GameAction::Pause,
    ] {
        assert!(!game.apply_action(action), "{:?}", action);
    }
    game.tick(60_000);
    assert_eq!(game.board(), &board);

    assert!(game.apply_action(GameAction::Restart));
    assert_eq!(game.run_state(), RunState::Running);
    assert_eq!(game.board().filled_count(), 0);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_snapshot_ghost_sits_on_floor() {
    let mut game = game_with_first(PieceKind::O);
    let snap = game.snapshot();
    let ghost = snap.ghost.unwrap();
    assert_eq!(ghost.y, snap.board.height() as i8 - 2);
    assert_eq!(ghost.x, snap.active.unwrap().x);

    game.apply_action(GameAction::Pause);
    assert!(!game.snapshot().playable());
}
