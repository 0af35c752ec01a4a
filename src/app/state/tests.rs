use std::time::Duration;

use clap::Parser;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tokio::sync::mpsc;

use super::{AppMode, AppState};
use crate::{
    app::events::AppEvent, cli::Cli, domain::element::ElementId, storm::tuning::Tuning,
};

fn test_cli() -> Cli {
    Cli::parse_from(["terminal-lightning", "--seed", "7", "--no-color"])
}

fn calm() -> Tuning {
    Tuning {
        strike_interval_min_ms: 3_600_000,
        strike_interval_jitter_ms: 0,
        double_strike_chance: 0.0,
        pointer_strike_chance: 0.0,
        hover_burst_chance: 0.0,
        hover_enter_burst_chance: 0.0,
        burst_strike_toward_chance: 0.0,
        intro_strikes: false,
        ..Tuning::default()
    }
}

fn state(tuning: Tuning) -> AppState {
    AppState::new(&test_cli(), tuning, 80, 24)
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn button_cell(state: &AppState, idx: usize) -> (u16, u16) {
    let area = state.elements.get(ElementId(idx)).expect("button").area;
    (area.x + 1, area.y + 1)
}

#[tokio::test]
async fn quit_keys_send_quit_through_the_event_channel() {
    let cli = test_cli();
    for event in [
        key(KeyCode::Char('q')),
        key(KeyCode::Esc),
        Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    ] {
        let mut app = state(calm());
        let (tx, mut rx) = mpsc::channel(4);
        app.handle_event(AppEvent::Input(event), &tx, &cli)
            .await
            .expect("input");
        assert_eq!(app.mode, AppMode::Running);

        let queued = rx.recv().await.expect("quit event");
        assert!(matches!(queued, AppEvent::Quit));
        app.handle_event(queued, &tx, &cli).await.expect("quit");
        assert_eq!(app.mode, AppMode::Quit);
    }
}

#[test]
fn other_keys_do_not_ask_to_quit() {
    let mut app = state(calm());
    assert!(!app.handle_input(&key(KeyCode::Char('x'))));
    assert!(!app.handle_input(&key(KeyCode::Tab)));
}

#[test]
fn space_calls_down_a_strike() {
    let mut app = state(calm());
    app.handle_input(&key(KeyCode::Char(' ')));
    assert_eq!(app.storm.bolts().len(), 1);
}

#[test]
fn pointer_tracks_mouse_motion_in_surface_units() {
    let mut app = state(calm());
    app.handle_input(&mouse(MouseEventKind::Moved, 10, 3));
    assert_eq!(app.pointer.x, 21.0);
    assert_eq!(app.pointer.y, 14.0);
    assert_eq!(app.mouse_over, None);
}

#[test]
fn moving_onto_a_button_hovers_it_once() {
    let mut app = state(Tuning {
        hover_enter_burst_chance: 1.0,
        ..calm()
    });
    let (col, row) = button_cell(&app, 1);

    app.handle_input(&mouse(MouseEventKind::Moved, col, row));
    assert!(app.storm.is_hovered(ElementId(1)));
    let after_enter = app.storm.total_strikes() + app.storm.pending_strikes() as u64;
    assert!(after_enter >= 8);

    app.handle_input(&mouse(MouseEventKind::Moved, col + 1, row));
    let after_move = app.storm.total_strikes() + app.storm.pending_strikes() as u64;
    assert_eq!(after_move, after_enter);

    app.handle_input(&mouse(MouseEventKind::Moved, 0, 0));
    assert!(!app.storm.is_hovered(ElementId(1)));
}

#[test]
fn focus_counts_as_hover_and_enter_activates() {
    let mut app = state(calm());
    app.handle_input(&key(KeyCode::Tab));
    assert_eq!(app.focus, Some(ElementId(0)));
    assert!(app.storm.is_hovered(ElementId(0)));

    app.handle_input(&key(KeyCode::BackTab));
    let last = ElementId(app.elements.len() - 1);
    assert_eq!(app.focus, Some(last));
    assert!(!app.storm.is_hovered(ElementId(0)));
    assert!(app.storm.is_hovered(last));

    app.handle_input(&key(KeyCode::Enter));
    assert!(!app.storm.bolts().is_empty());
    assert!(app.storm.pending_strikes() > 0);
}

#[test]
fn clicking_a_button_activates_it() {
    let mut app = state(calm());
    let (col, row) = button_cell(&app, 2);
    app.handle_input(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
    assert!(!app.storm.bolts().is_empty());

    let mut idle = state(calm());
    idle.handle_input(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
    assert!(idle.storm.bolts().is_empty());
}

#[test]
fn resize_clears_the_storm_and_relays_out() {
    let mut app = state(calm());
    app.handle_input(&key(KeyCode::Char(' ')));
    app.handle_input(&Event::Resize(40, 12));

    assert!(app.storm.bolts().is_empty());
    assert_eq!(app.storm.size(), (80.0, 48.0));
    assert_eq!(app.surface.cols(), 40);
}

#[test]
fn frames_advance_and_paint() {
    let mut app = state(calm());
    app.handle_input(&key(KeyCode::Char(' ')));
    app.advance(Duration::from_millis(16));
    assert_eq!(app.frame_tick, 1);
    assert!(app.surface.lit_cells() > 0);
}
