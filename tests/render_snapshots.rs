mod common;

use common::{ready_state, render_state_to_string};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use terminal_lightning::domain::{bolt::StrikeOptions, geometry::Point};

fn is_braille(ch: char) -> bool {
    ('\u{2801}'..='\u{28FF}').contains(&ch)
}

#[test]
fn snapshot_idle_buttons() {
    let state = ready_state(40, 9);
    insta::assert_snapshot!("40x9_idle", render_state_to_string(40, 9, &state));
}

#[test]
fn focused_button_gets_a_thick_border() {
    let mut state = ready_state(40, 9);
    state.handle_input(&Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)));
    let rendered = render_state_to_string(40, 9, &state);
    assert!(rendered.contains("┏━━━━━━━━┓"));
    assert!(rendered.contains("╭────────╮"));
}

#[test]
fn live_bolt_is_drawn_in_braille() {
    let mut state = ready_state(40, 9);
    state.storm.strike_between(
        Point::new(0.0, 0.0),
        Point::new(79.0, 35.0),
        StrikeOptions {
            branches: 0,
            ..StrikeOptions::default()
        },
    );
    state.storm.render(&mut state.surface);

    let rendered = render_state_to_string(40, 9, &state);
    assert!(rendered.chars().any(is_braille));
    // buttons stay legible over the storm
    assert!(rendered.contains("│  Home  │"));
}

#[test]
fn hint_line_shows_on_wide_terminals() {
    let state = ready_state(80, 24);
    let rendered = render_state_to_string(80, 24, &state);
    let last = rendered.lines().last().unwrap_or_default();
    assert!(last.contains("space strike"));
    assert!(last.contains("q quit"));
}

#[test]
fn narrow_terminal_hides_buttons() {
    let state = ready_state(12, 6);
    let rendered = render_state_to_string(12, 6, &state);
    assert!(!rendered.contains("Home"));
}
