#![allow(dead_code)]

use clap::Parser;
use ratatui::{Terminal, backend::TestBackend};
use terminal_lightning::{app::state::AppState, cli::Cli, storm::tuning::Tuning, ui};

pub fn fixture_cli() -> Cli {
    Cli::parse_from([
        "terminal-lightning",
        "--seed",
        "1",
        "--no-color",
        "--mute",
        "--button",
        "Home",
        "--button",
        "Docs",
    ])
}

/// No timed, pointer or hover strikes; only what a test asks for.
pub fn calm_tuning() -> Tuning {
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

pub fn ready_state(width: u16, height: u16) -> AppState {
    AppState::new(&fixture_cli(), calm_tuning(), width, height)
}

pub fn render_state_to_string(width: u16, height: u16, state: &AppState) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("draw");

    let buffer = terminal.backend().buffer().clone();
    let mut lines = Vec::new();
    for y in 0..height {
        let mut line = String::new();
        for x in 0..width {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
