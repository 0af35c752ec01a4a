pub mod app;
pub mod audio;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod storm;
pub mod ui;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::state::{AppMode, AppState};
use cli::Cli;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use storm::tuning::{self, Tuning};
use tokio::sync::mpsc;

pub async fn run(cli: Cli) -> Result<()> {
    let tuning = load_tuning(&cli)?;
    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, cli, tuning).await;
    restore_terminal(&mut terminal)?;
    result
}

/// Tuning from `--config`, the config env var, or defaults, with CLI
/// overrides applied.
pub fn load_tuning(cli: &Cli) -> Result<Tuning> {
    let mut tuning = tuning::resolve(cli.config.as_deref()).context("loading storm tuning")?;
    if cli.no_intro {
        tuning.intro_strikes = false;
    }
    Ok(tuning)
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: Cli,
    tuning: Tuning,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);

    let size = terminal.size()?;
    let mut app = AppState::new(&cli, tuning, size.width, size.height);
    app.storm = app.storm.with_audio(audio::default_cue(cli.mute));

    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, &cli).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, &cli).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    log::info!(
        "storm ended after {} frames, {} strikes",
        app.frame_tick,
        app.storm.total_strikes()
    );
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
