use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::{
    app::{
        elements::ElementRegistry,
        events::{AppEvent, start_frame_task},
    },
    cli::Cli,
    domain::{element::ElementId, geometry::Point},
    storm::{manager::StormManager, tuning::Tuning},
    ui::{
        surface::{BrailleSurface, Surface, cell_center},
        theme::{ColorCapability, detect_color_capability},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Running,
    Quit,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub storm: StormManager,
    pub surface: BrailleSurface,
    pub elements: ElementRegistry,
    pub pointer: Point,
    pub mouse_over: Option<ElementId>,
    pub focus: Option<ElementId>,
    pub capability: ColorCapability,
    pub started_at: Instant,
    pub frame_tick: u64,
}

impl AppState {
    pub fn new(cli: &Cli, tuning: Tuning, cols: u16, rows: u16) -> Self {
        let surface = BrailleSurface::new(cols, rows);
        let (width, height) = surface.size();
        let mut elements = ElementRegistry::new(cli.button_labels());
        elements.layout(Rect::new(0, 0, cols, rows));

        Self {
            mode: AppMode::Running,
            running: true,
            storm: StormManager::new(width, height, tuning, cli.seed),
            surface,
            elements,
            pointer: Point::default(),
            mouse_over: None,
            focus: None,
            capability: detect_color_capability(cli.effective_color_mode()),
            started_at: Instant::now(),
            frame_tick: 0,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                log::info!(
                    "storm started: {}x{} cells, {} buttons, {} fps",
                    self.surface.cols(),
                    self.surface.rows(),
                    self.elements.len(),
                    cli.fps
                );
                start_frame_task(tx.clone(), cli.fps);
            }
            AppEvent::TickFrame => {
                let now = self.started_at.elapsed();
                self.advance(now);
            }
            AppEvent::Input(event) => {
                if self.handle_input(&event) {
                    tx.send(AppEvent::Quit).await?;
                }
            }
            AppEvent::Quit => self.mode = AppMode::Quit,
        }
        Ok(())
    }

    /// One animation frame at storm time `now`.
    pub fn advance(&mut self, now: Duration) {
        self.frame_tick = self.frame_tick.saturating_add(1);
        self.storm.tick(now, self.pointer, &self.elements);
        self.storm.render(&mut self.surface);
    }

    /// Applies one terminal event. Returns whether the user asked to quit;
    /// the caller turns that into [`AppEvent::Quit`].
    pub fn handle_input(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => return self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
        false
    }

    /// Elements the storm should treat as hovered: the one under the mouse
    /// and the one holding keyboard focus.
    pub fn is_highlighted(&self, id: ElementId) -> bool {
        self.mouse_over == Some(id) || self.focus == Some(id)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.surface.resize(cols, rows);
        self.elements.layout(Rect::new(0, 0, cols, rows));
        let (width, height) = self.surface.size();
        self.storm.resize(width, height);
        self.storm.reset();
        self.mouse_over = None;
        self.sync_hover();
        log::debug!("resized to {cols}x{rows} cells");
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char(' ') => self.storm.strike_random(),
            KeyCode::Char('b') => self.storm.burst(self.pointer),
            KeyCode::Tab => {
                self.focus = self.elements.cycle(self.focus, true);
                self.sync_hover();
            }
            KeyCode::BackTab => {
                self.focus = self.elements.cycle(self.focus, false);
                self.sync_hover();
            }
            KeyCode::Enter => {
                if let Some(focus) = self.focus {
                    self.storm.activate(focus, &self.elements);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = cell_center(mouse.column, mouse.row);
                self.mouse_over = self.elements.hit(mouse.column, mouse.row);
                self.sync_hover();
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = cell_center(mouse.column, mouse.row);
                if let Some(id) = self.elements.hit(mouse.column, mouse.row) {
                    self.storm.activate(id, &self.elements);
                }
            }
            _ => {}
        }
    }

    /// Reports hover transitions to the storm so entering bursts fire once.
    fn sync_hover(&mut self) {
        let left: Vec<ElementId> = self
            .storm
            .hovered()
            .filter(|id| !self.is_highlighted(*id))
            .collect();
        for id in left {
            self.storm.track_hover(id, false, &self.elements);
        }

        let entered: Vec<ElementId> = [self.mouse_over, self.focus]
            .into_iter()
            .flatten()
            .filter(|id| !self.storm.is_hovered(*id))
            .collect();
        for id in entered {
            self.storm.track_hover(id, true, &self.elements);
        }
    }
}

#[cfg(test)]
mod tests;
