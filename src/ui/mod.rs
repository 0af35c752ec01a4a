pub mod surface;
pub mod theme;
pub mod widgets;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
};

use crate::{app::state::AppState, ui::theme::theme_for};

const HINT: &str = "space strike · b burst · tab focus · enter activate · q quit";

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let theme = theme_for(state.capability);

    frame.render_widget(state.surface.widget(state.capability), area);
    widgets::buttons::render(frame, state, theme);

    if area.height > 1 && area.width as usize >= HINT.chars().count() {
        let hint_area = Rect {
            x: area.x,
            y: area.bottom() - 1,
            width: area.width,
            height: 1,
        };
        let hint = Paragraph::new(Line::from(HINT).centered()).style(Style::default().fg(theme.hint));
        frame.render_widget(hint, hint_area);
    }
}
