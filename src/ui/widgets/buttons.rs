use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{app::state::AppState, ui::theme::Theme};

/// Draws the button row over the storm. Highlighted buttons (under the
/// mouse or holding focus) get the hover colours and a thick border.
pub fn render(frame: &mut Frame, state: &AppState, theme: Theme) {
    for element in state.elements.iter() {
        if element.area.is_empty() {
            continue;
        }
        let highlighted = state.is_highlighted(element.id);
        let (text, border, border_type) = if highlighted {
            (
                theme.button_hover_text,
                theme.button_hover_border,
                BorderType::Thick,
            )
        } else {
            (theme.button_text, theme.button_border, BorderType::Rounded)
        };

        let mut text_style = Style::default().fg(text);
        if highlighted {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }

        let button = Paragraph::new(element.label.as_str())
            .alignment(Alignment::Center)
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(Style::default().fg(border)),
            );

        frame.render_widget(Clear, element.area);
        frame.render_widget(button, element.area);
    }
}
