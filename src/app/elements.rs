use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};

use crate::{
    domain::{
        element::{ElementId, ElementLocator},
        geometry::Point,
    },
    ui::surface::cell_center,
};

const BUTTON_HEIGHT: u16 = 3;
const BUTTON_PADDING: u16 = 6;
const BUTTON_SPACING: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub label: String,
    pub area: Rect,
}

/// The buttons the storm reacts to, laid out as one centred row.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: Vec<Element>,
}

impl ElementRegistry {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = labels
            .into_iter()
            .enumerate()
            .map(|(idx, label)| Element {
                id: ElementId(idx),
                label: label.into(),
                area: Rect::default(),
            })
            .collect();
        Self { elements }
    }

    /// Centres the button row in `area`. Buttons that do not fit get an
    /// empty area and can neither be hovered nor hit.
    pub fn layout(&mut self, area: Rect) {
        let row = Layout::vertical([Constraint::Length(BUTTON_HEIGHT)])
            .flex(Flex::Center)
            .split(area)[0];
        let widths = self.elements.iter().map(|element| {
            Constraint::Length(element.label.chars().count() as u16 + BUTTON_PADDING)
        });
        let cells = Layout::horizontal(widths)
            .flex(Flex::Center)
            .spacing(BUTTON_SPACING)
            .split(row);

        let needed = self
            .elements
            .iter()
            .map(|element| element.label.chars().count() as u16 + BUTTON_PADDING + BUTTON_SPACING)
            .sum::<u16>();
        let fits = row.height == BUTTON_HEIGHT && needed <= area.width.saturating_add(BUTTON_SPACING);

        for (element, cell) in self.elements.iter_mut().zip(cells.iter()) {
            element.area = if fits { *cell } else { Rect::default() };
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element under terminal cell `(col, row)`.
    pub fn hit(&self, col: u16, row: u16) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|element| !element.area.is_empty() && element.area.contains(Position::new(col, row)))
            .map(|element| element.id)
    }

    /// The element after (or before) `current` in layout order, wrapping.
    pub fn cycle(&self, current: Option<ElementId>, forward: bool) -> Option<ElementId> {
        let len = self.elements.len();
        if len == 0 {
            return None;
        }
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(id), true) => (id.0 + 1) % len,
            (Some(id), false) => (id.0 + len - 1) % len,
        };
        Some(ElementId(next))
    }
}

impl ElementLocator for ElementRegistry {
    fn center_of(&self, id: ElementId) -> Option<Point> {
        let area = self.get(id)?.area;
        if area.is_empty() {
            return None;
        }
        Some(cell_center(
            area.x + area.width / 2,
            area.y + area.height / 2,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ElementRegistry {
        let mut registry = ElementRegistry::new(["Projects", "About"]);
        registry.layout(Rect::new(0, 0, 80, 24));
        registry
    }

    #[test]
    fn buttons_sit_in_a_centred_row() {
        let registry = registry();
        let first = registry.get(ElementId(0)).expect("first").area;
        let second = registry.get(ElementId(1)).expect("second").area;

        assert_eq!(first.height, BUTTON_HEIGHT);
        assert_eq!(first.width, 8 + BUTTON_PADDING);
        assert_eq!(first.y, second.y);
        assert!(first.right() + BUTTON_SPACING <= second.x);
        let left_margin = first.x;
        let right_margin = 80 - second.right();
        assert!(left_margin.abs_diff(right_margin) <= 1);
    }

    #[test]
    fn hit_testing_finds_the_button_under_the_pointer() {
        let registry = registry();
        let area = registry.get(ElementId(1)).expect("second").area;
        assert_eq!(registry.hit(area.x, area.y), Some(ElementId(1)));
        assert_eq!(registry.hit(area.right() - 1, area.bottom() - 1), Some(ElementId(1)));
        assert_eq!(registry.hit(0, 0), None);
    }

    #[test]
    fn centers_are_in_surface_units() {
        let registry = registry();
        let area = registry.get(ElementId(0)).expect("first").area;
        let center = registry.center_of(ElementId(0)).expect("center");
        assert_eq!(center, cell_center(area.x + area.width / 2, area.y + 1));
        assert_eq!(registry.center_of(ElementId(5)), None);
    }

    #[test]
    fn too_narrow_terminal_hides_buttons() {
        let mut registry = ElementRegistry::new(["A very long label", "Another long label"]);
        registry.layout(Rect::new(0, 0, 20, 10));
        assert!(registry.iter().all(|element| element.area.is_empty()));
        assert_eq!(registry.center_of(ElementId(0)), None);
        assert_eq!(registry.hit(5, 5), None);
    }

    #[test]
    fn focus_cycles_both_ways() {
        let registry = registry();
        assert_eq!(registry.cycle(None, true), Some(ElementId(0)));
        assert_eq!(registry.cycle(None, false), Some(ElementId(1)));
        assert_eq!(registry.cycle(Some(ElementId(1)), true), Some(ElementId(0)));
        assert_eq!(registry.cycle(Some(ElementId(0)), false), Some(ElementId(1)));
        assert_eq!(ElementRegistry::default().cycle(None, true), None);
    }
}
