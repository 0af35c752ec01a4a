use crate::domain::geometry::Point;

/// Identity of an interactive element, stable for the life of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Resolves an element to its current on-surface centre. Elements move on
/// resize, so callers ask at the moment they need a position.
pub trait ElementLocator {
    fn center_of(&self, id: ElementId) -> Option<Point>;
}

/// Locator for callers without interactive elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElements;

impl ElementLocator for NoElements {
    fn center_of(&self, _id: ElementId) -> Option<Point> {
        None
    }
}
