//! Selection cursor and occurrence navigation
//!
//! At most one word is "selected" at a time. The cursor remembers what put
//! it there (a pinned root or a search item) so that removing that source
//! also removes the cursor.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Direction, Rect, ScrollRequest, StylePatch, Viewport, WordCoord};

/// Live geometry of tagged words in document coordinates
pub trait WordGeometry {
    fn rect_of(&self, coord: WordCoord) -> Option<Rect>;
}

impl WordGeometry for HashMap<WordCoord, Rect> {
    fn rect_of(&self, coord: WordCoord) -> Option<Rect> {
        self.get(&coord).copied()
    }
}

impl WordGeometry for BTreeMap<WordCoord, Rect> {
    fn rect_of(&self, coord: WordCoord) -> Option<Rect> {
        self.get(&coord).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorOrigin {
    Root(String),
    /// Index into the search item list
    SearchItem(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCursor {
    pub coord: WordCoord,
    pub origin: CursorOrigin,
}

/// Result of moving the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub coord: WordCoord,
    pub patch: StylePatch,
    pub scroll: Option<ScrollRequest>,
}

/// Pick the next target among `sorted` (ascending, non-empty)
///
/// With a current position the step wraps circularly. Without one, the first
/// target intersecting the viewport is chosen, else the first target.
pub fn step(
    sorted: &[WordCoord],
    current: Option<WordCoord>,
    direction: Direction,
    geometry: &dyn WordGeometry,
    viewport: &Viewport,
) -> Option<WordCoord> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();

    if let Some(pos) = current.and_then(|c| sorted.binary_search(&c).ok()) {
        let next = match direction {
            Direction::Next => (pos + 1) % n,
            Direction::Previous => (pos + n - 1) % n,
        };
        return Some(sorted[next]);
    }

    let on_screen = sorted.iter().copied().find(|coord| {
        geometry
            .rect_of(*coord)
            .map_or(false, |r| r.intersects_band(viewport.scroll_top, viewport.bottom()))
    });
    Some(on_screen.unwrap_or(sorted[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScrollContainer;

    fn coords(pairs: &[(u32, u32)]) -> Vec<WordCoord> {
        pairs.iter().map(|&(v, w)| WordCoord::new(v, w)).collect()
    }

    #[test]
    fn test_step_wraps_both_ways() {
        let sorted = coords(&[(1, 2), (3, 1), (7, 4)]);
        let geo: HashMap<WordCoord, Rect> = HashMap::new();
        let vp = Viewport::default();

        let last = WordCoord::new(7, 4);
        assert_eq!(step(&sorted, Some(last), Direction::Next, &geo, &vp), Some(sorted[0]));
        assert_eq!(
            step(&sorted, Some(sorted[0]), Direction::Previous, &geo, &vp),
            Some(last)
        );
    }

    #[test]
    fn test_step_anchors_on_screen() {
        let sorted = coords(&[(1, 1), (2, 1), (3, 1)]);
        let mut geo = HashMap::new();
        geo.insert(sorted[0], Rect::new(50.0, 0.0, 10.0, 10.0));
        geo.insert(sorted[1], Rect::new(900.0, 0.0, 10.0, 10.0));
        geo.insert(sorted[2], Rect::new(1500.0, 0.0, 10.0, 10.0));
        let vp = Viewport::new(ScrollContainer::Window, 800.0, 400.0);

        assert_eq!(step(&sorted, None, Direction::Next, &geo, &vp), Some(sorted[1]));

        let far = Viewport::new(ScrollContainer::Window, 5000.0, 400.0);
        assert_eq!(step(&sorted, None, Direction::Previous, &geo, &far), Some(sorted[0]));
    }

    #[test]
    fn test_step_empty() {
        let geo: HashMap<WordCoord, Rect> = HashMap::new();
        assert_eq!(step(&[], None, Direction::Next, &geo, &Viewport::default()), None);
    }
}
