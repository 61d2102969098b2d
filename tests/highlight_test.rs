// Pinning and selection properties over an index built from corpus text

use std::collections::{BTreeMap, HashMap};

use morphology_viewer_wasm::highlight::{HighlightManager, PINNED_CLASS};
use morphology_viewer_wasm::models::{
    Direction, Rect, ScrollContainer, StyleOp, StylePatch, StyleTarget, ViewerConfig, Viewport,
    WordCoord,
};
use morphology_viewer_wasm::morphology::MorphologyIndex;
use morphology_viewer_wasm::script::to_target_script;

const CORPUS: &str = "(1:1:1:1)\tqaAla\tV\tSTEM|ROOT:qwl|LEM:qaAla\n\
(1:1:2:1)\tkitaAb\tN\tSTEM|ROOT:ktb|LEM:kitaAb\n\
(1:2:1:1)\tyaquwlu\tV\tSTEM|ROOT:qwl|LEM:qaAla\n\
(1:2:3:1)\tkataba\tV\tSTEM|ROOT:ktb|LEM:kataba\n\
(1:4:2:1)\tqawol\tN\tSTEM|ROOT:qwl|LEM:qawol\n";

fn index() -> MorphologyIndex {
    MorphologyIndex::from_corpus(1, CORPUS, None)
}

/// Net styling per (target, coord) after applying a sequence of patches
fn styled(patches: &[StylePatch]) -> BTreeMap<(bool, WordCoord), (Option<String>, Vec<String>)> {
    let mut state: BTreeMap<(bool, WordCoord), (Option<String>, Vec<String>)> = BTreeMap::new();
    for patch in patches {
        for edit in &patch.edits {
            let key = (edit.target == StyleTarget::Text, edit.coord);
            let entry = state.entry(key).or_default();
            match &edit.op {
                StyleOp::SetBackground(c) => entry.0 = Some(c.clone()),
                StyleOp::ClearBackground => entry.0 = None,
                StyleOp::AddClass(c) => {
                    if !entry.1.contains(c) {
                        entry.1.push(c.clone())
                    }
                }
                StyleOp::RemoveClass(c) => entry.1.retain(|x| x != c),
                StyleOp::SetBoxShadow(_) | StyleOp::ClearBoxShadow => {}
            }
        }
    }
    state
}

#[test]
fn test_pin_then_unpin_leaves_no_styling() {
    let index = index();
    let qwl = to_target_script("qwl");
    let mut hl = HighlightManager::new(&ViewerConfig::default());

    let pin = hl.pin(&index, &qwl);
    let unpin = hl.unpin(&index, &qwl);
    let state = styled(&[pin, unpin]);

    for ((is_text, coord), (background, classes)) in &state {
        assert!(classes.is_empty(), "classes left on {}", coord);
        if *is_text {
            assert!(background.is_none(), "text background left on {}", coord);
        } else {
            // minimap markers go back to the neutral color
            assert_eq!(background.as_deref(), Some("#ccc"));
        }
    }
}

#[test]
fn test_unpin_leaves_other_roots_alone() {
    let index = index();
    let qwl = to_target_script("qwl");
    let ktb = to_target_script("ktb");
    let mut hl = HighlightManager::new(&ViewerConfig::default());

    let p1 = hl.pin(&index, &qwl);
    let p2 = hl.pin(&index, &ktb);
    let u1 = hl.unpin(&index, &qwl);
    let state = styled(&[p1, p2, u1]);

    for coord in index.occurrences(&ktb) {
        let (background, classes) = &state[&(true, coord)];
        assert_eq!(background.as_deref(), Some(hl.pin_for(&ktb).unwrap().color.as_str()));
        assert_eq!(classes, &vec![PINNED_CLASS.to_string()]);
    }
    assert!(hl.pin_for(&qwl).is_none());
}

#[test]
fn test_select_next_is_circular() {
    let index = index();
    let qwl = to_target_script("qwl");
    let mut hl = HighlightManager::new(&ViewerConfig::default());
    let geometry: HashMap<WordCoord, Rect> = HashMap::new();
    let vp = Viewport::new(ScrollContainer::Window, 0.0, 600.0);

    let count = index.occurrence_count(&qwl);
    assert_eq!(count, 3);

    let first = hl.select_next(&index, &qwl, Direction::Next, &geometry, &vp).unwrap();
    let mut last = first.coord;
    for _ in 0..count {
        last = hl.select_next(&index, &qwl, Direction::Next, &geometry, &vp).unwrap().coord;
    }
    assert_eq!(last, first.coord);

    let back = hl.select_next(&index, &qwl, Direction::Previous, &geometry, &vp).unwrap();
    assert_eq!(back.coord, WordCoord::new(4, 2));
}

#[test]
fn test_first_selection_prefers_on_screen_occurrence() {
    let index = index();
    let qwl = to_target_script("qwl");
    let mut hl = HighlightManager::new(&ViewerConfig::default());
    let mut geometry = HashMap::new();
    geometry.insert(WordCoord::new(1, 1), Rect::new(100.0, 0.0, 30.0, 20.0));
    geometry.insert(WordCoord::new(2, 1), Rect::new(1500.0, 0.0, 30.0, 20.0));
    geometry.insert(WordCoord::new(4, 2), Rect::new(2400.0, 0.0, 30.0, 20.0));
    let vp = Viewport::new(ScrollContainer::ContentPanel, 1400.0, 600.0);

    let sel = hl.select_next(&index, &qwl, Direction::Next, &geometry, &vp).unwrap();
    assert_eq!(sel.coord, WordCoord::new(2, 1));
    let scroll = sel.scroll.unwrap();
    assert_eq!(scroll.container, ScrollContainer::ContentPanel);
    assert_eq!(scroll.top, 1500.0 - 120.0);
}

#[test]
fn test_unpin_keeps_word_shared_with_another_pinned_root() {
    // one word whose two segments carry different roots
    let corpus = "(1:1:1:1)\tqaAla\tV\tSTEM|ROOT:qwl|LEM:qaAla\n\
(1:1:1:2)\tkitaAb\tN\tSUFFIX|ROOT:ktb|LEM:kitaAb\n\
(1:2:1:1)\tkataba\tV\tSTEM|ROOT:ktb|LEM:kataba\n";
    let index = MorphologyIndex::from_corpus(1, corpus, None);
    let qwl = to_target_script("qwl");
    let ktb = to_target_script("ktb");
    let shared = WordCoord::new(1, 1);
    assert!(index.covers(&qwl, shared) && index.covers(&ktb, shared));

    let mut hl = HighlightManager::new(&ViewerConfig::default());
    let p1 = hl.pin(&index, &ktb);
    let p2 = hl.pin(&index, &qwl);
    let u1 = hl.unpin(&index, &qwl);
    let state = styled(&[p1, p2, u1]);

    let ktb_color = hl.pin_for(&ktb).unwrap().color.clone();
    for coord in index.occurrences(&ktb) {
        let (background, classes) = &state[&(true, coord)];
        assert_eq!(background.as_deref(), Some(ktb_color.as_str()), "text on {}", coord);
        assert_eq!(classes, &vec![PINNED_CLASS.to_string()]);

        let (marker, marker_classes) = &state[&(false, coord)];
        assert_ne!(marker.as_deref(), Some("#ccc"), "marker on {}", coord);
        assert_eq!(marker_classes, &vec![PINNED_CLASS.to_string()]);
    }

    // once the last covering root goes, the word is cleared
    let u2 = hl.unpin(&index, &ktb);
    assert!(u2
        .edits_for(StyleTarget::Text, shared)
        .any(|op| *op == StyleOp::ClearBackground));
}
