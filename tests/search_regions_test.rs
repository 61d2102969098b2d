// Search payloads posted by the search surface, and the overlay they drive

use morphology_viewer_wasm::models::{
    LoadError, PayloadError, StyleOp, StyleTarget, ViewerConfig, WordCoord,
};
use morphology_viewer_wasm::regions::{SearchItemPayload, REGION_CLASS};
use morphology_viewer_wasm::stats::{Section, SectionLimits};
use morphology_viewer_wasm::tokenize::DocNode;
use morphology_viewer_wasm::view::ViewContext;

fn view() -> ViewContext {
    let mut ctx = ViewContext::new(2, ViewerConfig::default()).unwrap();
    ctx.tokenize(DocNode::block(vec![
        DocNode::text("الم ذلك الكتاب "),
        DocNode::marker("۱"),
        DocNode::text(" لا ريب فيه هدى "),
        DocNode::marker("۲"),
        DocNode::text(" للمتقين الذين"),
    ]));
    ctx
}

fn payload(json: &str) -> SearchItemPayload {
    SearchItemPayload::from_json(json).unwrap()
}

#[test]
fn test_overlapping_items_stack_strata() {
    let mut ctx = view();
    ctx.add_search_item(payload(
        r#"{"display": "a", "items": [{"type": "word", "value": "x"}],
            "regions": [{"sura": 2, "startAyah": 1, "endAyah": 2}]}"#,
    ))
    .unwrap();
    let added = ctx
        .add_search_item(payload(
            r#"{"display": "b", "items": [{"type": "word", "value": "y"}],
                "regions": [{"sura": 2, "startAyah": 2, "endAyah": 2,
                             "matches": [{"ayah": 2, "wordIndex": 2}, {"ayah": 2, "wordIndex": 3}]}]}"#,
        ))
        .unwrap();

    let shadow_at = |coord: WordCoord| -> Option<String> {
        added
            .patch
            .edits_for(StyleTarget::Text, coord)
            .find_map(|op| match op {
                StyleOp::SetBoxShadow(s) => Some(s.clone()),
                _ => None,
            })
    };

    assert_eq!(shadow_at(WordCoord::new(1, 1)).unwrap().matches("inset").count(), 1);
    assert_eq!(shadow_at(WordCoord::new(2, 1)).unwrap().matches("inset").count(), 1);
    assert_eq!(shadow_at(WordCoord::new(2, 2)).unwrap().matches("inset").count(), 2);
    assert!(shadow_at(WordCoord::new(3, 1)).is_none());
}

#[test]
fn test_regions_of_other_groups_are_ignored() {
    let mut ctx = view();
    let added = ctx
        .add_search_item(payload(
            r#"{"display": "a", "items": [{"type": "root", "value": "r"}],
                "regions": [{"sura": 3, "startAyah": 1, "endAyah": 9}]}"#,
        ))
        .unwrap();
    assert_eq!(added.index, Some(0));
    assert!(added
        .patch
        .edits
        .iter()
        .all(|e| e.op != StyleOp::AddClass(REGION_CLASS.to_string())));
}

#[test]
fn test_rejected_payloads_leave_list_untouched() {
    let mut ctx = view();
    let err = ctx
        .add_search_item(payload(r#"{"display": "", "items": [{"type": "root", "value": "r"}]}"#))
        .unwrap_err();
    assert_eq!(err, PayloadError::EmptyDisplay);

    let err = ctx
        .add_search_item(payload(
            r#"{"display": "a", "items": [{"type": "root", "value": "r"}],
                "regions": [{"sura": 2, "startAyah": 5, "endAyah": 1}]}"#,
        ))
        .unwrap_err();
    assert!(matches!(err, PayloadError::InvertedRegion { .. }));
    assert!(ctx.search_items().is_empty());
}

#[test]
fn test_clearing_removes_every_stratum() {
    let mut ctx = view();
    ctx.add_search_item(payload(
        r#"{"display": "a", "items": [{"type": "word", "value": "x"}],
            "regions": [{"sura": 2, "startAyah": 1, "endAyah": 3}]}"#,
    ))
    .unwrap();

    let patch = ctx.clear_search_items();
    let cleared = patch
        .edits
        .iter()
        .filter(|e| e.op == StyleOp::ClearBoxShadow)
        .count();
    assert_eq!(cleared, ctx.words().len());
    assert!(patch.first_apply_index().is_none());
}

#[test]
fn test_frequency_sections_follow_limits() {
    let mut ctx = view();
    let dataset = r#"{"2": {"top_roots": [
        {"root": "ktb", "count": 9}, {"root": "qwl", "count": 5}, {"root": "Elm", "count": 2}
    ]}}"#;
    ctx.load_frequencies(Ok(dataset)).unwrap();
    assert_eq!(ctx.frequency_section(Section::TopRoots).len(), 3);

    ctx.set_section_limits(SectionLimits::from_value(&serde_json::json!({"top_roots": 2})));
    assert_eq!(ctx.chart_series(Section::TopRoots).len(), 2);

    ctx.set_section_limits(SectionLimits::uniform(0));
    assert!(ctx.frequency_section(Section::TopRoots).is_empty());

    assert!(ctx
        .load_frequencies(Err(LoadError::Transport("503".into())))
        .is_err());
    assert!(!ctx.frequencies_available());
}
