//! Tests for structure assembly: panel ordering, entity and
//! speech-bubble assignment.

use tankobon_core::assembly::{
    AssemblyParams, assemble_panels, assign_entities, assign_speech_bubbles,
};
use tankobon_core::error::ComicError;
use tankobon_core::model::{Page, PageType};

fn page() -> Page {
    Page::new(1, PageType::Single)
}

fn params() -> AssemblyParams {
    AssemblyParams::default()
}

// ============================================================================
// Panel assembly
// ============================================================================

#[test]
fn test_two_panels_in_one_row_order_left_to_right() {
    let mut page = page();
    assemble_panels(
        &[(110.0, 0.0, 210.0, 50.0), (0.0, 0.0, 100.0, 50.0)],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(page.panels.len(), 2);
    assert_eq!(page.panels[0].bounding_box.x, 0.0);
    assert_eq!(page.panels[1].bounding_box.x, 110.0);
    assert_eq!(page.panels[0].page_id, 1);
}

#[test]
fn test_row_bucketing_tolerates_vertical_misalignment() {
    // Top row: y 0 and y 40 land in the same 50px bucket even though
    // the right panel sits lower; the bottom panel starts a new row.
    let mut page = page();
    assemble_panels(
        &[
            (0.0, 100.0, 200.0, 180.0),
            (110.0, 40.0, 210.0, 90.0),
            (0.0, 0.0, 100.0, 50.0),
        ],
        &mut page,
        &params(),
    )
    .unwrap();

    let ys: Vec<f64> = page.panels.iter().map(|p| p.bounding_box.y).collect();
    assert_eq!(ys, vec![0.0, 40.0, 100.0]);
}

#[test]
fn test_panel_sort_is_stable_on_equal_keys() {
    // Same row bucket, same x: input order must survive. The two
    // panels differ only in height.
    let mut page = page();
    assemble_panels(
        &[(10.0, 0.0, 100.0, 80.0), (10.0, 20.0, 100.0, 60.0)],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(page.panels[0].bounding_box.height, 80.0);
    assert_eq!(page.panels[1].bounding_box.height, 40.0);
}

#[test]
fn test_empty_panel_list_is_fine() {
    let mut page = page();
    assemble_panels(&[], &mut page, &params()).unwrap();
    assert!(page.panels.is_empty());
}

#[test]
fn test_reassembly_replaces_prior_panels() {
    let mut page = page();
    assemble_panels(&[(0.0, 0.0, 50.0, 50.0)], &mut page, &params()).unwrap();
    assemble_panels(&[(0.0, 0.0, 80.0, 80.0)], &mut page, &params()).unwrap();
    assert_eq!(page.panels.len(), 1);
    assert_eq!(page.panels[0].bounding_box.width, 80.0);
}

#[test]
fn test_degenerate_box_is_rejected_at_the_boundary() {
    let mut page = page();
    let err = assemble_panels(&[(100.0, 0.0, 50.0, 50.0)], &mut page, &params()).unwrap_err();
    assert!(matches!(err, ComicError::InvalidBox { .. }));
}

// ============================================================================
// Entity assignment
// ============================================================================

fn two_panel_page() -> Page {
    let mut page = page();
    assemble_panels(
        &[(0.0, 0.0, 100.0, 100.0), (110.0, 0.0, 210.0, 100.0)],
        &mut page,
        &params(),
    )
    .unwrap();
    page
}

#[test]
fn test_entity_attaches_to_panel_with_max_iou() {
    let mut page = two_panel_page();
    // Fully inside the right panel.
    let outcome = assign_entities(&[(120.0, 10.0, 160.0, 60.0)], &[3], &mut page, &params()).unwrap();

    assert_eq!(outcome.attached, 1);
    assert!(page.panels[0].entities.is_empty());
    assert_eq!(page.panels[1].entities.len(), 1);
    assert_eq!(page.panels[1].entities[0].cluster_id, 3);
    assert!(page.panels[1].entities[0].active_tag);
}

#[test]
fn test_entity_straddling_panels_goes_to_larger_overlap() {
    let mut page = two_panel_page();
    // Mostly over the left panel, tip over the right one.
    assign_entities(&[(60.0, 10.0, 130.0, 50.0)], &[1], &mut page, &params()).unwrap();

    assert_eq!(page.panels[0].entities.len(), 1);
    assert!(page.panels[1].entities.is_empty());
}

#[test]
fn test_entity_without_overlap_is_dropped_and_counted() {
    let mut page = two_panel_page();
    let outcome =
        assign_entities(&[(500.0, 500.0, 540.0, 540.0)], &[7], &mut page, &params()).unwrap();

    assert_eq!(outcome.dropped, 1);
    assert_eq!(outcome.attached, 0);
    assert!(page.panels.iter().all(|p| p.entities.is_empty()));
}

#[test]
fn test_entities_all_dropped_without_panels() {
    let mut empty = page();
    let outcome = assign_entities(&[(0.0, 0.0, 10.0, 10.0)], &[1], &mut empty, &params()).unwrap();
    assert_eq!(outcome.dropped, 1);
}

#[test]
fn test_duplicate_entity_detection_first_one_wins() {
    let mut page = two_panel_page();
    // Nearly identical boxes, IoU well above 0.6.
    let outcome = assign_entities(
        &[(10.0, 10.0, 50.0, 50.0), (11.0, 11.0, 51.0, 51.0)],
        &[1, 2],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(outcome.attached, 1);
    assert_eq!(outcome.deduplicated, 1);
    assert_eq!(page.panels[0].entities.len(), 1);
    assert_eq!(page.panels[0].entities[0].cluster_id, 1);
}

#[test]
fn test_moderate_overlap_is_not_a_duplicate() {
    let mut page = two_panel_page();
    let outcome = assign_entities(
        &[(10.0, 10.0, 50.0, 50.0), (35.0, 10.0, 75.0, 50.0)],
        &[1, 2],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(outcome.attached, 2);
    assert_eq!(outcome.deduplicated, 0);
}

#[test]
fn test_entity_order_uses_size_offset_key() {
    // The intra-panel key is (y - height, x - width), not (y, x): a
    // taller entity that starts slightly lower still sorts first. Kept
    // from the source behavior on purpose; this test documents it.
    let mut page = two_panel_page();
    assign_entities(
        &[(10.0, 10.0, 15.0, 12.0), (30.0, 12.0, 35.0, 42.0)],
        &[1, 2],
        &mut page,
        &params(),
    )
    .unwrap();

    let ids: Vec<i32> = page.panels[0].entities.iter().map(|e| e.cluster_id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn test_mismatched_cluster_labels_are_fatal() {
    let mut page = two_panel_page();
    let err = assign_entities(&[(0.0, 0.0, 10.0, 10.0)], &[], &mut page, &params()).unwrap_err();
    assert!(matches!(
        err,
        ComicError::MismatchedArrays {
            what: "entities",
            boxes: 1,
            labels: 0,
        }
    ));
}

// ============================================================================
// Speech-bubble assignment
// ============================================================================

#[test]
fn test_bubble_attaches_by_overlap_ratio() {
    let mut page = two_panel_page();
    // Most of the bubble lies over the right panel, none over the left.
    let outcome = assign_speech_bubbles(
        &[(100.0, 10.0, 150.0, 40.0)],
        &[true],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(outcome.attached, 1);
    assert!(page.panels[0].speech_bubbles.is_empty());
    let bubble = &page.panels[1].speech_bubbles[0];
    assert_eq!(bubble.speaker_id, 1);
    assert_eq!(bubble.label, "dialogue");
    assert!(bubble.text.is_empty());
}

#[test]
fn test_non_essential_bubble_gets_speaker_zero() {
    let mut page = two_panel_page();
    assign_speech_bubbles(&[(10.0, 10.0, 40.0, 30.0)], &[false], &mut page, &params()).unwrap();
    assert_eq!(page.panels[0].speech_bubbles[0].speaker_id, 0);
}

#[test]
fn test_bubbles_are_not_deduplicated() {
    let mut page = two_panel_page();
    let outcome = assign_speech_bubbles(
        &[(10.0, 10.0, 40.0, 30.0), (10.0, 10.0, 40.0, 30.0)],
        &[false, false],
        &mut page,
        &params(),
    )
    .unwrap();

    assert_eq!(outcome.attached, 2);
    assert_eq!(page.panels[0].speech_bubbles.len(), 2);
}

#[test]
fn test_bubble_without_overlap_is_dropped() {
    let mut page = two_panel_page();
    let outcome = assign_speech_bubbles(
        &[(400.0, 400.0, 440.0, 430.0)],
        &[true],
        &mut page,
        &params(),
    )
    .unwrap();
    assert_eq!(outcome.dropped, 1);
}

#[test]
fn test_mismatched_essential_flags_are_fatal() {
    let mut page = two_panel_page();
    let err = assign_speech_bubbles(&[(0.0, 0.0, 10.0, 10.0)], &[], &mut page, &params())
        .unwrap_err();
    assert!(matches!(
        err,
        ComicError::MismatchedArrays {
            what: "speech bubbles",
            ..
        }
    ));
}
