use std::time::{Duration, Instant};

use tag_core::settings::TriggerClass;

use super::*;
use crate::types::{Edit, Key, ListAction, Modifiers, Suggestion};

fn inserts(items: &[Suggestion]) -> Vec<&str> {
    items.iter().map(|s| s.insert.as_str()).collect()
}

// --- Opening the list ---

#[test]
fn explicit_trigger_opens_ranked_list() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    let resp = open_at_end(&mut ctrl, &index, "1girl, lo");
    assert!(resp.consumed);
    match resp.list {
        ListAction::Show {
            field,
            items,
            highlighted,
        } => {
            assert_eq!(field, PROMPT);
            assert_eq!(
                inserts(&items),
                vec!["long hair", "looking at viewer", "long sleeves"]
            );
            assert_eq!(highlighted, None);
        }
        other => panic!("expected Show, got {other:?}"),
    }
    assert!(ctrl.is_open());
    assert_eq!(ctrl.open_field(), Some(PROMPT));
    assert_eq!(ctrl.highlighted(), None);
}

#[test]
fn reference_rows_use_short_label() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "det");
    assert_eq!(
        ctrl.items(),
        &[Suggestion {
            insert: "<lora:DetailTweaker:0.8>".to_string(),
            label: "lora:DetailTweaker".to_string(),
        }]
    );
}

#[test]
fn no_match_keeps_closed_list_closed() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    let resp = open_at_end(&mut ctrl, &index, "zzz");
    assert!(resp.consumed);
    assert_eq!(resp.list, ListAction::Keep);
    assert!(!ctrl.is_open());
}

#[test]
fn no_match_closes_open_list() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "bl");
    let resp = open_at_end(&mut ctrl, &index, "blx");
    assert_eq!(resp.list, ListAction::Hide);
    assert!(!ctrl.is_open());
}

#[test]
fn empty_word_after_separator_does_not_open() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "long hair, ");
    assert!(!ctrl.is_open());
}

#[test]
fn missing_index_fails_closed() {
    let mut ctrl = make_controller();
    let resp = ctrl.refresh(PROMPT, Snapshot::new("lo", 2), None);
    assert_eq!(resp.list, ListAction::Keep);
    assert!(resp.edit.is_none());
    assert!(!ctrl.is_open());
}

// --- Accepting ---

#[test]
fn enter_accepts_first_row_when_nothing_highlighted() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "1girl, lo");
    let resp = press(&mut ctrl, KeyInput::plain(Key::Enter));
    assert!(resp.consumed);
    assert_eq!(resp.list, ListAction::Hide);
    assert_eq!(
        resp.edit,
        Some(Edit {
            field: PROMPT,
            text: "1girl, long hair, ".to_string(),
            caret: 18,
        })
    );
    assert!(!ctrl.is_open());
}

#[test]
fn enter_accepts_highlighted_row() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "bl");
    press(&mut ctrl, KeyInput::plain(Key::ArrowDown));
    press(&mut ctrl, KeyInput::plain(Key::ArrowDown));
    let resp = press(&mut ctrl, KeyInput::plain(Key::Enter));
    let edit = resp.edit.unwrap();
    assert_eq!(edit.text, "blue sky, ");
    assert_eq!(edit.caret, 10);
}

#[test]
fn enter_while_closed_is_passed_through() {
    let mut ctrl = make_controller();
    let resp = press(&mut ctrl, KeyInput::plain(Key::Enter));
    assert!(!resp.consumed);
    assert_eq!(resp.list, ListAction::Keep);
    assert!(resp.edit.is_none());
}

#[test]
fn splice_uses_span_after_comma() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    let text = "solo,smi";
    ctrl.handle_key(
        PROMPT,
        KeyInput::explicit_trigger(),
        Snapshot::new(text, text.len()),
        Some(&index),
        Instant::now(),
    );
    let edit = press(&mut ctrl, KeyInput::plain(Key::Enter)).edit.unwrap();
    assert_eq!(edit.text, "solo, smile, ");
    assert_eq!(edit.caret, edit.text.len());
}

#[test]
fn accept_preserves_text_after_caret() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    let text = "a, blc, red eyes";
    ctrl.handle_key(
        PROMPT,
        KeyInput::explicit_trigger(),
        Snapshot::new(text, 5),
        Some(&index),
        Instant::now(),
    );
    assert_eq!(inserts(ctrl.items()), vec!["blue eyes", "blue sky", "blush"]);
    let edit = press(&mut ctrl, KeyInput::plain(Key::Enter)).edit.unwrap();
    assert_eq!(edit.text, "a, blue eyes, c, red eyes");
    assert_eq!(edit.caret, 14);
}

#[test]
fn weighted_reference_inserts_default_weight() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "masterpiece, (det");
    let edit = press(&mut ctrl, KeyInput::plain(Key::Enter)).edit.unwrap();
    assert_eq!(edit.text, "masterpiece, (<lora:DetailTweaker:0.8>, ");
}

#[test]
fn click_selects_row_regardless_of_highlight() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "lo");
    press(&mut ctrl, KeyInput::plain(Key::ArrowDown));
    let resp = ctrl.click(2);
    assert_eq!(resp.list, ListAction::Hide);
    assert_eq!(resp.edit.unwrap().text, "long sleeves, ");
    assert!(!ctrl.is_open());
}

#[test]
fn click_outside_rows_is_ignored() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    assert_eq!(ctrl.click(0).list, ListAction::Keep);
    open_at_end(&mut ctrl, &index, "lo");
    let resp = ctrl.click(3);
    assert!(resp.edit.is_none());
    assert!(ctrl.is_open());
}

// --- Closing ---

#[test]
fn dismiss_closes_and_cancels_timers() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "lo");
    press(&mut ctrl, KeyInput::char('n'));
    assert_eq!(ctrl.pending_count(), 1);

    let resp = ctrl.dismiss();
    assert_eq!(resp.list, ListAction::Hide);
    assert!(!ctrl.is_open());
    assert_eq!(ctrl.pending_count(), 0);
}

#[test]
fn modified_key_closes_list() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "lo");
    let resp = press(
        &mut ctrl,
        KeyInput {
            key: Key::Char('A'),
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        },
    );
    assert!(!resp.consumed);
    assert_eq!(resp.list, ListAction::Hide);
    assert!(!ctrl.is_open());
}

#[test]
fn ctrl_shortcut_cancels_pending_query() {
    let mut ctrl = make_controller();

    press(&mut ctrl, KeyInput::char('l'));
    assert!(ctrl.is_pending(PROMPT));
    press(
        &mut ctrl,
        KeyInput {
            key: Key::Char('v'),
            modifiers: Modifiers::CTRL,
        },
    );
    assert!(!ctrl.is_pending(PROMPT));
}

#[test]
fn keys_outside_trigger_class_close() {
    let index = make_test_index();
    for key in [Key::Escape, Key::Tab, Key::Other, Key::Char('1'), Key::Char('(')] {
        let mut ctrl = make_controller();
        open_at_end(&mut ctrl, &index, "lo");
        let resp = press(&mut ctrl, KeyInput::plain(key));
        assert_eq!(resp.list, ListAction::Hide, "key={key:?}");
        assert!(!resp.consumed);
    }
}

#[test]
fn trigger_keys_keep_list_open() {
    let index = make_test_index();
    let mut ctrl = make_controller();

    open_at_end(&mut ctrl, &index, "lo");
    for key in [Key::Char('n'), Key::Char('-'), Key::Char(' '), Key::Backspace] {
        let resp = press(&mut ctrl, KeyInput::plain(key));
        assert_eq!(resp.list, ListAction::Keep);
        assert!(ctrl.is_open());
    }
}

#[test]
fn strict_trigger_class_closes_on_space() {
    let index = make_test_index();
    let mut ctrl = SuggestionController::new(ControllerConfig {
        delay: DELAY,
        trigger: TriggerClass::Strict,
        ..ControllerConfig::default()
    });

    open_at_end(&mut ctrl, &index, "lo");
    let resp = press(&mut ctrl, KeyInput::char(' '));
    assert_eq!(resp.list, ListAction::Hide);
    assert!(!ctrl.is_pending(PROMPT));

    open_at_end(&mut ctrl, &index, "lo");
    press(&mut ctrl, KeyInput::plain(Key::Backspace));
    assert!(!ctrl.is_open());
}

#[test]
fn zero_delay_disables_automatic_trigger() {
    let index = make_test_index();
    let mut ctrl = SuggestionController::new(ControllerConfig {
        delay: Duration::ZERO,
        ..ControllerConfig::default()
    });

    let resp = press(&mut ctrl, KeyInput::char('l'));
    assert_eq!(resp.list, ListAction::Keep);
    assert_eq!(ctrl.pending_count(), 0);

    // Explicit trigger still works.
    let resp = open_at_end(&mut ctrl, &index, "lo");
    assert!(matches!(resp.list, ListAction::Show { .. }));
}
