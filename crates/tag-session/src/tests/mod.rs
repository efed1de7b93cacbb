mod basic;

use std::time::{Duration, Instant};

use tag_core::PrefixIndex;

use super::types::{ControllerConfig, FieldId, KeyInput, Response, Snapshot};
use super::SuggestionController;

pub(super) const PROMPT: FieldId = FieldId(0);
pub(super) const NEGATIVE: FieldId = FieldId(1);

pub(super) const DELAY: Duration = Duration::from_millis(100);

pub(super) fn make_test_index() -> PrefixIndex {
    let blob = "\
long hair
looking at viewer
long sleeves
blue eyes
blue sky
blush
lora:DetailTweaker
smile
";
    PrefixIndex::from_blob(blob, 0.8, 20)
}

pub(super) fn make_controller() -> SuggestionController {
    SuggestionController::new(ControllerConfig {
        delay: DELAY,
        ..ControllerConfig::default()
    })
}

/// Open the list for `text` with the caret at its end via Ctrl+Space.
pub(super) fn open_at_end(
    ctrl: &mut SuggestionController,
    index: &PrefixIndex,
    text: &str,
) -> Response {
    ctrl.handle_key(
        PROMPT,
        KeyInput::explicit_trigger(),
        Snapshot::new(text, text.len()),
        Some(index),
        Instant::now(),
    )
}

/// Press a key with an empty snapshot (navigation and closing keys ignore it).
pub(super) fn press(ctrl: &mut SuggestionController, input: KeyInput) -> Response {
    ctrl.handle_key(
        PROMPT,
        input,
        Snapshot::new("", 0),
        None,
        Instant::now(),
    )
}
