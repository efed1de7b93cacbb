use std::time::Instant;

use tracing::debug_span;

use tag_core::PrefixIndex;

use super::types::{
    cyclic_index, triggers_query, ControllerState, FieldId, Key, KeyInput, ListAction, Response,
    Snapshot,
};
use super::SuggestionController;

impl SuggestionController {
    /// Process a keydown in `field`. Returns what the host should do.
    ///
    /// `snapshot` is only read for the explicit trigger; debounced queries
    /// re-read the field when they fire.
    pub fn handle_key(
        &mut self,
        field: FieldId,
        input: KeyInput,
        snapshot: Snapshot<'_>,
        index: Option<&PrefixIndex>,
        now: Instant,
    ) -> Response {
        let _span = debug_span!("handle_key", ?field, ?input).entered();

        match input.key {
            Key::Enter => self.accept_highlighted(),

            Key::ArrowDown => self.navigate(1),

            Key::ArrowUp => self.navigate(-1),

            _ if input.is_explicit_trigger() => {
                self.cancel(field);
                let mut resp = self.refresh(field, snapshot, index);
                resp.consumed = true;
                resp
            }

            // Modified keystrokes (shortcuts, selection changes) invalidate
            // any suggestions for the field.
            _ if self.config.delay.is_zero() || input.modifiers.any() => self.close_field(field),

            key if triggers_query(self.config.trigger, key) => {
                self.schedule(field, now);
                Response::not_consumed()
            }

            _ => self.close_field(field),
        }
    }

    fn accept_highlighted(&mut self) -> Response {
        let item = match &self.state {
            ControllerState::Open(list) => list.highlighted.unwrap_or(0),
            ControllerState::Closed => return Response::not_consumed(),
        };
        self.accept(item)
    }

    /// Move the highlight by `delta` with wrap-around. With nothing highlighted
    /// yet, down selects the first row and up selects the last.
    fn navigate(&mut self, delta: i32) -> Response {
        let ControllerState::Open(list) = &mut self.state else {
            return Response::not_consumed();
        };

        let count = list.items.len();
        let next = match (list.highlighted, delta > 0) {
            (None, true) => 0,
            (current, _) => cyclic_index(current.unwrap_or(0), delta, count),
        };
        list.highlighted = Some(next);

        Response::consumed().with_list(ListAction::Highlight(next))
    }

    fn close_field(&mut self, field: FieldId) -> Response {
        self.cancel(field);
        self.close()
    }
}
