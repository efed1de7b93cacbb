use std::mem;

use tracing::debug;

use tag_core::{apply, locate, PrefixIndex};

use super::types::{
    ControllerState, Edit, FieldId, ListAction, OpenList, Response, Snapshot, Suggestion,
};
use super::SuggestionController;

impl SuggestionController {
    /// Query the index for the word under the caret and open or close the list.
    ///
    /// A missing index (dictionary still loading, or failed) fails closed.
    pub fn refresh(
        &mut self,
        field: FieldId,
        snapshot: Snapshot<'_>,
        index: Option<&PrefixIndex>,
    ) -> Response {
        let Some(index) = index else {
            debug!(?field, "index not ready");
            return self.close();
        };

        let span = locate(snapshot.text, snapshot.caret, &self.config.words);
        let items: Vec<Suggestion> = index
            .query(&span.text)
            .into_iter()
            .map(Suggestion::new)
            .collect();
        debug!(?field, word = %span.text, matches = items.len(), "refresh");

        if items.is_empty() {
            return self.close();
        }

        self.state = ControllerState::Open(OpenList {
            field,
            span,
            buffer: snapshot.text.to_string(),
            items: items.clone(),
            highlighted: None,
        });
        Response::not_consumed().with_list(ListAction::Show {
            field,
            items,
            highlighted: None,
        })
    }

    /// Pointer activation of a rendered row.
    pub fn click(&mut self, item: usize) -> Response {
        let rendered =
            matches!(&self.state, ControllerState::Open(list) if item < list.items.len());
        if rendered {
            self.accept(item)
        } else {
            Response::not_consumed()
        }
    }

    /// Pointer or focus moved outside the list.
    pub fn dismiss(&mut self) -> Response {
        self.cancel_all();
        self.close()
    }

    /// Splice the chosen row into the buffer it was located in and close.
    pub(crate) fn accept(&mut self, item: usize) -> Response {
        let ControllerState::Open(list) = mem::replace(&mut self.state, ControllerState::Closed)
        else {
            return Response::not_consumed();
        };
        let Some(chosen) = list.items.get(item) else {
            return Response::not_consumed().with_list(ListAction::Hide);
        };

        let splice = apply(&list.buffer, &list.span, &chosen.insert);
        debug!(field = ?list.field, tag = %chosen.insert, caret = splice.caret, "accept");
        self.cancel(list.field);

        let mut resp = Response::consumed().with_list(ListAction::Hide);
        resp.edit = Some(Edit {
            field: list.field,
            text: splice.text,
            caret: splice.caret,
        });
        resp
    }

    pub(crate) fn close(&mut self) -> Response {
        match mem::replace(&mut self.state, ControllerState::Closed) {
            ControllerState::Open(_) => Response::not_consumed().with_list(ListAction::Hide),
            ControllerState::Closed => Response::not_consumed(),
        }
    }
}
