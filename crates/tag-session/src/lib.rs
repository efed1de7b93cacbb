//! Suggestion list state machine for inline tag completion.
//!
//! `SuggestionController` owns the open/closed list state, the highlighted
//! row, and one debounce timer per field. Each event returns a `Response`
//! describing what the host should render and which buffer edit to apply;
//! the controller never touches a UI itself.

pub(crate) mod types;

mod debounce;
mod key_handlers;
pub mod placement;
mod query;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::time::Instant;

pub use types::{
    ControllerConfig, Edit, FieldId, Key, KeyInput, ListAction, Modifiers, Response, Snapshot,
    Suggestion,
};

use types::ControllerState;

pub struct SuggestionController {
    config: ControllerConfig,
    state: ControllerState,
    /// Debounce deadline per field. At most one pending query per field.
    pending: HashMap<FieldId, Instant>,
}

impl SuggestionController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::Closed,
            pending: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ControllerState::Open(_))
    }

    /// Field the open list belongs to.
    pub fn open_field(&self) -> Option<FieldId> {
        match &self.state {
            ControllerState::Open(list) => Some(list.field),
            ControllerState::Closed => None,
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        match &self.state {
            ControllerState::Open(list) => list.highlighted,
            ControllerState::Closed => None,
        }
    }

    pub fn items(&self) -> &[Suggestion] {
        match &self.state {
            ControllerState::Open(list) => &list.items,
            ControllerState::Closed => &[],
        }
    }
}
