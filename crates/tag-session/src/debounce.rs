use std::time::Instant;

use tracing::debug;

use super::types::FieldId;
use super::SuggestionController;

impl SuggestionController {
    /// Replace the field's pending query with one due after the configured delay.
    pub(crate) fn schedule(&mut self, field: FieldId, now: Instant) {
        let deadline = now + self.config.delay;
        if self.pending.insert(field, deadline).is_some() {
            debug!(?field, "debounce timer replaced");
        }
    }

    pub(crate) fn cancel(&mut self, field: FieldId) {
        self.pending.remove(&field);
    }

    pub(crate) fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every field whose debounce deadline has passed.
    ///
    /// The caller re-reads each field and passes it to `refresh`.
    pub fn due_fields(&mut self, now: Instant) -> Vec<FieldId> {
        let mut due: Vec<FieldId> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(field, _)| *field)
            .collect();
        due.sort();
        for field in &due {
            self.pending.remove(field);
        }
        due
    }

    /// Earliest pending deadline, for hosts that arm a single wake-up timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, field: FieldId) -> bool {
        self.pending.contains_key(&field)
    }
}
