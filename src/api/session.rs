use std::collections::BTreeMap;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use tracing::{debug, error, warn};

use tag_core::settings::Settings;
use tag_core::PrefixIndex;
use tag_session::placement::{self, MonospaceMeasure, TextMeasure};
use tag_session::{
    ControllerConfig, FieldId, KeyInput, ListAction, Response, Snapshot, SuggestionController,
};

use super::host::{HostUi, SurfaceHost, TextSurface};
use super::loader::{DictionaryLoader, Fetch, LoadError};

const DEFAULT_CELL_WIDTH: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    /// Load gave up. The session stays inert for the rest of its life.
    Failed,
}

struct Attached {
    name: String,
    surface: Box<dyn TextSurface>,
}

/// Autocomplete wired to a set of host fields.
///
/// Owns the index, the attached surfaces and the controller. The host
/// forwards keydown, pointer, focus and timer events and renders whatever
/// the session asks `HostUi` for.
pub struct AutocompleteSession {
    controller: SuggestionController,
    ui: Box<dyn HostUi>,
    measure: Box<dyn TextMeasure>,
    fields: BTreeMap<FieldId, Attached>,
    next_field: u32,
    index: Option<Arc<PrefixIndex>>,
    load_state: LoadState,
    loading: Option<mpsc::Receiver<Result<String, LoadError>>>,
    max_results: usize,
    default_weight: f64,
}

impl AutocompleteSession {
    pub fn new(settings: &Settings, ui: Box<dyn HostUi>) -> Self {
        Self {
            controller: SuggestionController::new(ControllerConfig::from_settings(settings)),
            ui,
            measure: Box::new(MonospaceMeasure {
                cell_width: DEFAULT_CELL_WIDTH,
            }),
            fields: BTreeMap::new(),
            next_field: 0,
            index: None,
            load_state: LoadState::Pending,
            loading: None,
            max_results: settings.suggest.max_results,
            default_weight: settings.dictionary.default_weight,
        }
    }

    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Attach every id the host can resolve. Returns the handles in `ids`
    /// order; unresolved ids are skipped.
    pub fn attach<S: AsRef<str>>(&mut self, host: &dyn SurfaceHost, ids: &[S]) -> Vec<FieldId> {
        let mut attached = Vec::new();
        for name in ids {
            let name = name.as_ref();
            let Some(surface) = host.lookup(name) else {
                warn!(field = name, "text field not found, skipping");
                continue;
            };
            let id = FieldId(self.next_field);
            self.next_field += 1;
            self.fields.insert(
                id,
                Attached {
                    name: name.to_string(),
                    surface,
                },
            );
            attached.push(id);
        }
        debug!(count = attached.len(), "fields attached");
        attached
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .find(|(_, f)| f.name == name)
            .map(|(id, _)| *id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn index(&self) -> Option<&PrefixIndex> {
        self.index.as_deref()
    }

    pub fn controller(&self) -> &SuggestionController {
        &self.controller
    }

    pub fn install_blob(&mut self, blob: &str) {
        let index = PrefixIndex::from_blob(blob, self.default_weight, self.max_results);
        debug!(tags = index.len(), "index installed");
        self.index = Some(Arc::new(index));
        self.load_state = LoadState::Ready;
    }

    /// Load synchronously. On failure the user is alerted once and the
    /// session stays inert.
    pub fn load(&mut self, loader: &DictionaryLoader, fetch: &dyn Fetch) -> Result<(), LoadError> {
        let result = loader.load(fetch);
        match result {
            Ok(blob) => {
                self.install_blob(&blob);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Start loading on a background thread. Call `poll_load` from the UI
    /// thread to install the result.
    pub fn spawn_load(
        &mut self,
        loader: DictionaryLoader,
        fetch: Box<dyn Fetch + Send>,
    ) -> Result<(), LoadError> {
        match loader.spawn(fetch) {
            Ok(rx) => {
                self.loading = Some(rx);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Install a finished background load. Returns true once the load has
    /// settled (either way).
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.loading else {
            return self.load_state != LoadState::Pending;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => Err(LoadError::Disconnected),
        };
        self.loading = None;
        match result {
            Ok(blob) => self.install_blob(&blob),
            Err(e) => self.fail(&e),
        }
        true
    }

    fn fail(&mut self, e: &LoadError) {
        error!(error = %e, "autocomplete disabled");
        if self.load_state != LoadState::Failed {
            self.load_state = LoadState::Failed;
            self.ui.alert(&format!("Tag autocomplete is unavailable: {e}"));
        }
    }

    /// Keydown in an attached field. Returns true when the host should
    /// suppress the key's default action.
    pub fn key_down(&mut self, field: FieldId, input: KeyInput, now: Instant) -> bool {
        if self.load_state == LoadState::Failed {
            return false;
        }
        let Some(attached) = self.fields.get(&field) else {
            return false;
        };
        let text = attached.surface.text();
        let caret = attached.surface.caret();

        let resp = self.controller.handle_key(
            field,
            input,
            Snapshot::new(&text, caret),
            self.index.as_deref(),
            now,
        );
        let consumed = resp.consumed;
        self.apply(resp);
        consumed
    }

    /// Fire due debounce timers, re-reading each field's current content.
    pub fn tick(&mut self, now: Instant) {
        for field in self.controller.due_fields(now) {
            let Some(attached) = self.fields.get(&field) else {
                continue;
            };
            let text = attached.surface.text();
            let caret = attached.surface.caret();
            let resp = self
                .controller
                .refresh(field, Snapshot::new(&text, caret), self.index.as_deref());
            self.apply(resp);
        }
    }

    pub fn click_item(&mut self, item: usize) {
        let resp = self.controller.click(item);
        self.apply(resp);
    }

    pub fn pointer_down(&mut self, inside_list: bool) {
        if !inside_list {
            self.focus_lost();
        }
    }

    pub fn focus_lost(&mut self) {
        let resp = self.controller.dismiss();
        self.apply(resp);
    }

    fn apply(&mut self, resp: Response) {
        if let Some(edit) = resp.edit {
            if let Some(attached) = self.fields.get_mut(&edit.field) {
                attached.surface.set_text(&edit.text);
                attached.surface.set_caret(edit.caret);
                attached.surface.notify_changed();
            }
        }

        match resp.list {
            ListAction::Keep => {}
            ListAction::Show {
                field,
                items,
                highlighted,
            } => {
                let Some(attached) = self.fields.get(&field) else {
                    return;
                };
                let geometry = attached.surface.geometry();
                let text = attached.surface.text();
                let at = placement::anchor(
                    &text,
                    attached.surface.caret(),
                    &geometry,
                    self.measure.as_ref(),
                );
                self.ui.render_list(&items, highlighted, at);
            }
            ListAction::Highlight(i) => self.ui.highlight(i),
            ListAction::Hide => self.ui.clear(),
        }
    }
}
