use std::time::Duration;

use tag_core::index::label_for;
use tag_core::locate::{WordRules, WordSpan};
use tag_core::settings::{Settings, TriggerClass};

/// Opaque handle for an attached text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    Escape,
    Tab,
    /// Any other named key (Home, PageDown, F5, ...).
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// Ctrl+Space: query now, skipping the debounce delay.
    pub fn explicit_trigger() -> Self {
        Self {
            key: Key::Char(' '),
            modifiers: Modifiers::CTRL,
        }
    }

    pub(crate) fn is_explicit_trigger(&self) -> bool {
        self.modifiers.ctrl && self.key == Key::Char(' ')
    }
}

/// Field content as seen by the controller at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub text: &'a str,
    /// Byte offset.
    pub caret: usize,
}

impl<'a> Snapshot<'a> {
    pub fn new(text: &'a str, caret: usize) -> Self {
        Self { text, caret }
    }
}

pub struct ControllerConfig {
    /// Zero disables automatic triggering.
    pub delay: Duration,
    pub trigger: TriggerClass,
    pub words: WordRules,
}

impl ControllerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            delay: settings.suggest.delay(),
            trigger: settings.suggest.trigger,
            words: settings.words.clone(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            trigger: TriggerClass::Standard,
            words: WordRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Text spliced into the buffer.
    pub insert: String,
    /// Text shown in the list row.
    pub label: String,
}

impl Suggestion {
    pub fn new(insert: String) -> Self {
        let label = label_for(&insert);
        Self { insert, label }
    }
}

pub(crate) enum ControllerState {
    Closed,
    Open(OpenList),
}

pub(crate) struct OpenList {
    pub(crate) field: FieldId,
    pub(crate) span: WordSpan,
    /// Buffer the span was located in; the splice is applied to it.
    pub(crate) buffer: String,
    pub(crate) items: Vec<Suggestion>,
    pub(crate) highlighted: Option<usize>,
}

/// Suggestion list action, exactly one per response.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    /// Leave the list as-is.
    Keep,
    /// Render (or re-render) the list under the caret of `field`.
    Show {
        field: FieldId,
        items: Vec<Suggestion>,
        highlighted: Option<usize>,
    },
    /// Move the highlight to this row.
    Highlight(usize),
    /// Clear and hide the list.
    Hide,
}

/// Buffer rewrite the host must apply to `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub field: FieldId,
    pub text: String,
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// When true the host suppresses the key's default behaviour.
    pub consumed: bool,
    pub list: ListAction,
    pub edit: Option<Edit>,
}

impl Response {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            list: ListAction::Keep,
            edit: None,
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    pub(crate) fn with_list(mut self, list: ListAction) -> Self {
        self.list = list;
        self
    }
}

pub(crate) fn triggers_query(class: TriggerClass, key: Key) -> bool {
    match (class, key) {
        (TriggerClass::Standard, Key::Backspace) => true,
        (TriggerClass::Standard, Key::Char(c)) => c.is_ascii_alphabetic() || c == '-' || c == ' ',
        (TriggerClass::Strict, Key::Char(c)) => c.is_ascii_alphabetic() || c == '-',
        _ => false,
    }
}

pub(crate) fn cyclic_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let c = current as i32;
    let n = count as i32;
    ((c + delta + n) % n) as usize
}
