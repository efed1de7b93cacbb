//! Contracts the host editor implements.

use tag_session::placement::{Anchor, FieldGeometry};
use tag_session::Suggestion;

/// A multi-line text input the session is attached to.
pub trait TextSurface {
    fn text(&self) -> String;
    /// Byte offset of the caret.
    fn caret(&self) -> usize;
    fn set_text(&mut self, text: &str);
    fn set_caret(&mut self, caret: usize);
    /// Tell the host the content changed programmatically (so its own input
    /// listeners and bindings see the new value).
    fn notify_changed(&mut self);
    fn geometry(&self) -> FieldGeometry;
}

/// Resolves configured field ids to surfaces. Ids missing from the current
/// document return `None`.
pub trait SurfaceHost {
    fn lookup(&self, id: &str) -> Option<Box<dyn TextSurface>>;
}

/// Suggestion list rendering and user notification.
pub trait HostUi {
    fn render_list(&mut self, items: &[Suggestion], highlighted: Option<usize>, anchor: Anchor);
    fn highlight(&mut self, index: usize);
    fn clear(&mut self);
    /// One-time user-visible message (dictionary load failure).
    fn alert(&mut self, message: &str);
}
