//! Seams to the host application: the text widget the composer edits, the
//! overlay surface the popup is drawn on, and the session's contextual
//! resources. All traits are object-safe so callers can pass `&mut dyn`.

use std::path::PathBuf;

use crate::model::HighlightedRange;

/// A point in the overlay host's screen coordinate space (terminal cells
/// for the bundled TUI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: u16,
    pub y: u16,
}

/// Width and height of the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlaySize {
    pub width: u16,
    pub height: u16,
}

/// The text input the mention controller observes and mutates.
pub trait TextInputHost {
    /// Full buffer contents.
    fn text(&self) -> &str;

    /// Caret byte offset into `text()`.
    fn caret(&self) -> usize;

    /// Insert plain text at the caret.
    fn insert_plain(&mut self, text: &str);

    /// Insert text at the caret and record it as a mention highlight.
    /// `group_mention` marks a group prefix such as `file:`.
    fn insert_highlighted(&mut self, text: &str, group_mention: bool);

    /// Highlighted mention spans, in insertion order.
    fn highlights(&self) -> &[HighlightedRange];

    /// Drop all mention highlights.
    fn clear_highlights(&mut self);

    /// Clear incidental styling at the given byte offset so typed text does
    /// not inherit formatting from an adjacent highlighted span.
    fn clear_style_at(&mut self, offset: usize);

    /// Give keyboard focus back to the text widget.
    fn request_focus(&mut self);

    /// Screen location of the widget, used to anchor the overlay.
    fn screen_origin(&self) -> ScreenPoint;
}

/// Minimal contract a windowing/overlay layer must provide for the
/// suggestion popup.
pub trait OverlayHost {
    /// Show the surface above the given anchor point.
    fn show_above(&mut self, anchor: ScreenPoint);

    fn set_size(&mut self, size: OverlaySize);

    fn set_location(&mut self, location: ScreenPoint);

    /// Hide the surface. Idempotent.
    fn cancel(&mut self);

    fn is_visible(&self) -> bool;

    /// Give keyboard focus to the overlay's list.
    fn request_focus(&mut self);
}

/// Contextual resources attached from the input during a session: files,
/// a persona, a documentation marker, and the web-search flag.
pub trait ResourceRegistry {
    fn attach_file(&mut self, path: PathBuf);

    fn set_persona(&mut self, name: &str);

    fn set_documentation(&mut self, name: &str);

    fn enable_web_search(&mut self);

    /// Deregister every file attached during this session.
    fn remove_attached_resources(&mut self);

    /// Clear the attached-documentation marker.
    fn clear_documentation_marker(&mut self);
}
