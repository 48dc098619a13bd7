//! Translates raw key events on the text input into overlay intents.
//!
//! The controller mirrors the three phases a keystroke goes through in the
//! host widget: pressed, typed (after the character landed in the buffer),
//! and released (after the edit is fully applied). It never blocks; every
//! suggestion query it triggers runs on the overlay manager's worker pool.

use crossterm::event::{KeyCode, KeyEvent};

use crate::host::{OverlayHost, ResourceRegistry, TextInputHost};
use crate::model::{EditContext, TextSpan};
use crate::overlay::manager::OverlayManager;

use super::scan::{self, FilterIntent, TRIGGER};

/// Whether the widget should still apply a key's default effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    Pass,
}

/// Keystroke-driven state machine for the mention overlay.
pub struct MentionController<O: OverlayHost> {
    overlay: OverlayManager<O>,
}

impl<O: OverlayHost> MentionController<O> {
    pub fn new(overlay: OverlayManager<O>) -> Self {
        MentionController { overlay }
    }

    pub fn overlay(&self) -> &OverlayManager<O> {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayManager<O> {
        &mut self.overlay
    }

    /// Key-pressed phase. Tab drives the overlay selection and must not
    /// reach the text widget.
    pub fn key_pressed(&mut self, key: KeyEvent) -> KeyDisposition {
        if key.code == KeyCode::Tab {
            self.overlay.request_focus();
            self.overlay.select_next();
            return KeyDisposition::Consumed;
        }
        KeyDisposition::Pass
    }

    /// Key-typed phase. Call after the widget inserted the character.
    ///
    /// A trigger character with no overlay showing opens it anchored at the
    /// caret; any other character while the overlay shows re-runs the
    /// filter scan. Typed characters must not inherit styling from an
    /// adjacent mention span, so the caret style is normalized afterward.
    pub fn char_typed(&mut self, input: &mut dyn TextInputHost, ch: char) {
        if ch == TRIGGER && !self.overlay.is_visible() {
            let caret = input.caret();
            let opened_at = TextSpan::new(caret.saturating_sub(ch.len_utf8()), caret);
            self.overlay.open(input.screen_origin(), opened_at);
            return;
        }
        if self.overlay.is_visible() {
            self.apply_filter(input);
        }
        input.clear_style_at(input.caret());
    }

    /// Key-released phase. Call after the widget applied the edit.
    pub fn key_released(
        &mut self,
        input: &mut dyn TextInputHost,
        resources: &mut dyn ResourceRegistry,
        key: KeyEvent,
    ) -> KeyDisposition {
        // Emptying the buffer is a hard reset, whatever the overlay state.
        if input.text().is_empty() {
            resources.remove_attached_resources();
            resources.clear_documentation_marker();
            input.clear_highlights();
            self.overlay.close();
            return KeyDisposition::Pass;
        }

        if key.code == KeyCode::Backspace {
            let caret = input.caret();
            if self.overlay.trigger_anchor() == Some(TextSpan::new(caret, caret + 1)) {
                // The trigger character itself was deleted.
                self.overlay.close();
                return KeyDisposition::Pass;
            }
            if scan::char_before_caret(input.text(), caret) == Some(TRIGGER) {
                self.overlay.reset(true);
            }
        }

        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.overlay.request_focus();
                self.overlay.select_next();
                KeyDisposition::Consumed
            }
            _ => {
                if self.overlay.is_visible() {
                    self.apply_filter(input);
                }
                KeyDisposition::Pass
            }
        }
    }

    /// Commit the overlay's current selection.
    pub fn commit_selection(
        &mut self,
        input: &mut dyn TextInputHost,
        resources: &mut dyn ResourceRegistry,
    ) {
        let mut ctx = EditContext { input, resources };
        self.overlay.choose_selected(&mut ctx);
    }

    fn apply_filter(&mut self, input: &mut dyn TextInputHost) {
        match scan::filter_intent(input.text()) {
            FilterIntent::CloseOverlay => self.overlay.close(),
            FilterIntent::Query(query) => self.overlay.update(Some(&query)),
            FilterIntent::Stand => {}
        }
    }
}
