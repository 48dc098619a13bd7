//! Overlay surface backed by plain state the renderer reads each frame.

use crate::host::{OverlayHost, OverlaySize, ScreenPoint};

#[derive(Debug, Clone, Default)]
pub struct PopupSurface {
    visible: bool,
    focused: bool,
    anchor: Option<ScreenPoint>,
    size: OverlaySize,
    location: ScreenPoint,
}

impl PopupSurface {
    pub fn new() -> Self {
        PopupSurface::default()
    }

    pub fn size(&self) -> OverlaySize {
        self.size
    }

    pub fn location(&self) -> ScreenPoint {
        self.location
    }

    pub fn anchor(&self) -> Option<ScreenPoint> {
        self.anchor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl OverlayHost for PopupSurface {
    fn show_above(&mut self, anchor: ScreenPoint) {
        self.visible = true;
        self.anchor = Some(anchor);
        // Provisional spot; the first set_location refines it.
        self.location = ScreenPoint {
            x: anchor.x,
            y: anchor.y.saturating_sub(self.size.height),
        };
    }

    fn set_size(&mut self, size: OverlaySize) {
        self.size = size;
    }

    fn set_location(&mut self, location: ScreenPoint) {
        self.location = location;
    }

    fn cancel(&mut self) {
        self.visible = false;
        self.focused = false;
        self.anchor = None;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn request_focus(&mut self) {
        if self.visible {
            self.focused = true;
        }
    }
}
