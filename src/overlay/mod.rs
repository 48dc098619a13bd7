pub mod fetch;
pub mod layout;
pub mod manager;

pub use manager::{OverlayManager, OverlayState, OverlayView};
