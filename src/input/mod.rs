pub mod controller;
pub mod scan;

pub use controller::{KeyDisposition, MentionController};
pub use scan::{GROUP_SEPARATOR, TRIGGER};
