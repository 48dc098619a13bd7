pub mod item;
pub mod span;

pub use item::{ActionItem, EditContext, GroupItem, SuggestionItem, SuggestionSource};
pub use span::{HighlightedRange, TextSpan};
