//! The web-search toggle shown at the bottom of the default list.

use crate::model::ActionItem;

pub fn web_search_item() -> ActionItem {
    ActionItem::new("Web search", |ctx| ctx.resources.enable_web_search())
}
