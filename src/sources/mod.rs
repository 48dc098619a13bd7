//! Concrete suggestion sources behind the default overlay groups.

pub mod docs;
pub mod file;
pub mod persona;
pub mod web;

use std::sync::Arc;

use regex::Regex;

use crate::model::{GroupItem, SuggestionItem};

use self::docs::DocRegistry;
use self::file::{FileIndex, FileSource, FolderSource};
use self::persona::PersonaBook;

/// Assemble the fixed top-level list: files, folders, personas,
/// documentation, then the web-search toggle.
pub fn default_items(
    index: Arc<FileIndex>,
    personas: Arc<PersonaBook>,
    docs: Arc<DocRegistry>,
) -> Vec<SuggestionItem> {
    vec![
        SuggestionItem::Group(GroupItem::new(
            "Files",
            "file:",
            Arc::new(FileSource::new(Arc::clone(&index))),
        )),
        SuggestionItem::Group(GroupItem::new(
            "Folders",
            "folder:",
            Arc::new(FolderSource::new(index)),
        )),
        SuggestionItem::Group(GroupItem::new("Personas", "persona:", personas)),
        SuggestionItem::Group(GroupItem::new("Docs", "docs:", docs)),
        SuggestionItem::Action(web::web_search_item()),
    ]
}

/// Case-insensitive substring matcher for user-typed filter text.
pub(crate) fn filter_matcher(query: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_fixed() {
        let index = Arc::new(FileIndex::empty());
        let items = default_items(
            index,
            Arc::new(PersonaBook::builtin()),
            Arc::new(DocRegistry::builtin()),
        );
        let labels: Vec<&str> = items.iter().map(|i| i.label()).collect();
        assert_eq!(
            labels,
            vec!["Files", "Folders", "Personas", "Docs", "Web search"]
        );
    }

    #[test]
    fn matcher_ignores_case_and_escapes() {
        let re = filter_matcher("Ma.RS").unwrap();
        assert!(re.is_match("ma.rs"));
        assert!(!re.is_match("mars")); // the dot is literal
    }
}
