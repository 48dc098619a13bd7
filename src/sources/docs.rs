//! Documentation suggestion group, loaded from an ordered JSON registry.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::{ActionItem, SuggestionItem, SuggestionSource};

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid docs registry {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Name → URL documentation entries, kept in file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocRegistry {
    #[serde(default)]
    docs: IndexMap<String, String>,
}

impl DocRegistry {
    pub fn load(path: &Path) -> Result<Self, DocsError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DocsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fallback entries used when no registry file is configured.
    pub fn builtin() -> Self {
        let docs = IndexMap::from([
            ("rust std".to_string(), "https://doc.rust-lang.org/std/".to_string()),
            ("ratatui".to_string(), "https://docs.rs/ratatui/".to_string()),
            ("crossterm".to_string(), "https://docs.rs/crossterm/".to_string()),
        ]);
        DocRegistry { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl SuggestionSource for DocRegistry {
    fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem> {
        let matcher = query.and_then(super::filter_matcher);
        self.docs
            .keys()
            .filter(|name| matcher.as_ref().is_none_or(|re| re.is_match(name)))
            .map(|name| {
                let name = name.clone();
                let insert = name.clone();
                SuggestionItem::Action(ActionItem::new(name, move |ctx| {
                    ctx.input.insert_highlighted(&insert, false);
                    ctx.resources.set_documentation(&insert);
                }))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn loads_registry_preserving_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(
            &path,
            r#"{"docs": {"zlib": "https://z", "alpha": "https://a"}}"#,
        )
        .unwrap();

        let registry = DocRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        let fetched = registry.fetch(None);
        let labels: Vec<&str> = fetched.iter().map(|i| i.label()).collect();
        assert_eq!(labels, vec!["zlib", "alpha"]);
    }

    #[test]
    fn load_surfaces_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            DocRegistry::load(&path),
            Err(DocsError::Parse { .. })
        ));
    }

    #[test]
    fn fetch_filters_by_name() {
        let registry = DocRegistry::builtin();
        let filtered = registry.fetch(Some("rata"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].label(), "ratatui");
    }
}
