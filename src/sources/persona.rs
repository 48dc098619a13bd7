//! Persona suggestion group, loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{ActionItem, SuggestionItem, SuggestionSource};

#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid persona file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub prompt: String,
}

/// The set of personas the persona group suggests from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaBook {
    #[serde(default)]
    personas: Vec<Persona>,
}

impl PersonaBook {
    pub fn load(path: &Path) -> Result<Self, PersonaError> {
        let content = std::fs::read_to_string(path).map_err(|source| PersonaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| PersonaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fallback set used when no persona file is configured.
    pub fn builtin() -> Self {
        let personas = [
            ("Default", "You are a helpful assistant."),
            ("Reviewer", "You review code for correctness and clarity."),
            ("Architect", "You weigh design trade-offs before details."),
        ]
        .into_iter()
        .map(|(name, prompt)| Persona {
            name: name.to_string(),
            prompt: prompt.to_string(),
        })
        .collect();
        PersonaBook { personas }
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }
}

impl SuggestionSource for PersonaBook {
    fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem> {
        let matcher = query.and_then(super::filter_matcher);
        self.personas
            .iter()
            .filter(|p| matcher.as_ref().is_none_or(|re| re.is_match(&p.name)))
            .map(|p| {
                let name = p.name.clone();
                SuggestionItem::Action(ActionItem::new(p.name.clone(), move |ctx| {
                    ctx.input.insert_highlighted(&name, false);
                    ctx.resources.set_persona(&name);
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
    fn loads_personas_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personas.toml");
        fs::write(
            &path,
            r#"
[[personas]]
name = "Tester"
prompt = "You write tests first."

[[personas]]
name = "Minimalist"
"#,
        )
        .unwrap();

        let book = PersonaBook::load(&path).unwrap();
        assert_eq!(book.personas().len(), 2);
        assert_eq!(book.personas()[0].name, "Tester");
        assert_eq!(book.personas()[1].prompt, "");
    }

    #[test]
    fn load_surfaces_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personas.toml");
        fs::write(&path, "personas = 3").unwrap();
        assert!(matches!(
            PersonaBook::load(&path),
            Err(PersonaError::Parse { .. })
        ));
    }

    #[test]
    fn fetch_filters_by_name() {
        let book = PersonaBook::builtin();
        let all = book.fetch(None);
        assert_eq!(all.len(), 3);
        let filtered = book.fetch(Some("rev"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].label(), "Reviewer");
    }
}
