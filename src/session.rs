//! Contextual resources attached from the composer during a session.

use std::path::PathBuf;

use crate::host::ResourceRegistry;

#[derive(Debug, Clone, Default)]
pub struct SessionResources {
    attached_files: Vec<PathBuf>,
    persona: Option<String>,
    documentation: Option<String>,
    web_search: bool,
}

impl SessionResources {
    pub fn new() -> Self {
        SessionResources::default()
    }

    pub fn attached_files(&self) -> &[PathBuf] {
        &self.attached_files
    }

    pub fn persona(&self) -> Option<&str> {
        self.persona.as_deref()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn web_search(&self) -> bool {
        self.web_search
    }
}

impl ResourceRegistry for SessionResources {
    fn attach_file(&mut self, path: PathBuf) {
        if !self.attached_files.contains(&path) {
            self.attached_files.push(path);
        }
    }

    fn set_persona(&mut self, name: &str) {
        self.persona = Some(name.to_string());
    }

    fn set_documentation(&mut self, name: &str) {
        self.documentation = Some(name.to_string());
    }

    fn enable_web_search(&mut self) {
        self.web_search = true;
    }

    fn remove_attached_resources(&mut self) {
        self.attached_files.clear();
    }

    fn clear_documentation_marker(&mut self) {
        self.documentation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attach_deduplicates() {
        let mut resources = SessionResources::new();
        resources.attach_file(PathBuf::from("a.rs"));
        resources.attach_file(PathBuf::from("a.rs"));
        resources.attach_file(PathBuf::from("b.rs"));
        assert_eq!(resources.attached_files().len(), 2);
    }

    #[test]
    fn reset_clears_files_and_marker_but_not_persona() {
        let mut resources = SessionResources::new();
        resources.attach_file(PathBuf::from("a.rs"));
        resources.set_documentation("ratatui");
        resources.set_persona("Reviewer");
        resources.enable_web_search();

        resources.remove_attached_resources();
        resources.clear_documentation_marker();

        assert!(resources.attached_files().is_empty());
        assert_eq!(resources.documentation(), None);
        assert_eq!(resources.persona(), Some("Reviewer"));
        assert!(resources.web_search());
    }
}
