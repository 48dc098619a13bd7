//! File and folder suggestion groups backed by a shared directory index.
//!
//! The index is built once from a bounded walk of the root and refreshed in
//! the background when the watched tree changes. Fetches only ever read the
//! shared snapshot, so a slow filesystem never stalls a query.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::{ActionItem, SuggestionItem, SuggestionSource};

/// Directories never worth suggesting from.
const SKIP_DIRS: &[&str] = &["target", "node_modules"];

/// Most entries a single fetch will return.
const MAX_RESULTS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to watch directory: {0}")]
    Watch(#[from] notify::Error),
}

#[derive(Debug, Clone)]
struct IndexEntry {
    label: String,
    path: PathBuf,
    is_dir: bool,
}

/// Shared index of paths under a root.
pub struct FileIndex {
    entries: Arc<RwLock<Vec<IndexEntry>>>,
    _watcher: Option<RecommendedWatcher>,
}

impl FileIndex {
    /// Build the index and keep it fresh: any create/modify/remove under
    /// `root` triggers a rescan on the watcher's thread.
    pub fn open(root: &Path, max_depth: usize) -> Result<Self, IndexError> {
        let entries = Arc::new(RwLock::new(scan_tree(root, max_depth)));

        let shared = Arc::clone(&entries);
        let root_owned = root.to_path_buf();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let fresh = scan_tree(&root_owned, max_depth);
                if let Ok(mut slot) = shared.write() {
                    *slot = fresh;
                }
            },
            Config::default(),
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(FileIndex {
            entries,
            _watcher: Some(watcher),
        })
    }

    /// Fixed snapshot of `root` with no background refresh.
    pub fn snapshot(root: &Path, max_depth: usize) -> Self {
        FileIndex {
            entries: Arc::new(RwLock::new(scan_tree(root, max_depth))),
            _watcher: None,
        }
    }

    /// An index with nothing in it.
    pub fn empty() -> Self {
        FileIndex {
            entries: Arc::new(RwLock::new(Vec::new())),
            _watcher: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching(&self, query: Option<&str>, want_dirs: bool) -> Vec<SuggestionItem> {
        let matcher = query.and_then(super::filter_matcher);
        let Ok(entries) = self.entries.read() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|e| e.is_dir == want_dirs)
            .filter(|e| matcher.as_ref().is_none_or(|re| re.is_match(&e.label)))
            .take(MAX_RESULTS)
            .map(mention_item)
            .collect()
    }
}

/// Files under the shared index.
pub struct FileSource {
    index: Arc<FileIndex>,
}

impl FileSource {
    pub fn new(index: Arc<FileIndex>) -> Self {
        FileSource { index }
    }
}

impl SuggestionSource for FileSource {
    fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem> {
        self.index.matching(query, false)
    }
}

/// Directories under the shared index.
pub struct FolderSource {
    index: Arc<FileIndex>,
}

impl FolderSource {
    pub fn new(index: Arc<FileIndex>) -> Self {
        FolderSource { index }
    }
}

impl SuggestionSource for FolderSource {
    fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem> {
        self.index.matching(query, true)
    }
}

/// Choosing an entry inserts its label as a highlighted mention and
/// attaches the path to the session resources.
fn mention_item(entry: &IndexEntry) -> SuggestionItem {
    let label = entry.label.clone();
    let insert = entry.label.clone();
    let path = entry.path.clone();
    SuggestionItem::Action(ActionItem::new(label, move |ctx| {
        ctx.input.insert_highlighted(&insert, false);
        ctx.resources.attach_file(path.clone());
    }))
}

fn scan_tree(root: &Path, max_depth: usize) -> Vec<IndexEntry> {
    let mut entries = Vec::new();
    walk(root, root, 0, max_depth, &mut entries);
    entries.sort_by(|a, b| a.label.cmp(&b.label));
    entries
}

fn walk(root: &Path, dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<IndexEntry>) {
    if depth > max_depth {
        return;
    }
    // Unreadable directories are skipped, not surfaced.
    let Ok(read) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || SKIP_DIRS.contains(&name) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let label = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        if file_type.is_dir() {
            out.push(IndexEntry {
                label,
                path: path.clone(),
                is_dir: true,
            });
            walk(root, &path, depth + 1, max_depth, out);
        } else if file_type.is_file() {
            out.push(IndexEntry {
                label,
                path,
                is_dir: false,
            });
        }
    }
}
