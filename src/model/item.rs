//! The two kinds of entries a suggestion overlay can list: immediate
//! actions and drill-down groups.

use std::fmt;
use std::sync::Arc;

use crate::host::{ResourceRegistry, TextInputHost};

/// What an action sees when it executes: the input widget and the
/// session's contextual resources.
pub struct EditContext<'a> {
    pub input: &'a mut dyn TextInputHost,
    pub resources: &'a mut dyn ResourceRegistry,
}

type ActionFn = Arc<dyn Fn(&mut EditContext<'_>) + Send + Sync>;

/// A leaf suggestion. Choosing it closes the overlay and runs its effect
/// exactly once.
#[derive(Clone)]
pub struct ActionItem {
    label: String,
    effect: ActionFn,
}

impl ActionItem {
    pub fn new(
        label: impl Into<String>,
        effect: impl Fn(&mut EditContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        ActionItem {
            label: label.into(),
            effect: Arc::new(effect),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn execute(&self, ctx: &mut EditContext<'_>) {
        (self.effect)(ctx);
    }
}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A drill-down suggestion. Choosing it keeps the overlay open and swaps
/// the list for the group's own items.
#[derive(Clone)]
pub struct GroupItem {
    label: String,
    trigger_prefix: String,
    source: Arc<dyn SuggestionSource>,
}

impl GroupItem {
    pub fn new(
        label: impl Into<String>,
        trigger_prefix: impl Into<String>,
        source: Arc<dyn SuggestionSource>,
    ) -> Self {
        GroupItem {
            label: label.into(),
            trigger_prefix: trigger_prefix.into(),
            source,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Inserted into the input when the group is chosen, e.g. `file:`.
    pub fn trigger_prefix(&self) -> &str {
        &self.trigger_prefix
    }

    pub fn source(&self) -> Arc<dyn SuggestionSource> {
        Arc::clone(&self.source)
    }
}

impl fmt::Debug for GroupItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupItem")
            .field("label", &self.label)
            .field("trigger_prefix", &self.trigger_prefix)
            .finish_non_exhaustive()
    }
}

/// One entry in the overlay list.
#[derive(Debug, Clone)]
pub enum SuggestionItem {
    Action(ActionItem),
    Group(GroupItem),
}

impl SuggestionItem {
    pub fn label(&self) -> &str {
        match self {
            SuggestionItem::Action(action) => action.label(),
            SuggestionItem::Group(group) => group.label(),
        }
    }
}

/// A queryable provider of suggestion items.
///
/// `fetch` runs on a worker thread and must not touch UI state. Returned
/// items carry no identity across calls; a refetch may produce an entirely
/// new set. An empty result is an empty list, not an error.
pub trait SuggestionSource: Send + Sync {
    /// Items matching `query`, or the unfiltered listing for `None`.
    fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem>;

    /// The group's unfiltered listing.
    fn list_default_items(&self) -> Vec<SuggestionItem> {
        self.fetch(None)
    }
}
