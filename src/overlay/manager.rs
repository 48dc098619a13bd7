//! Lifecycle and contents of the suggestion overlay.
//!
//! The manager owns the overlay surface, the visible item list, the active
//! group, and the fetch pipeline. All of its state lives on the input
//! thread; worker threads only ever touch the outcome channel.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crate::host::{OverlayHost, ScreenPoint};
use crate::model::{EditContext, GroupItem, SuggestionItem, SuggestionSource, TextSpan};
use crate::util::unicode;

use super::fetch::{self, FetchOutcome, FetchPool};
use super::layout;

const FETCH_WORKERS: usize = 2;

/// Cells added around the widest label: selection marker plus borders.
const ROW_PADDING: u16 = 4;

/// Bookkeeping that exists only while the overlay is showing.
#[derive(Debug)]
pub struct OpenOverlay {
    /// Screen location of the anchor component when the overlay opened.
    anchor: ScreenPoint,
    /// Where in the buffer the trigger character sits.
    opened_at: TextSpan,
    /// Set once a group has been drilled into.
    active_group: Option<GroupItem>,
    items: Vec<SuggestionItem>,
    selected: usize,
}

/// One overlay per input; `Open` carries everything scoped to a showing.
#[derive(Debug, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(OpenOverlay),
}

/// Read-only view of the open overlay, for rendering and assertions.
pub struct OverlayView<'a> {
    pub items: &'a [SuggestionItem],
    pub selected: usize,
}

pub struct OverlayManager<O: OverlayHost> {
    surface: O,
    state: OverlayState,
    defaults: Vec<SuggestionItem>,
    pool: FetchPool,
    results_tx: Sender<FetchOutcome>,
    results_rx: Receiver<FetchOutcome>,
    /// Stamp handed to each dispatched fetch; only a completion carrying
    /// the current stamp may replace the visible list.
    generation: u64,
}

impl<O: OverlayHost> OverlayManager<O> {
    pub fn new(surface: O, defaults: Vec<SuggestionItem>) -> Self {
        let (results_tx, results_rx) = fetch::outcome_channel();
        OverlayManager {
            surface,
            state: OverlayState::Closed,
            defaults,
            pool: FetchPool::new(FETCH_WORKERS),
            results_tx,
            results_rx,
            generation: 0,
        }
    }

    pub fn surface(&self) -> &O {
        &self.surface
    }

    /// Show the overlay above `anchor` with the default list and the first
    /// entry pre-selected. `opened_at` is the trigger character's span.
    pub fn open(&mut self, anchor: ScreenPoint, opened_at: TextSpan) {
        self.state = OverlayState::Open(OpenOverlay {
            anchor,
            opened_at,
            active_group: None,
            items: Vec::new(),
            selected: 0,
        });
        self.surface.show_above(anchor);
        self.reset(true);
        self.surface.request_focus();
    }

    /// Hide the overlay. Idempotent.
    pub fn close(&mut self) {
        self.state = OverlayState::Closed;
        self.surface.cancel();
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Open(_))
    }

    /// The trigger character's span, while the overlay is showing.
    pub fn trigger_anchor(&self) -> Option<TextSpan> {
        match &self.state {
            OverlayState::Open(open) => Some(open.opened_at),
            OverlayState::Closed => None,
        }
    }

    pub fn view(&self) -> Option<OverlayView<'_>> {
        match &self.state {
            OverlayState::Open(open) => Some(OverlayView {
                items: &open.items,
                selected: open.selected,
            }),
            OverlayState::Closed => None,
        }
    }

    pub fn request_focus(&mut self) {
        self.surface.request_focus();
    }

    /// Advance the selection cursor, wrapping past the last entry.
    pub fn select_next(&mut self) {
        if let OverlayState::Open(open) = &mut self.state
            && !open.items.is_empty()
        {
            open.selected = (open.selected + 1) % open.items.len();
        }
    }

    /// Repopulate the visible list with the fixed default entries.
    pub fn reset(&mut self, clear_existing: bool) {
        self.generation = self.generation.wrapping_add(1);
        let defaults = self.defaults.clone();
        if let OverlayState::Open(open) = &mut self.state {
            if clear_existing {
                open.items.clear();
            }
            open.items.extend(defaults);
            open.selected = 0;
            self.relayout();
        }
    }

    /// Re-query the active group with `filter` on the worker pool. Without
    /// an active group the default list stands and nothing is dispatched.
    pub fn update(&mut self, filter: Option<&str>) {
        let source = match &self.state {
            OverlayState::Open(open) => match &open.active_group {
                Some(group) => group.source(),
                None => return,
            },
            OverlayState::Closed => return,
        };
        self.dispatch_fetch(source, filter.map(str::to_string));
    }

    /// Apply any finished fetches. Call from the input thread; returns true
    /// if the visible list changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.results_rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block up to `timeout` for one fetch completion and apply it.
    /// Returns true when an outcome arrived before the deadline, whether or
    /// not it was current enough to change the list.
    pub fn drain_next(&mut self, timeout: Duration) -> bool {
        match self.results_rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.apply(outcome);
                true
            }
            Err(_) => false,
        }
    }

    /// Commit the current selection, if any.
    pub fn choose_selected(&mut self, ctx: &mut EditContext<'_>) {
        let item = match &self.state {
            OverlayState::Open(open) => open.items.get(open.selected).cloned(),
            OverlayState::Closed => None,
        };
        if let Some(item) = item {
            self.on_item_chosen(item, ctx);
        }
    }

    /// Variant dispatch for a chosen item: actions close then fire once,
    /// groups drill in and keep the overlay open.
    pub fn on_item_chosen(&mut self, item: SuggestionItem, ctx: &mut EditContext<'_>) {
        match item {
            SuggestionItem::Action(action) => {
                self.close();
                action.execute(ctx);
            }
            SuggestionItem::Group(group) => self.activate_group(group, ctx),
        }
    }

    fn activate_group(&mut self, group: GroupItem, ctx: &mut EditContext<'_>) {
        let OverlayState::Open(open) = &mut self.state else {
            return;
        };
        open.active_group = Some(group.clone());
        self.dispatch_fetch(group.source(), None);
        ctx.input.insert_highlighted(group.trigger_prefix(), true);
        ctx.input.request_focus();
    }

    fn dispatch_fetch(&mut self, source: Arc<dyn SuggestionSource>, query: Option<String>) {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let tx = self.results_tx.clone();
        self.pool.execute(move || {
            let items = source.fetch(query.as_deref());
            let _ = tx.send(FetchOutcome { generation, items });
        });
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            // A newer keystroke superseded this fetch while it ran.
            return false;
        }
        let OverlayState::Open(open) = &mut self.state else {
            return false;
        };
        open.items = outcome.items;
        open.selected = 0;
        self.relayout();
        true
    }

    /// Re-measure and re-place the surface for the current item count.
    fn relayout(&mut self) {
        let OverlayState::Open(open) = &self.state else {
            return;
        };
        let widest = open
            .items
            .iter()
            .map(|item| unicode::display_width(item.label()))
            .max()
            .unwrap_or(0) as u16;
        let geometry = layout::measure(open.items.len(), widest + ROW_PADDING, open.anchor);
        self.surface.set_size(geometry.size);
        self.surface.set_location(geometry.location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    use pretty_assertions::assert_eq;

    use crate::host::{OverlaySize, TextInputHost};
    use crate::model::{ActionItem, HighlightedRange};
    use crate::session::SessionResources;
    use crate::tui::composer::Composer;

    /// Surface that records every call the manager makes.
    #[derive(Default)]
    struct RecordingSurface {
        visible: bool,
        shown_at: Vec<ScreenPoint>,
        sizes: Vec<OverlaySize>,
        locations: Vec<ScreenPoint>,
        cancels: usize,
        focus_requests: usize,
    }

    impl OverlayHost for RecordingSurface {
        fn show_above(&mut self, anchor: ScreenPoint) {
            self.visible = true;
            self.shown_at.push(anchor);
        }
        fn set_size(&mut self, size: OverlaySize) {
            self.sizes.push(size);
        }
        fn set_location(&mut self, location: ScreenPoint) {
            self.locations.push(location);
        }
        fn cancel(&mut self) {
            self.visible = false;
            self.cancels += 1;
        }
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn request_focus(&mut self) {
            self.focus_requests += 1;
        }
    }

    /// Source serving labels after an optional artificial delay.
    struct Delayed {
        labels: Vec<String>,
        delay: Duration,
        queries: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl SuggestionSource for Delayed {
        fn fetch(&self, query: Option<&str>) -> Vec<SuggestionItem> {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            self.queries
                .lock()
                .unwrap()
                .push(query.map(str::to_string));
            self.labels
                .iter()
                .filter(|l| query.is_none_or(|q| l.contains(q)))
                .map(|l| SuggestionItem::Action(ActionItem::new(l.clone(), |_| {})))
                .collect()
        }
    }

    fn group_with(labels: &[&str], delay: Duration) -> (GroupItem, Arc<Mutex<Vec<Option<String>>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let source = Arc::new(Delayed {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            delay,
            queries: Arc::clone(&queries),
        });
        (GroupItem::new("Files", "file:", source), queries)
    }

    fn defaults() -> Vec<SuggestionItem> {
        let (group, _) = group_with(&["main.rs", "map.md"], Duration::ZERO);
        vec![
            SuggestionItem::Group(group),
            SuggestionItem::Action(ActionItem::new("Web search", |ctx| {
                ctx.resources.enable_web_search();
            })),
            SuggestionItem::Action(ActionItem::new("Noop", |_| {})),
        ]
    }

    fn open_manager() -> OverlayManager<RecordingSurface> {
        let mut manager = OverlayManager::new(RecordingSurface::default(), defaults());
        manager.open(ScreenPoint { x: 2, y: 20 }, TextSpan::new(5, 6));
        manager
    }

    fn labels(manager: &OverlayManager<RecordingSurface>) -> Vec<String> {
        manager
            .view()
            .map(|v| v.items.iter().map(|i| i.label().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn open_shows_defaults_and_preselects_first() {
        let manager = open_manager();
        assert!(manager.is_visible());
        assert!(manager.surface().is_visible());
        assert_eq!(manager.trigger_anchor(), Some(TextSpan::new(5, 6)));
        assert_eq!(labels(&manager), vec!["Files", "Web search", "Noop"]);
        assert_eq!(manager.view().unwrap().selected, 0);
        assert_eq!(manager.surface().shown_at, vec![ScreenPoint { x: 2, y: 20 }]);
        assert_eq!(manager.surface().focus_requests, 1);
    }

    #[test]
    fn close_is_idempotent() {
        let mut manager = open_manager();
        manager.close();
        manager.close();
        assert!(!manager.is_visible());
        assert_eq!(manager.trigger_anchor(), None);
        assert!(manager.view().is_none());
    }

    #[test]
    fn select_next_wraps() {
        let mut manager = open_manager();
        for expected in [1, 2, 0, 1] {
            manager.select_next();
            assert_eq!(manager.view().unwrap().selected, expected);
        }
    }

    #[test]
    fn reset_without_clear_appends() {
        let mut manager = open_manager();
        manager.reset(false);
        assert_eq!(labels(&manager).len(), 6);
        manager.reset(true);
        assert_eq!(labels(&manager).len(), 3);
        assert_eq!(manager.view().unwrap().selected, 0);
    }

    #[test]
    fn relayout_clamps_rows_and_pins_above_anchor() {
        let many: Vec<SuggestionItem> = (0..20)
            .map(|i| SuggestionItem::Action(ActionItem::new(format!("item-{i}"), |_| {})))
            .collect();
        let mut manager = OverlayManager::new(RecordingSurface::default(), many);
        manager.open(ScreenPoint { x: 1, y: 40 }, TextSpan::new(0, 1));

        let size = *manager.surface().sizes.last().unwrap();
        assert_eq!(size.height, 15 + layout::CHROME_ROWS);
        let location = *manager.surface().locations.last().unwrap();
        assert_eq!(location.y, 40 - size.height);

        // Anchored near the top the overlay clamps to row zero.
        manager.open(ScreenPoint { x: 1, y: 3 }, TextSpan::new(0, 1));
        assert_eq!(manager.surface().locations.last().unwrap().y, 0);
    }

    #[test]
    fn choosing_a_group_drills_in() {
        let mut manager = open_manager();
        let mut composer = Composer::new();
        let mut resources = SessionResources::new();
        let mut ctx = EditContext {
            input: &mut composer,
            resources: &mut resources,
        };
        manager.choose_selected(&mut ctx);

        assert!(manager.is_visible());
        assert_eq!(composer.text(), "file:");
        assert_eq!(
            composer.highlights(),
            &[HighlightedRange {
                span: TextSpan::new(0, 5),
                group_mention: true,
            }]
        );

        assert!(manager.drain_next(Duration::from_secs(2)));
        assert_eq!(labels(&manager), vec!["main.rs", "map.md"]);
        assert_eq!(manager.view().unwrap().selected, 0);
    }

    #[test]
    fn choosing_an_action_closes_then_fires() {
        let mut manager = open_manager();
        manager.select_next(); // Web search
        let mut composer = Composer::new();
        let mut resources = SessionResources::new();
        let mut ctx = EditContext {
            input: &mut composer,
            resources: &mut resources,
        };
        manager.choose_selected(&mut ctx);

        assert!(!manager.is_visible());
        assert!(resources.web_search());
    }

    #[test]
    fn an_action_effect_fires_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut manager = OverlayManager::new(
            RecordingSurface::default(),
            vec![SuggestionItem::Action(ActionItem::new("Count", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))],
        );
        manager.open(ScreenPoint { x: 0, y: 10 }, TextSpan::new(0, 1));

        let mut composer = Composer::new();
        let mut resources = SessionResources::new();
        let mut ctx = EditContext {
            input: &mut composer,
            resources: &mut resources,
        };
        manager.choose_selected(&mut ctx);
        // A second commit on the now-closed overlay must do nothing.
        manager.choose_selected(&mut ctx);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_without_group_dispatches_nothing() {
        let mut manager = open_manager();
        manager.update(Some("ma"));
        assert!(!manager.drain_next(Duration::from_millis(100)));
        assert_eq!(labels(&manager), vec!["Files", "Web search", "Noop"]);
    }

    #[test]
    fn stale_fetch_cannot_overwrite_a_newer_one() {
        let (slow_group, _) = group_with(&["stale.rs"], Duration::from_millis(300));
        let (fast_group, _) = group_with(&["fresh.rs"], Duration::ZERO);
        let mut manager = OverlayManager::new(
            RecordingSurface::default(),
            vec![SuggestionItem::Group(slow_group.clone())],
        );
        manager.open(ScreenPoint { x: 0, y: 20 }, TextSpan::new(0, 1));

        let mut composer = Composer::new();
        let mut resources = SessionResources::new();
        let mut ctx = EditContext {
            input: &mut composer,
            resources: &mut resources,
        };
        // Activate the slow group (dispatches its unfiltered fetch), then
        // immediately swap in a fast group and re-query.
        manager.choose_selected(&mut ctx);
        if let OverlayState::Open(open) = &mut manager.state {
            open.active_group = Some(fast_group);
        }
        manager.update(Some("fresh"));

        // Drain until both completions have come back.
        while manager.drain_next(Duration::from_millis(600)) {}
        assert_eq!(labels(&manager), vec!["fresh.rs"]);
    }

    #[test]
    fn empty_fetch_result_is_a_valid_list() {
        let (group, _) = group_with(&[], Duration::ZERO);
        let mut manager =
            OverlayManager::new(RecordingSurface::default(), vec![SuggestionItem::Group(group)]);
        manager.open(ScreenPoint { x: 0, y: 20 }, TextSpan::new(0, 1));

        let mut composer = Composer::new();
        let mut resources = SessionResources::new();
        let mut ctx = EditContext {
            input: &mut composer,
            resources: &mut resources,
        };
        manager.choose_selected(&mut ctx);
        assert!(manager.drain_next(Duration::from_secs(2)));
        assert!(manager.is_visible());
        assert_eq!(labels(&manager), Vec::<String>::new());
    }
}
