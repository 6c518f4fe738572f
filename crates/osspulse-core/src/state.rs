//! Filter settings and the state container driving the pipeline.
//!
//! Every mutation goes through `ProjectStore::dispatch`, which applies
//! the transition and synchronously re-runs filter, sort and the page
//! clamp before returning. Classification never re-runs after ingest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Project, TagId};
use crate::page::{self, Page, PageLayout, PAGE_SIZE};
use crate::{filter, sort, tags};

/// Category tabs; unknown stored values behave as All
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    New,
    Popular,
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::New => "new",
            CategoryFilter::Popular => "popular",
        }
    }

    pub fn parse(s: &str) -> CategoryFilter {
        match s {
            "new" => CategoryFilter::New,
            "popular" => CategoryFilter::Popular,
            _ => CategoryFilter::All,
        }
    }
}

/// How multiple active tags combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagLogic {
    #[default]
    Or,
    And,
}

impl TagLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagLogic::Or => "or",
            TagLogic::And => "and",
        }
    }

    pub fn parse(s: &str) -> TagLogic {
        match s {
            "and" => TagLogic::And,
            _ => TagLogic::Or,
        }
    }
}

/// Result ordering; unknown stored values behave as Latest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Latest,
    Popular,
    Comments,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Popular => "popular",
            SortOrder::Comments => "comments",
        }
    }

    pub fn parse(s: &str) -> SortOrder {
        match s {
            "popular" => SortOrder::Popular,
            "comments" => SortOrder::Comments,
            _ => SortOrder::Latest,
        }
    }
}

/// Presentation layout for the result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn parse(s: &str) -> ViewMode {
        match s {
            "list" => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }
}

/// Ordering of the tag catalog in the sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSortMode {
    #[default]
    Alphabetical,
    Count,
}

impl TagSortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagSortMode::Alphabetical => "alphabetical",
            TagSortMode::Count => "count",
        }
    }

    pub fn parse(s: &str) -> TagSortMode {
        match s {
            "count" => TagSortMode::Count,
            _ => TagSortMode::Alphabetical,
        }
    }

    pub fn toggled(&self) -> TagSortMode {
        match self {
            TagSortMode::Alphabetical => TagSortMode::Count,
            TagSortMode::Count => TagSortMode::Alphabetical,
        }
    }
}

/// The complete set of user-adjustable settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub category: CategoryFilter,
    /// Insertion order preserved for display; not semantically significant
    pub active_tags: Vec<TagId>,
    pub tag_logic: TagLogic,
    /// Normalized: trimmed and lowercased; empty means inactive
    pub search_query: String,
    pub sort_order: SortOrder,
    pub view_mode: ViewMode,
    pub tag_sort_mode: TagSortMode,
    /// 1-based; clamped to `[1, max(1, total_pages)]` after recompute
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: CategoryFilter::default(),
            active_tags: Vec::new(),
            tag_logic: TagLogic::default(),
            search_query: String::new(),
            sort_order: SortOrder::default(),
            view_mode: ViewMode::default(),
            tag_sort_mode: TagSortMode::default(),
            current_page: 1,
        }
    }
}

impl FilterState {
    /// Normalize and install a search query
    pub fn set_search(&mut self, raw: &str) {
        self.search_query = raw.trim().to_lowercase();
    }

    fn toggle_tag(&mut self, tag: TagId) {
        if let Some(pos) = self.active_tags.iter().position(|&t| t == tag) {
            self.active_tags.remove(pos);
        } else {
            self.active_tags.push(tag);
        }
    }
}

/// Settings mutations dispatched from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetCategory(CategoryFilter),
    ToggleTag(TagId),
    SetTagLogic(TagLogic),
    SetSearch(String),
    ClearSearch,
    SetSortOrder(SortOrder),
    SetViewMode(ViewMode),
    ToggleTagSortMode,
    GoToPage(usize),
    NextPage,
    PrevPage,
}

impl Event {
    /// Filter, tag and search inputs send the user back to page 1;
    /// sort-order, view and page navigation do not.
    fn resets_page(&self) -> bool {
        matches!(
            self,
            Event::SetCategory(_)
                | Event::ToggleTag(_)
                | Event::SetTagLogic(_)
                | Event::SetSearch(_)
                | Event::ClearSearch
        )
    }
}

/// The single source of truth: the full project set, the derived
/// filtered set, catalog-wide tag counts and the current settings.
#[derive(Debug)]
pub struct ProjectStore {
    all: Vec<Project>,
    filtered: Vec<Project>,
    tag_counts: HashMap<TagId, usize>,
    pub state: FilterState,
    page_size: usize,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::with_state(FilterState::default())
    }

    pub fn with_state(state: FilterState) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            tag_counts: HashMap::new(),
            state,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Install a freshly fetched project set.
    ///
    /// Tag counts are re-tallied in full over the new set, then the
    /// pipeline runs once against the current settings.
    pub fn set_projects(&mut self, projects: Vec<Project>, now: i64) {
        self.tag_counts = tags::tag_counts(&projects);
        self.all = projects;
        self.recompute(now);
    }

    /// Apply one settings mutation and re-run the pipeline
    pub fn dispatch(&mut self, event: Event, now: i64) {
        let resets_page = event.resets_page();

        match event {
            Event::SetCategory(category) => self.state.category = category,
            Event::ToggleTag(tag) => self.state.toggle_tag(tag),
            Event::SetTagLogic(logic) => self.state.tag_logic = logic,
            Event::SetSearch(raw) => self.state.set_search(&raw),
            Event::ClearSearch => self.state.search_query.clear(),
            Event::SetSortOrder(order) => self.state.sort_order = order,
            Event::SetViewMode(mode) => self.state.view_mode = mode,
            Event::ToggleTagSortMode => {
                self.state.tag_sort_mode = self.state.tag_sort_mode.toggled()
            }
            Event::GoToPage(page) => self.state.current_page = page.max(1),
            Event::NextPage => self.state.current_page += 1,
            Event::PrevPage => {
                self.state.current_page = self.state.current_page.saturating_sub(1).max(1)
            }
        }

        if resets_page {
            self.state.current_page = 1;
        }

        self.recompute(now);
    }

    /// Recompute the filtered set from scratch: filter, sort, clamp.
    ///
    /// Idempotent for a fixed `(all, state, now)`; safe to call after
    /// any mutation.
    pub fn recompute(&mut self, now: i64) {
        let mut filtered = filter::apply(&self.all, &self.state, now);
        sort::sort_projects(&mut filtered, self.state.sort_order);
        self.filtered = filtered;

        let total = self.total_pages();
        self.state.current_page = self.state.current_page.clamp(1, total.max(1));
    }

    pub fn all(&self) -> &[Project] {
        &self.all
    }

    pub fn filtered(&self) -> &[Project] {
        &self.filtered
    }

    /// Counts over the unfiltered set; stable reference totals, not
    /// live result counts.
    pub fn tag_counts(&self) -> &HashMap<TagId, usize> {
        &self.tag_counts
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.filtered.len(), self.page_size)
    }

    /// The current page of results
    pub fn current_page(&self) -> Page {
        page::paginate(&self.filtered, self.state.current_page, self.page_size)
    }

    /// Pagination controls; None when there is at most one page
    pub fn page_layout(&self) -> Option<PageLayout> {
        page::page_layout(self.state.current_page, self.total_pages())
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn project(id: u64, score: u32, tags: Vec<TagId>) -> Project {
        Project {
            id,
            title: format!("p{}", id),
            text: None,
            url: None,
            score,
            time: NOW - id as i64,
            descendants: None,
            by: None,
            tags,
        }
    }

    fn store_with(count: usize) -> ProjectStore {
        let projects = (1..=count as u64).map(|id| project(id, 0, vec![])).collect();
        let mut store = ProjectStore::new();
        store.set_projects(projects, NOW);
        store
    }

    #[test]
    fn test_set_projects_tallies_counts() {
        let projects = vec![
            project(1, 0, vec![TagId::Linux]),
            project(2, 0, vec![TagId::Linux, TagId::Web]),
        ];
        let mut store = ProjectStore::new();
        store.set_projects(projects, NOW);

        assert_eq!(store.tag_counts().get(&TagId::Linux), Some(&2));
        assert_eq!(store.tag_counts().get(&TagId::Web), Some(&1));
        assert_eq!(store.filtered().len(), 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut store = store_with(30);
        store.dispatch(Event::GoToPage(3), NOW);
        assert_eq!(store.state.current_page, 3);

        store.dispatch(Event::SetCategory(CategoryFilter::All), NOW);
        assert_eq!(store.state.current_page, 1);
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut store = store_with(30);
        store.dispatch(Event::NextPage, NOW);
        assert_eq!(store.state.current_page, 2);

        store.dispatch(Event::SetSearch("p1".to_string()), NOW);
        assert_eq!(store.state.current_page, 1);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let mut store = store_with(30);
        store.dispatch(Event::GoToPage(2), NOW);

        store.dispatch(Event::SetSortOrder(SortOrder::Popular), NOW);
        assert_eq!(store.state.current_page, 2);
    }

    #[test]
    fn test_view_change_keeps_page() {
        let mut store = store_with(30);
        store.dispatch(Event::GoToPage(4), NOW);

        store.dispatch(Event::SetViewMode(ViewMode::List), NOW);
        assert_eq!(store.state.current_page, 4);
        assert_eq!(store.state.view_mode, ViewMode::List);
    }

    #[test]
    fn test_page_navigation_clamps_at_bounds() {
        let mut store = store_with(23); // 3 pages

        store.dispatch(Event::PrevPage, NOW);
        assert_eq!(store.state.current_page, 1);

        store.dispatch(Event::GoToPage(3), NOW);
        store.dispatch(Event::NextPage, NOW);
        assert_eq!(store.state.current_page, 3);

        store.dispatch(Event::GoToPage(99), NOW);
        assert_eq!(store.state.current_page, 3);
    }

    #[test]
    fn test_page_clamps_to_one_when_set_empties() {
        let mut store = store_with(30);
        store.dispatch(Event::GoToPage(4), NOW);

        store.dispatch(Event::SetSearch("nothing matches this".to_string()), NOW);
        assert!(store.filtered().is_empty());
        assert_eq!(store.state.current_page, 1);
        assert_eq!(store.total_pages(), 0);
        assert!(store.page_layout().is_none());
    }

    #[test]
    fn test_toggle_tag_preserves_insertion_order() {
        let mut store = ProjectStore::new();
        store.dispatch(Event::ToggleTag(TagId::Web), NOW);
        store.dispatch(Event::ToggleTag(TagId::Linux), NOW);
        assert_eq!(store.state.active_tags, vec![TagId::Web, TagId::Linux]);

        store.dispatch(Event::ToggleTag(TagId::Web), NOW);
        assert_eq!(store.state.active_tags, vec![TagId::Linux]);
    }

    #[test]
    fn test_search_query_is_normalized() {
        let mut store = ProjectStore::new();
        store.dispatch(Event::SetSearch("  Rust CLI  ".to_string()), NOW);
        assert_eq!(store.state.search_query, "rust cli");
    }

    #[test]
    fn test_tag_counts_unaffected_by_filtering() {
        let projects = vec![
            project(1, 80, vec![TagId::Linux]),
            project(2, 5, vec![TagId::Linux]),
        ];
        let mut store = ProjectStore::new();
        store.set_projects(projects, NOW);

        store.dispatch(Event::SetCategory(CategoryFilter::Popular), NOW);
        assert_eq!(store.filtered().len(), 1);
        // Counts keep describing the full set
        assert_eq!(store.tag_counts().get(&TagId::Linux), Some(&2));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut store = store_with(23);
        store.dispatch(Event::SetSortOrder(SortOrder::Latest), NOW);

        let first: Vec<u64> = store.filtered().iter().map(|p| p.id).collect();
        store.recompute(NOW);
        let second: Vec<u64> = store.filtered().iter().map(|p| p.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_current_page_slice() {
        let mut store = store_with(23);
        store.dispatch(Event::SetSortOrder(SortOrder::Popular), NOW);
        store.dispatch(Event::GoToPage(3), NOW);

        let page = store.current_page();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
    }
}
