// TUI application state and event handling
use osspulse_core::feed::ProjectPreview;
use osspulse_core::{Event, Project, ProjectStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating results
    Searching, // Typing in the search box
}

/// Lifecycle of the detail overlay
#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Loaded(ProjectPreview),
    Failed(String),
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    /// Live edit buffer; mirrors the store's normalized query
    pub search_input: String,
    pub store: ProjectStore,
    /// Index into the current page, not the whole filtered set
    pub selected: usize,
    pub loading: bool,
    pub error_message: Option<String>,
    pub preview: Option<PreviewState>,
}

impl App {
    pub fn new(store: ProjectStore) -> Self {
        let search_input = store.state.search_query.clone();
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input,
            store,
            selected: 0,
            loading: false,
            error_message: None,
            preview: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        self.search_input = self.store.state.search_query.clone();
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Install a freshly loaded project set and land on a clean slate
    pub fn set_projects(&mut self, projects: Vec<Project>, now: i64) {
        self.store.set_projects(projects, now);
        self.selected = 0;
        self.loading = false;
        self.error_message = None;
    }

    /// Forward a settings mutation to the store, keeping the selection
    /// inside the page that comes back.
    pub fn dispatch(&mut self, event: Event, now: i64) {
        let page_before = self.store.state.current_page;
        self.store.dispatch(event, now);

        if self.store.state.current_page != page_before {
            self.selected = 0;
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.store.current_page().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let len = self.store.current_page().items.len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The project under the cursor on the current page
    pub fn selected_project(&self) -> Option<Project> {
        self.store.current_page().items.get(self.selected).cloned()
    }

    pub fn start_preview(&mut self) {
        self.preview = Some(PreviewState::Loading);
    }

    pub fn set_preview(&mut self, preview: ProjectPreview) {
        self.preview = Some(PreviewState::Loaded(preview));
    }

    pub fn fail_preview(&mut self, message: String) {
        self.preview = Some(PreviewState::Failed(message));
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osspulse_core::{CategoryFilter, TagId};

    const NOW: i64 = 1_700_000_000;

    fn project(id: u64, score: u32) -> Project {
        Project {
            id,
            title: format!("p{}", id),
            text: None,
            url: None,
            score,
            time: NOW - id as i64,
            descendants: None,
            by: None,
            tags: vec![TagId::Web],
        }
    }

    fn app_with(count: usize) -> App {
        let projects = (1..=count as u64).map(|id| project(id, 10)).collect();
        let mut app = App::new(ProjectStore::new());
        app.set_projects(projects, NOW);
        app
    }

    #[test]
    fn test_selection_stays_within_page() {
        let mut app = app_with(3);
        app.select_next();
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 2);

        app.select_previous();
        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_page_change_resets_selection() {
        let mut app = app_with(23);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 2);

        app.dispatch(Event::NextPage, NOW);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_selection_clamps_when_results_shrink() {
        let mut app = app_with(9);
        for _ in 0..8 {
            app.select_next();
        }
        assert_eq!(app.selected, 8);

        app.dispatch(Event::SetSearch("p3".to_string()), NOW);
        assert_eq!(app.store.current_page().items.len(), 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_selected_project_none_when_empty() {
        let mut app = app_with(5);
        app.dispatch(Event::SetSearch("no such project".to_string()), NOW);
        assert!(app.selected_project().is_none());
    }

    #[test]
    fn test_selected_project_tracks_cursor() {
        let mut app = app_with(5);
        app.dispatch(
            Event::SetSortOrder(osspulse_core::SortOrder::Latest),
            NOW,
        );
        app.select_next();
        let first = app.selected_project().unwrap();
        assert_eq!(first.id, app.store.current_page().items[1].id);
    }

    #[test]
    fn test_filter_event_keeps_selection_valid() {
        let mut app = app_with(23);
        app.dispatch(Event::GoToPage(3), NOW);
        app.select_next();

        app.dispatch(Event::SetCategory(CategoryFilter::Popular), NOW);
        assert_eq!(app.store.state.current_page, 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_preview_lifecycle() {
        let mut app = app_with(1);
        assert!(app.preview.is_none());

        app.start_preview();
        assert!(matches!(app.preview, Some(PreviewState::Loading)));

        app.fail_preview("network down".to_string());
        assert!(matches!(app.preview, Some(PreviewState::Failed(_))));

        app.close_preview();
        assert!(app.preview.is_none());
    }

    #[test]
    fn test_search_mode_seeds_buffer_from_state() {
        let mut app = app_with(5);
        app.dispatch(Event::SetSearch("  Rust  ".to_string()), NOW);
        app.enter_search_mode();
        assert_eq!(app.search_input, "rust");
        assert_eq!(app.input_mode, InputMode::Searching);
    }
}
