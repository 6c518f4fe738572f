// TUI event loop and terminal management
use crate::{App, InputMode};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::warn;

use osspulse_api::HnClient;
use osspulse_core::{
    feed, prefs, CategoryFilter, Config, Event, FilterState, ProjectStore, SortOrder, TagId,
    TagLogic, ViewMode, TAG_CATALOG,
};
use osspulse_store::SettingsStore;

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Write the durable settings back; a failed save never interrupts the
/// session.
fn persist(settings: &SettingsStore, state: &FilterState) {
    if let Err(e) = prefs::save_filter_state(settings, state) {
        warn!("Failed to persist settings: {}", e);
    }
}

fn next_category(current: CategoryFilter) -> CategoryFilter {
    match current {
        CategoryFilter::All => CategoryFilter::New,
        CategoryFilter::New => CategoryFilter::Popular,
        CategoryFilter::Popular => CategoryFilter::All,
    }
}

fn next_sort(current: SortOrder) -> SortOrder {
    match current {
        SortOrder::Latest => SortOrder::Popular,
        SortOrder::Popular => SortOrder::Comments,
        SortOrder::Comments => SortOrder::Latest,
    }
}

/// Number keys 1..=6 map to the catalog in its declaration order
fn tag_for_digit(c: char) -> Option<TagId> {
    let index = c.to_digit(10)? as usize;
    if index == 0 {
        return None;
    }
    TAG_CATALOG.get(index - 1).map(|def| def.id)
}

async fn load_feed(app: &mut App, client: &HnClient, limit: usize) {
    app.loading = true;
    match feed::load_projects(client, limit).await {
        Ok(projects) => {
            app.set_projects(projects, now());
        }
        Err(e) => {
            app.loading = false;
            app.error_message = Some(format!("Feed load failed: {} (press r to retry)", e));
        }
    }
}

pub async fn run_tui(config: Config, settings: SettingsStore) -> anyhow::Result<()> {
    let client = HnClient::with_base_url(config.api.base_url.clone());

    // Restore the last session's settings; a broken store means defaults
    let state = prefs::load_filter_state(&settings).unwrap_or_else(|e| {
        warn!("Failed to load saved settings: {}", e);
        FilterState::default()
    });
    let store = ProjectStore::with_state(state).with_page_size(config.feed.page_size);
    let mut app = App::new(store);

    load_feed(&mut app, &client, config.feed.limit).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.ui.mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    loop {
        terminal.draw(|f| crate::ui::render(f, &mut app))?;

        if let TermEvent::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match app.input_mode {
                    InputMode::Searching => match key.code {
                        KeyCode::Char(c) => {
                            app.search_input.push(c);
                            app.dispatch(Event::SetSearch(app.search_input.clone()), now());
                        }
                        KeyCode::Backspace => {
                            app.search_input.pop();
                            app.dispatch(Event::SetSearch(app.search_input.clone()), now());
                        }
                        KeyCode::Enter => {
                            app.enter_normal_mode();
                        }
                        KeyCode::Esc => {
                            app.search_input.clear();
                            app.dispatch(Event::ClearSearch, now());
                            app.enter_normal_mode();
                        }
                        _ => {}
                    },
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => {
                            break;
                        }
                        KeyCode::Char('/') => {
                            app.close_preview();
                            app.enter_search_mode();
                        }
                        KeyCode::Char('j') | KeyCode::Down => {
                            app.select_next();
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            app.select_previous();
                        }
                        KeyCode::Char('h') | KeyCode::Left => {
                            app.dispatch(Event::PrevPage, now());
                        }
                        KeyCode::Char('l') | KeyCode::Right => {
                            app.dispatch(Event::NextPage, now());
                        }
                        KeyCode::Char('f') => {
                            let next = next_category(app.store.state.category);
                            app.dispatch(Event::SetCategory(next), now());
                            persist(&settings, &app.store.state);
                        }
                        KeyCode::Char('o') => {
                            let next = match app.store.state.tag_logic {
                                TagLogic::Or => TagLogic::And,
                                TagLogic::And => TagLogic::Or,
                            };
                            app.dispatch(Event::SetTagLogic(next), now());
                            persist(&settings, &app.store.state);
                        }
                        KeyCode::Char('s') => {
                            let next = next_sort(app.store.state.sort_order);
                            app.dispatch(Event::SetSortOrder(next), now());
                            persist(&settings, &app.store.state);
                        }
                        KeyCode::Char('v') => {
                            let next = match app.store.state.view_mode {
                                ViewMode::Grid => ViewMode::List,
                                ViewMode::List => ViewMode::Grid,
                            };
                            app.dispatch(Event::SetViewMode(next), now());
                            persist(&settings, &app.store.state);
                        }
                        KeyCode::Char('t') => {
                            app.dispatch(Event::ToggleTagSortMode, now());
                            persist(&settings, &app.store.state);
                        }
                        KeyCode::Char(c @ '1'..='6') => {
                            if let Some(tag) = tag_for_digit(c) {
                                app.dispatch(Event::ToggleTag(tag), now());
                                persist(&settings, &app.store.state);
                            }
                        }
                        KeyCode::Char('r') => {
                            app.close_preview();
                            load_feed(&mut app, &client, config.feed.limit).await;
                        }
                        KeyCode::Enter => {
                            if app.preview.is_none() {
                                if let Some(project) = app.selected_project() {
                                    app.start_preview();
                                    match feed::load_preview(&client, project.id).await {
                                        Ok(preview) => app.set_preview(preview),
                                        Err(e) => {
                                            app.fail_preview(format!("Preview failed: {}", e))
                                        }
                                    }
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.preview.is_some() {
                                app.close_preview();
                            } else {
                                app.error_message = None;
                            }
                        }
                        _ => {}
                    },
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    if config.ui.mouse_enabled {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    Ok(())
}
