// UI rendering logic
use crate::{App, InputMode, PreviewState};
use osspulse_core::feed::ProjectPreview;
use osspulse_core::models::{tag_definition, Project};
use osspulse_core::{tags, CategoryFilter, PageButton, SortOrder, TagLogic, ViewMode, TAG_CATALOG};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search_input(frame, app, chunks[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28), // Tag sidebar
            Constraint::Min(30),    // Results
        ])
        .split(chunks[2]);

    render_tag_sidebar(frame, app, content_chunks[0]);
    render_results(frame, app, content_chunks[1]);

    render_pagination(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if app.preview.is_some() {
        render_preview_overlay(frame, app, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled(
        "⚡ OSS Pulse",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(logo, header_chunks[0]);

    // Category tabs
    let mut tab_spans = Vec::new();
    for (i, category) in [
        CategoryFilter::All,
        CategoryFilter::New,
        CategoryFilter::Popular,
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            tab_spans.push(Span::raw(" | "));
        }
        let label = match category {
            CategoryFilter::All => "All",
            CategoryFilter::New => "New",
            CategoryFilter::Popular => "Popular",
        };
        let style = if app.store.state.category == category {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        tab_spans.push(Span::styled(format!(" {} ", label), style));
    }

    let tabs = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(tabs, header_chunks[1]);

    let sort_label = match app.store.state.sort_order {
        SortOrder::Latest => "latest",
        SortOrder::Popular => "popular",
        SortOrder::Comments => "comments",
    };
    let stats = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} ", app.store.filtered().len()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("of {} | sort: {}", app.store.all().len(), sort_label)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Right);
    frame.render_widget(stats, header_chunks[2]);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default(),
    };

    let title = match app.input_mode {
        InputMode::Searching => "Search (Enter done, Esc clear)",
        InputMode::Normal => "Search (press /)",
    };

    let input = Paragraph::new(app.search_input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn render_tag_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.store.tag_counts();
    let catalog = tags::sorted_catalog(app.store.state.tag_sort_mode, counts);

    let items: Vec<ListItem> = catalog
        .iter()
        .map(|def| {
            let active = app.store.state.active_tags.contains(&def.id);
            let count = counts.get(&def.id).copied().unwrap_or(0);
            let digit = TAG_CATALOG
                .iter()
                .position(|d| d.id == def.id)
                .map(|i| i + 1)
                .unwrap_or(0);

            let marker = if active { "●" } else { "○" };
            let style = if active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(format!("{} {} ", def.icon, def.name), style),
                Span::styled(format!("({})", count), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("  [{}]", digit), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let logic_label = match app.store.state.tag_logic {
        TagLogic::Or => "any",
        TagLogic::And => "all",
    };
    let title = format!("Tags (match {})", logic_label);

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.loading {
        let loading = Paragraph::new("Loading feed...")
            .block(Block::default().borders(Borders::ALL).title("Projects"))
            .alignment(Alignment::Center);
        frame.render_widget(loading, area);
        return;
    }

    let page = app.store.current_page();
    if page.items.is_empty() {
        let empty = Paragraph::new("No projects match the current filters")
            .block(Block::default().borders(Borders::ALL).title("Projects"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    match app.store.state.view_mode {
        ViewMode::List => render_results_list(frame, app, &page.items, area),
        ViewMode::Grid => render_results_grid(frame, app, &page.items, area),
    }
}

fn render_results_list(frame: &mut Frame, app: &App, projects: &[Project], area: Rect) {
    let now = chrono::Utc::now().timestamp();

    let items: Vec<ListItem> = projects
        .iter()
        .map(|project| {
            let mut spans = vec![
                Span::styled(
                    project.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("▲{}", project.score),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" 💬{}", project.comment_count())),
                Span::styled(
                    format!("  {}", time_ago(now, project.time)),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            for &tag in &project.tags {
                spans.push(Span::raw(format!(" {}", tag_definition(tag).icon)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Projects"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_results_grid(frame: &mut Frame, app: &App, projects: &[Project], area: Rect) {
    const COLUMNS: usize = 3;
    let now = chrono::Utc::now().timestamp();

    let outer = Block::default().borders(Borders::ALL).title("Projects");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let row_count = projects.len().div_ceil(COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Ratio(1, row_count as u32);
            row_count
        ])
        .split(inner);

    for (row_index, chunk) in projects.chunks(COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, COLUMNS as u32),
                Constraint::Ratio(1, COLUMNS as u32),
                Constraint::Ratio(1, COLUMNS as u32),
            ])
            .split(rows[row_index]);

        for (col_index, project) in chunk.iter().enumerate() {
            let index = row_index * COLUMNS + col_index;
            let selected = index == app.selected;

            let border_style = if selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let mut tag_spans = Vec::new();
            for &tag in &project.tags {
                tag_spans.push(Span::raw(format!("{} ", tag_definition(tag).icon)));
            }

            let lines = vec![
                Line::from(Span::styled(
                    format!("▲{}  💬{}", project.score, project.comment_count()),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    time_ago(now, project.time),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(tag_spans),
            ];

            let card = Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style)
                        .title(Span::styled(
                            truncate(&project.title, cells[col_index].width as usize),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(card, cells[col_index]);
        }
    }
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let Some(layout) = app.store.page_layout() else {
        return;
    };

    let mut spans = Vec::new();

    let prev_style = if layout.prev_enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled("‹ Prev ", prev_style));

    for button in &layout.buttons {
        match button {
            PageButton::Number { page, current } => {
                let style = if *current {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                spans.push(Span::styled(format!(" {} ", page), style));
            }
            PageButton::Ellipsis => spans.push(Span::raw(" … ")),
        }
    }

    let next_style = if layout.next_enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(" Next ›", next_style));

    let bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(bar, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.error_message {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))
    } else {
        let hints = match app.input_mode {
            InputMode::Searching => "Enter done | Esc clear search".to_string(),
            InputMode::Normal => {
                "q quit | / search | j/k select | h/l page | f category | s sort | o any/all | \
                 v view | t tag order | 1-6 tags | Enter preview | r reload"
                    .to_string()
            }
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_preview_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(80, 80, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Preview (Esc to close)")
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match &app.preview {
        Some(PreviewState::Loading) => vec![Line::from("Loading preview...")],
        Some(PreviewState::Failed(message)) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        Some(PreviewState::Loaded(preview)) => preview_lines(preview),
        None => Vec::new(),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

fn preview_lines(preview: &ProjectPreview) -> Vec<Line<'static>> {
    let now = chrono::Utc::now().timestamp();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        preview.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));

    let by = preview.by.as_deref().unwrap_or("unknown");
    lines.push(Line::from(Span::styled(
        format!(
            "▲{}  💬{}  by {}  {}",
            preview.score,
            preview.descendants.unwrap_or(0),
            by,
            time_ago(now, preview.time)
        ),
        Style::default().fg(Color::DarkGray),
    )));

    if let Some(url) = &preview.url {
        lines.push(Line::from(Span::styled(
            url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }

    if !preview.tags.is_empty() {
        let mut spans = vec![Span::raw("Tags: ")];
        for &tag in &preview.tags {
            let def = tag_definition(tag);
            spans.push(Span::raw(format!("{} {}  ", def.icon, def.name)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(text) = &preview.text {
        lines.push(Line::from(""));
        for paragraph in clean_text(text).split("\n\n") {
            lines.push(Line::from(paragraph.to_string()));
        }
    }

    lines.push(Line::from(""));
    if preview.comments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments yet",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Top comments",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for comment in &preview.comments {
            let author = comment.by.as_deref().unwrap_or("unknown");
            lines.push(Line::from(Span::styled(
                format!("─ {} · {}", author, time_ago(now, comment.time)),
                Style::default().fg(Color::Green),
            )));
            if let Some(text) = &comment.text {
                lines.push(Line::from(clean_text(text)));
            }
            lines.push(Line::from(""));
        }
    }

    lines
}

/// Centered popup rect as a percentage of the containing area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Strip the HTML markup the item API embeds in text bodies, keeping
/// paragraph breaks readable in the terminal.
fn clean_text(raw: &str) -> String {
    let with_breaks = raw.replace("<p>", "\n\n");

    let mut out = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

fn time_ago(now: i64, time: i64) -> String {
    let elapsed = (now - time).max(0);
    if elapsed < 60 {
        "just now".to_string()
    } else if elapsed < 3600 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h ago", elapsed / 3600)
    } else {
        format!("{}d ago", elapsed / 86_400)
    }
}
