//! Deterministic page windowing.
//!
//! `paginate` slices the filtered list; `page_layout` computes the
//! page-button row shown under it: a window of at most five numbered
//! buttons centered on the current page, with the first and last pages
//! pinned outside the window and ellipsis markers over any gaps.

use crate::models::Project;

/// Projects shown per page
pub const PAGE_SIZE: usize = 9;

/// Numbered buttons visible in the window
const MAX_VISIBLE_PAGES: usize = 5;

/// One page of results
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Project>,
    /// The page actually sliced, after clamping
    pub page: usize,
    pub total_pages: usize,
}

/// One entry in the page-button row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Number { page: usize, current: bool },
    Ellipsis,
}

/// The rendered pagination row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub buttons: Vec<PageButton>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Total page count; 0 when the list is empty
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

/// Slice one page out of the filtered list.
///
/// The requested page is clamped to `[1, max(1, total_pages)]` before
/// slicing, so out-of-range requests land on a real page.
pub fn paginate(projects: &[Project], page: usize, page_size: usize) -> Page {
    let total = total_pages(projects.len(), page_size);
    let page = page.clamp(1, total.max(1));

    let start = (page - 1) * page_size;
    let end = (page * page_size).min(projects.len());
    let items = if start < projects.len() {
        projects[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        total_pages: total,
    }
}

/// Compute the page-button row; None means no controls are rendered
pub fn page_layout(current: usize, total: usize) -> Option<PageLayout> {
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    // Re-clamp downward when the window runs short at the end
    if end - start + 1 < MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }

    let mut buttons = Vec::new();

    if start > 1 {
        buttons.push(PageButton::Number {
            page: 1,
            current: false,
        });
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }

    for page in start..=end {
        buttons.push(PageButton::Number {
            page,
            current: page == current,
        });
    }

    if end < total {
        if end < total - 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Number {
            page: total,
            current: false,
        });
    }

    Some(PageLayout {
        buttons,
        prev_enabled: current > 1,
        next_enabled: current < total,
    })
}
