//! Ordering of filtered project lists.
//!
//! Every order sorts descending on its key. The underlying sort is
//! stable, so equal keys keep their incoming relative order and
//! repeated calls on the same input agree.

use std::cmp::Reverse;

use crate::models::Project;
use crate::state::SortOrder;

/// Sort in place by the requested order
pub fn sort_projects(projects: &mut [Project], order: SortOrder) {
    match order {
        SortOrder::Latest => projects.sort_by_key(|p| Reverse(p.time)),
        SortOrder::Popular => projects.sort_by_key(|p| Reverse(p.score)),
        SortOrder::Comments => projects.sort_by_key(|p| Reverse(p.comment_count())),
    }
}
