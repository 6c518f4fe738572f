//! The three-stage filter: category, then tags, then free-text search.
//!
//! Stages run in fixed order and each one narrows the previous output,
//! so the overall semantics are a strict conjunction even though the
//! tag stage can be OR-like internally.

use crate::models::{Project, TagId};
use crate::state::{CategoryFilter, FilterState, TagLogic};

/// Seconds in a day; the cutoff for the "new" category
const NEW_CUTOFF_SECS: i64 = 86_400;

/// Minimum score for the "popular" category
const POPULAR_MIN_SCORE: u32 = 50;

/// Apply the current filter settings to the full set.
///
/// Pure with respect to its inputs; `now` is passed explicitly so the
/// category stage doesn't reach for the wall clock.
pub fn apply(all: &[Project], state: &FilterState, now: i64) -> Vec<Project> {
    let mut filtered: Vec<Project> = all
        .iter()
        .filter(|project| passes_category(project, state.category, now))
        .cloned()
        .collect();

    if !state.active_tags.is_empty() {
        filtered.retain(|project| passes_tags(project, &state.active_tags, state.tag_logic));
    }

    if !state.search_query.is_empty() {
        filtered.retain(|project| passes_search(project, &state.search_query));
    }

    filtered
}

fn passes_category(project: &Project, category: CategoryFilter, now: i64) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::New => now - project.time < NEW_CUTOFF_SECS,
        CategoryFilter::Popular => project.score >= POPULAR_MIN_SCORE,
    }
}

fn passes_tags(project: &Project, active: &[TagId], logic: TagLogic) -> bool {
    match logic {
        // Project must carry ALL selected tags
        TagLogic::And => active.iter().all(|tag| project.tags.contains(tag)),
        // Project must carry AT LEAST ONE selected tag
        TagLogic::Or => active.iter().any(|tag| project.tags.contains(tag)),
    }
}

fn passes_search(project: &Project, query: &str) -> bool {
    let title = project.title.to_lowercase();
    let text = project.text.as_deref().unwrap_or_default().to_lowercase();
    let url = project.url.as_deref().unwrap_or_default().to_lowercase();

    title.contains(query) || text.contains(query) || url.contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn project(id: u64, title: &str, score: u32, time: i64, tags: Vec<TagId>) -> Project {
        Project {
            id,
            title: title.to_string(),
            text: None,
            url: None,
            score,
            time,
            descendants: None,
            by: None,
            tags,
        }
    }

    fn sample_set() -> Vec<Project> {
        vec![
            project(1, "New Android App", 10, NOW, vec![TagId::Android]),
            project(2, "Linux kernel release", 60, NOW - 100_000, vec![TagId::Linux]),
            project(3, "Random", 5, NOW, vec![]),
        ]
    }

    #[test]
    fn test_category_all_passes_everything() {
        let state = FilterState::default();
        let filtered = apply(&sample_set(), &state, NOW);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_category_popular_keeps_high_scores() {
        let state = FilterState {
            category: CategoryFilter::Popular,
            ..Default::default()
        };
        let filtered = apply(&sample_set(), &state, NOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_category_new_uses_24h_cutoff() {
        let state = FilterState {
            category: CategoryFilter::New,
            ..Default::default()
        };
        let filtered = apply(&sample_set(), &state, NOW);
        let ids: Vec<u64> = filtered.iter().map(|p| p.id).collect();
        // id 2 is 100k seconds old, past the cutoff
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_tag_and_requires_superset() {
        let projects = vec![
            project(1, "a", 0, NOW, vec![TagId::Android]),
            project(2, "b", 0, NOW, vec![TagId::Linux]),
            project(3, "c", 0, NOW, vec![TagId::Android, TagId::Linux]),
        ];
        let state = FilterState {
            active_tags: vec![TagId::Android, TagId::Linux],
            tag_logic: TagLogic::And,
            ..Default::default()
        };
        let filtered = apply(&projects, &state, NOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_tag_or_requires_intersection() {
        let projects = vec![
            project(1, "a", 0, NOW, vec![TagId::Android]),
            project(2, "b", 0, NOW, vec![TagId::Linux]),
            project(3, "c", 0, NOW, vec![TagId::Android, TagId::Linux]),
        ];
        let state = FilterState {
            active_tags: vec![TagId::Android, TagId::Linux],
            tag_logic: TagLogic::Or,
            ..Default::default()
        };
        let filtered = apply(&projects, &state, NOW);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_and_results_subset_of_or_results() {
        let projects = vec![
            project(1, "a", 0, NOW, vec![TagId::Android]),
            project(2, "b", 0, NOW, vec![TagId::Linux, TagId::Web]),
            project(3, "c", 0, NOW, vec![TagId::Android, TagId::Web]),
            project(4, "d", 0, NOW, vec![]),
        ];
        let active = vec![TagId::Android, TagId::Web];

        let and_state = FilterState {
            active_tags: active.clone(),
            tag_logic: TagLogic::And,
            ..Default::default()
        };
        let or_state = FilterState {
            active_tags: active,
            tag_logic: TagLogic::Or,
            ..Default::default()
        };

        let and_ids: Vec<u64> = apply(&projects, &and_state, NOW).iter().map(|p| p.id).collect();
        let or_ids: Vec<u64> = apply(&projects, &or_state, NOW).iter().map(|p| p.id).collect();

        for id in &and_ids {
            assert!(or_ids.contains(id));
        }
    }

    #[test]
    fn test_empty_active_tags_is_noop() {
        let state = FilterState::default();
        assert_eq!(apply(&sample_set(), &state, NOW).len(), 3);
    }

    #[test]
    fn test_search_matches_title_text_and_url() {
        let mut projects = sample_set();
        projects[2].url = Some("https://github.com/someone/randomized".to_string());

        let state = FilterState {
            search_query: "randomized".to_string(),
            ..Default::default()
        };
        let filtered = apply(&projects, &state, NOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_clearing_search_restores_category_and_tag_result() {
        let projects = sample_set();
        let mut state = FilterState {
            category: CategoryFilter::Popular,
            search_query: "kernel".to_string(),
            ..Default::default()
        };

        let with_search = apply(&projects, &state, NOW);
        assert_eq!(with_search.len(), 1);

        state.search_query.clear();
        let without_search = apply(&projects, &state, NOW);

        let baseline = apply(
            &projects,
            &FilterState {
                category: CategoryFilter::Popular,
                ..Default::default()
            },
            NOW,
        );
        let a: Vec<u64> = without_search.iter().map(|p| p.id).collect();
        let b: Vec<u64> = baseline.iter().map(|p| p.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let state = FilterState::default();
        assert!(apply(&[], &state, NOW).is_empty());
    }

    #[test]
    fn test_stages_conjoin() {
        let mut projects = sample_set();
        projects[1].tags = vec![TagId::Linux];

        let state = FilterState {
            category: CategoryFilter::Popular,
            active_tags: vec![TagId::Linux],
            search_query: "kernel".to_string(),
            ..Default::default()
        };
        let filtered = apply(&projects, &state, NOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }
}
