//! Feed ingest: resolve the top-story list into project candidates.
//!
//! The first `FEED_LIMIT` ids are fetched concurrently with an
//! all-or-nothing join, gated by the inclusion heuristic, and
//! classified exactly once on the way in.

use async_trait::async_trait;
use futures::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use osspulse_api::{HnClient, HnError, HnItem};

use crate::models::{Project, TagId};
use crate::tags::detect_tags;
use crate::{Error, Result};

/// How many ids from the top-story list get resolved
pub const FEED_LIMIT: usize = 100;

/// How many child comments the preview overlay fetches
pub const PREVIEW_COMMENT_LIMIT: usize = 5;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)github\.com|gitlab\.com|opensource|open-source|bitbucket\.org")
        .expect("url pattern is valid")
});

static TITLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(open source|release|launch|project)\b").expect("title pattern is valid")
});

/// Abstraction over the item API so the loader is testable without a
/// network. The real client implements it directly.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn top_story_ids(&self) -> Result<Vec<u64>>;

    /// Ok(None) means the id no longer resolves to an item; only
    /// genuine fetch failures are errors.
    async fn item(&self, id: u64) -> Result<Option<HnItem>>;
}

#[async_trait]
impl ItemSource for HnClient {
    async fn top_story_ids(&self) -> Result<Vec<u64>> {
        HnClient::top_story_ids(self)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))
    }

    async fn item(&self, id: u64) -> Result<Option<HnItem>> {
        match HnClient::item(self, id).await {
            Ok(item) => Ok(Some(item)),
            Err(HnError::NotFound(_)) => Ok(None),
            Err(e) => Err(Error::ApiError(e.to_string())),
        }
    }
}

/// The heuristic deciding whether a story looks like an open-source
/// project: forge-hosting url, or a telltale word in the title.
pub fn is_project_candidate(item: &HnItem) -> bool {
    let url_hit = item
        .url
        .as_deref()
        .is_some_and(|url| URL_PATTERN.is_match(url));
    let title_hit = item
        .title
        .as_deref()
        .is_some_and(|title| TITLE_PATTERN.is_match(title));

    url_hit || title_hit
}

/// Convert an admitted record, assigning tags exactly once
pub fn project_from_item(item: HnItem) -> Project {
    let tags = detect_tags(
        item.title.as_deref(),
        item.text.as_deref(),
        item.url.as_deref(),
    );

    Project {
        id: item.id,
        title: item.title.unwrap_or_default(),
        text: item.text,
        url: item.url,
        score: item.score,
        time: item.time,
        descendants: item.descendants,
        by: item.by,
        tags,
    }
}

/// Load the project feed.
///
/// All detail fetches run concurrently; any single fetch failure fails
/// the whole load. Ids that no longer resolve, deleted records and
/// records failing the inclusion heuristic are discarded before they
/// ever enter the set.
pub async fn load_projects(source: &dyn ItemSource, limit: usize) -> Result<Vec<Project>> {
    let mut ids = source.top_story_ids().await?;
    ids.truncate(limit);

    debug!("Resolving {} story ids", ids.len());
    let items = try_join_all(ids.iter().map(|&id| source.item(id))).await?;

    let projects: Vec<Project> = items
        .into_iter()
        .flatten()
        .filter(|item| !item.deleted && is_project_candidate(item))
        .map(project_from_item)
        .collect();

    info!("Admitted {} project candidates", projects.len());
    Ok(projects)
}

/// A top-level comment shown in the preview overlay
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub by: Option<String>,
    pub time: i64,
    pub text: Option<String>,
}

/// Detail view for one story, fetched on demand for the overlay
#[derive(Debug, Clone)]
pub struct ProjectPreview {
    pub id: u64,
    pub title: String,
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: u32,
    pub time: i64,
    pub by: Option<String>,
    pub descendants: Option<u32>,
    pub tags: Vec<TagId>,
    pub comments: Vec<Comment>,
}

/// Fetch the preview for one story: the item plus its first few child
/// comments.
///
/// The comment batch joins all-or-nothing on fetch failures; deleted
/// and unresolvable comments are dropped silently after a successful
/// join.
pub async fn load_preview(source: &dyn ItemSource, id: u64) -> Result<ProjectPreview> {
    let item = source.item(id).await?.ok_or(Error::NotFound(id))?;

    let kid_ids: Vec<u64> = item.kids.iter().take(PREVIEW_COMMENT_LIMIT).copied().collect();
    let kids = try_join_all(kid_ids.iter().map(|&kid| source.item(kid))).await?;

    let comments = kids
        .into_iter()
        .flatten()
        .filter(|kid| !kid.deleted)
        .map(|kid| Comment {
            id: kid.id,
            by: kid.by,
            time: kid.time,
            text: kid.text,
        })
        .collect();

    let tags = detect_tags(
        item.title.as_deref(),
        item.text.as_deref(),
        item.url.as_deref(),
    );

    Ok(ProjectPreview {
        id: item.id,
        title: item.title.unwrap_or_default(),
        text: item.text,
        url: item.url,
        score: item.score,
        time: item.time,
        by: item.by,
        descendants: item.descendants,
        tags,
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: u64, title: Option<&str>, url: Option<&str>) -> HnItem {
        HnItem {
            id,
            title: title.map(String::from),
            text: None,
            url: url.map(String::from),
            score: 10,
            time: 1_700_000_000,
            by: Some("someone".to_string()),
            descendants: Some(3),
            kids: vec![],
            deleted: false,
        }
    }

    struct StubSource {
        top: Vec<u64>,
        items: HashMap<u64, HnItem>,
        fail_on: Option<u64>,
    }

    impl StubSource {
        fn new(items: Vec<HnItem>) -> Self {
            let top = items.iter().map(|i| i.id).collect();
            let items = items.into_iter().map(|i| (i.id, i)).collect();
            Self {
                top,
                items,
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl ItemSource for StubSource {
        async fn top_story_ids(&self) -> Result<Vec<u64>> {
            Ok(self.top.clone())
        }

        async fn item(&self, id: u64) -> Result<Option<HnItem>> {
            if self.fail_on == Some(id) {
                return Err(Error::ApiError(format!("boom on {}", id)));
            }
            Ok(self.items.get(&id).cloned())
        }
    }

    #[test]
    fn test_candidate_url_patterns() {
        assert!(is_project_candidate(&item(
            1,
            Some("Something"),
            Some("https://github.com/a/b")
        )));
        assert!(is_project_candidate(&item(
            2,
            Some("Something"),
            Some("https://GitLab.com/x/y")
        )));
        assert!(is_project_candidate(&item(
            3,
            Some("Something"),
            Some("https://bitbucket.org/z")
        )));
        assert!(is_project_candidate(&item(
            4,
            Some("Something"),
            Some("https://example.com/open-source/tools")
        )));
    }

    #[test]
    fn test_candidate_title_word_boundaries() {
        assert!(is_project_candidate(&item(
            1,
            Some("We Release v2 today"),
            Some("https://example.com")
        )));
        assert!(is_project_candidate(&item(
            2,
            Some("An open source database"),
            None
        )));
        // no boundary match inside "rereleased"
        assert!(!is_project_candidate(&item(
            3,
            Some("It was rereleased"),
            Some("https://example.com")
        )));
    }

    #[test]
    fn test_candidate_rejects_unrelated_records() {
        assert!(!is_project_candidate(&item(
            1,
            Some("Why the sky is blue"),
            Some("https://example.com/sky")
        )));
        assert!(!is_project_candidate(&item(2, None, None)));
    }

    #[test]
    fn test_project_from_item_classifies_once() {
        let project = project_from_item(item(
            9,
            Some("Linux tool launch"),
            Some("https://github.com/a/b"),
        ));
        assert!(project.tags.contains(&TagId::Linux));
        assert!(project.tags.contains(&TagId::Github));
        assert_eq!(project.id, 9);
    }

    #[tokio::test]
    async fn test_load_projects_filters_and_limits() {
        let source = StubSource::new(vec![
            item(1, Some("A project for everyone"), None),
            item(2, Some("Sky color analysis"), Some("https://example.com")),
            item(3, Some("Tool"), Some("https://github.com/t/t")),
        ]);

        let projects = load_projects(&source, FEED_LIMIT).await.unwrap();
        let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_load_projects_respects_limit() {
        let items: Vec<HnItem> = (1..=10)
            .map(|id| item(id, Some("project"), None))
            .collect();
        let source = StubSource::new(items);

        let projects = load_projects(&source, 4).await.unwrap();
        assert_eq!(projects.len(), 4);
    }

    #[tokio::test]
    async fn test_load_projects_batch_fails_as_a_whole() {
        let mut source = StubSource::new(vec![
            item(1, Some("A project"), None),
            item(2, Some("Another project"), None),
        ]);
        source.fail_on = Some(2);

        let result = load_projects(&source, FEED_LIMIT).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_projects_skips_deleted() {
        let mut deleted = item(2, Some("Dead project"), None);
        deleted.deleted = true;
        let source = StubSource::new(vec![item(1, Some("Live project"), None), deleted]);

        let projects = load_projects(&source, FEED_LIMIT).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 1);
    }

    #[tokio::test]
    async fn test_load_preview_skips_deleted_comments() {
        let mut story = item(1, Some("A project"), Some("https://github.com/a/b"));
        story.kids = vec![10, 11, 12];

        let mut c10 = item(10, None, None);
        c10.text = Some("great stuff".to_string());
        let mut c11 = item(11, None, None);
        c11.deleted = true;
        let mut c12 = item(12, None, None);
        c12.text = Some("nice".to_string());

        let source = StubSource::new(vec![story, c10, c11, c12]);

        let preview = load_preview(&source, 1).await.unwrap();
        assert_eq!(preview.comments.len(), 2);
        assert_eq!(preview.comments[0].id, 10);
        assert_eq!(preview.comments[1].id, 12);
        assert!(preview.tags.contains(&TagId::Github));
    }

    #[tokio::test]
    async fn test_load_preview_skips_unresolvable_comments() {
        let mut story = item(1, Some("A project"), None);
        story.kids = vec![10, 11];

        // id 11 is never registered, so it resolves to nothing
        let mut c10 = item(10, None, None);
        c10.text = Some("still here".to_string());
        let source = StubSource::new(vec![story, c10]);

        let preview = load_preview(&source, 1).await.unwrap();
        assert_eq!(preview.comments.len(), 1);
        assert_eq!(preview.comments[0].id, 10);
    }

    #[tokio::test]
    async fn test_load_preview_missing_story_is_an_error() {
        let source = StubSource::new(vec![]);
        let result = load_preview(&source, 42).await;
        assert!(matches!(result, Err(Error::NotFound(42))));
    }

    #[tokio::test]
    async fn test_load_projects_skips_unresolvable_ids() {
        let mut source = StubSource::new(vec![item(1, Some("A project"), None)]);
        source.top.push(99);

        let projects = load_projects(&source, FEED_LIMIT).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 1);
    }

    #[tokio::test]
    async fn test_load_preview_limits_comment_batch() {
        let mut story = item(1, Some("A project"), None);
        story.kids = (10..20).collect();

        let mut items = vec![story];
        for kid in 10..20 {
            items.push(item(kid, None, None));
        }
        let source = StubSource::new(items);

        let preview = load_preview(&source, 1).await.unwrap();
        assert_eq!(preview.comments.len(), PREVIEW_COMMENT_LIMIT);
    }

    #[tokio::test]
    async fn test_load_preview_comment_failure_fails_batch() {
        let mut story = item(1, Some("A project"), None);
        story.kids = vec![10, 11];

        let mut source = StubSource::new(vec![story, item(10, None, None), item(11, None, None)]);
        source.fail_on = Some(11);

        assert!(load_preview(&source, 1).await.is_err());
    }
}
