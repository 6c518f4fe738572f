//! Keyword-based tag classification.
//!
//! A tag is assigned when any of its keywords occurs as a substring of
//! the combined lowercase haystack built from title, text and url.
//! Pure functions: same input, same tags, every time.

use std::collections::HashMap;

use crate::models::{TagDefinition, TagId, TAG_CATALOG};
use crate::state::TagSortMode;

/// Keyword lists per tag, all lowercase
fn keywords(tag: TagId) -> &'static [&'static str] {
    match tag {
        TagId::Android => &[
            "android",
            "kotlin",
            "java android",
            "mobile app",
            "play store",
            "apk",
        ],
        TagId::Linux => &[
            "linux", "ubuntu", "debian", "fedora", "arch", "gnu", "manjaro", "centos", "redhat",
            "opensuse",
        ],
        TagId::Windows => &[
            "windows",
            "microsoft",
            ".net",
            "win32",
            "win64",
            "windows 10",
            "windows 11",
            "powershell",
            "wsl",
        ],
        TagId::Mac => &[
            "mac", "macos", "apple", "osx", "macbook", "swift", "cocoa", "xcode",
        ],
        TagId::Web => &[
            "web",
            "browser",
            "javascript",
            "html",
            "css",
            "react",
            "vue",
            "angular",
            "node",
            "typescript",
            "frontend",
            "backend",
            "fullstack",
            "responsive",
        ],
        TagId::Github => &["github.com"],
    }
}

/// Combined lowercase haystack; missing fields contribute empty strings
fn haystack(title: Option<&str>, text: Option<&str>, url: Option<&str>) -> String {
    format!(
        "{} {} {}",
        title.unwrap_or_default(),
        text.unwrap_or_default(),
        url.unwrap_or_default()
    )
    .to_lowercase()
}

/// Classify a record into zero or more tags.
///
/// No priority or exclusivity between tags; the returned order follows
/// the catalog order.
pub fn detect_tags(title: Option<&str>, text: Option<&str>, url: Option<&str>) -> Vec<TagId> {
    let content = haystack(title, text, url);

    TAG_CATALOG
        .iter()
        .map(|def| def.id)
        .filter(|&tag| keywords(tag).iter().any(|kw| content.contains(kw)))
        .collect()
}

/// Tally tag occurrences over the full project set.
///
/// Always recomputed from scratch; counts describe the unfiltered set,
/// not the current result.
pub fn tag_counts(projects: &[crate::models::Project]) -> HashMap<TagId, usize> {
    let mut counts = HashMap::new();
    for project in projects {
        for &tag in &project.tags {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}

/// Catalog ordered for display: alphabetical by name, or most frequent first
pub fn sorted_catalog(
    mode: TagSortMode,
    counts: &HashMap<TagId, usize>,
) -> Vec<&'static TagDefinition> {
    let mut catalog: Vec<&'static TagDefinition> = TAG_CATALOG.iter().collect();

    match mode {
        TagSortMode::Alphabetical => catalog.sort_by_key(|def| def.name),
        TagSortMode::Count => {
            catalog.sort_by_key(|def| std::cmp::Reverse(counts.get(&def.id).copied().unwrap_or(0)))
        }
    }

    catalog
}
