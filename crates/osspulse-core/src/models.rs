use serde::{Deserialize, Serialize};

/// A story admitted into the project feed - the star of the show.
///
/// Immutable after ingest; `tags` is assigned exactly once by the
/// classifier and never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: u32,
    /// Unix timestamp of creation
    pub time: i64,
    pub descendants: Option<u32>,
    pub by: Option<String>,
    pub tags: Vec<TagId>,
}

impl Project {
    /// Comment count with the missing-field fallback applied
    pub fn comment_count(&self) -> u32 {
        self.descendants.unwrap_or(0)
    }
}

/// Topic labels from the fixed catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TagId {
    Android,
    Linux,
    Windows,
    Mac,
    Web,
    Github,
}

impl TagId {
    /// Stable identifier used in the settings store
    pub fn as_str(&self) -> &'static str {
        match self {
            TagId::Android => "android",
            TagId::Linux => "linux",
            TagId::Windows => "windows",
            TagId::Mac => "mac",
            TagId::Web => "web",
            TagId::Github => "github",
        }
    }

    /// Parse a stored identifier; ids absent from the catalog yield None
    pub fn parse(s: &str) -> Option<TagId> {
        match s {
            "android" => Some(TagId::Android),
            "linux" => Some(TagId::Linux),
            "windows" => Some(TagId::Windows),
            "mac" => Some(TagId::Mac),
            "web" => Some(TagId::Web),
            "github" => Some(TagId::Github),
            _ => None,
        }
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry: static configuration, not derived data
#[derive(Debug, Clone, Copy)]
pub struct TagDefinition {
    pub id: TagId,
    pub name: &'static str,
    pub icon: &'static str,
}

/// The fixed tag catalog
pub const TAG_CATALOG: [TagDefinition; 6] = [
    TagDefinition {
        id: TagId::Android,
        name: "Android",
        icon: "🤖",
    },
    TagDefinition {
        id: TagId::Linux,
        name: "Linux",
        icon: "🐧",
    },
    TagDefinition {
        id: TagId::Windows,
        name: "Windows",
        icon: "🪟",
    },
    TagDefinition {
        id: TagId::Mac,
        name: "Mac",
        icon: "🍎",
    },
    TagDefinition {
        id: TagId::Web,
        name: "Web",
        icon: "🌐",
    },
    TagDefinition {
        id: TagId::Github,
        name: "GitHub",
        icon: "🐙",
    },
];

/// Look up a catalog entry by id
pub fn tag_definition(id: TagId) -> &'static TagDefinition {
    TAG_CATALOG
        .iter()
        .find(|def| def.id == id)
        .expect("catalog covers every TagId variant")
}
