// Core pipeline: classify, filter, sort, paginate - the brain of the operation
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod models;
pub mod page;
pub mod prefs;
pub mod sort;
pub mod state;
pub mod tags;

pub use config::Config;
pub use error::Error;
pub use models::{Project, TagDefinition, TagId, TAG_CATALOG};
pub use page::{Page, PageButton, PageLayout, PAGE_SIZE};
pub use state::{CategoryFilter, Event, FilterState, ProjectStore, SortOrder, TagLogic, TagSortMode, ViewMode};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
