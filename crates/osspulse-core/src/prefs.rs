//! Typed mapping between FilterState and the settings store.
//!
//! Key names match the original preference schema. Malformed values
//! never abort a load: enum strings that don't parse fall back to
//! their defaults, a broken `activeTags` JSON array is logged and
//! replaced with an empty set, and tag ids missing from the catalog
//! are skipped silently.

use tracing::warn;

use osspulse_store::SettingsStore;

use crate::models::TagId;
use crate::state::{CategoryFilter, FilterState, SortOrder, TagLogic, TagSortMode, ViewMode};
use crate::{Error, Result};

const KEY_CATEGORY: &str = "currentFilter";
const KEY_TAG_LOGIC: &str = "tagLogic";
const KEY_VIEW_MODE: &str = "viewMode";
const KEY_SORT_ORDER: &str = "sortOrder";
const KEY_ACTIVE_TAGS: &str = "activeTags";
const KEY_TAG_SORT_MODE: &str = "tagSortMode";

/// Load persisted settings, substituting defaults for anything absent
/// or malformed. Pagination and search are session-local and never
/// stored.
pub fn load_filter_state(store: &SettingsStore) -> Result<FilterState> {
    let mut state = FilterState::default();

    if let Some(raw) = get(store, KEY_CATEGORY)? {
        state.category = CategoryFilter::parse(&raw);
    }
    if let Some(raw) = get(store, KEY_TAG_LOGIC)? {
        state.tag_logic = TagLogic::parse(&raw);
    }
    if let Some(raw) = get(store, KEY_VIEW_MODE)? {
        state.view_mode = ViewMode::parse(&raw);
    }
    if let Some(raw) = get(store, KEY_SORT_ORDER)? {
        state.sort_order = SortOrder::parse(&raw);
    }
    if let Some(raw) = get(store, KEY_TAG_SORT_MODE)? {
        state.tag_sort_mode = TagSortMode::parse(&raw);
    }
    if let Some(raw) = get(store, KEY_ACTIVE_TAGS)? {
        state.active_tags = parse_active_tags(&raw);
    }

    Ok(state)
}

/// Persist the durable FilterState fields
pub fn save_filter_state(store: &SettingsStore, state: &FilterState) -> Result<()> {
    set(store, KEY_CATEGORY, state.category.as_str())?;
    set(store, KEY_TAG_LOGIC, state.tag_logic.as_str())?;
    set(store, KEY_VIEW_MODE, state.view_mode.as_str())?;
    set(store, KEY_SORT_ORDER, state.sort_order.as_str())?;
    set(store, KEY_TAG_SORT_MODE, state.tag_sort_mode.as_str())?;

    let tags: Vec<&str> = state.active_tags.iter().map(|t| t.as_str()).collect();
    set(store, KEY_ACTIVE_TAGS, &serde_json::to_string(&tags)?)?;

    Ok(())
}

fn parse_active_tags(raw: &str) -> Vec<TagId> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => ids.iter().filter_map(|id| TagId::parse(id)).collect(),
        Err(e) => {
            warn!("Ignoring malformed stored active tags: {}", e);
            Vec::new()
        }
    }
}

fn get(store: &SettingsStore, key: &str) -> Result<Option<String>> {
    store.get(key).map_err(|e| Error::StoreError(e.to_string()))
}

fn set(store: &SettingsStore, key: &str, value: &str) -> Result<()> {
    store
        .set(key, value)
        .map_err(|e| Error::StoreError(e.to_string()))
}
