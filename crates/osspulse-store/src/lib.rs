// Per-user settings persistence
pub mod settings;

pub use settings::{SettingsStore, StoreError};
