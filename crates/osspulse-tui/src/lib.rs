// Terminal UI implementation using ratatui
// The pretty face of OSS Pulse

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, PreviewState};
pub use runner::run_tui;
