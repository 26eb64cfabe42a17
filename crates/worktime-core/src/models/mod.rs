//! Data models for WorkTime.
//!
//! - `Settings`: the single persisted record (wage, theme, language, currency)
//! - `Theme`, `Lang`, `Currency`: its enumerated fields

pub mod settings;

pub use settings::{Currency, Lang, Settings, Theme};
