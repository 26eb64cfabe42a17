//! Settings persistence and change notification.
//!
//! Settings live in a single record under one key of a key-value store
//! (`KeyValueStore`), in the spirit of browser local storage. The
//! `SettingsController` owns the current value, persists every change and
//! publishes it to subscribers through a `tokio::sync::watch` channel.
//!
//! Storage failures never reach the user: reads fall back to defaults and
//! failed writes are logged.

pub mod controller;
pub mod store;

pub use controller::SettingsController;
pub use store::{
    load_settings, save_settings, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
    StorageError, SETTINGS_KEY,
};
