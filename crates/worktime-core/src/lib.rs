//! Core library for WorkTime.
//!
//! WorkTime turns a price into the amount of work time needed to pay for it,
//! given an hourly wage. This crate holds everything that is not terminal UI:
//!
//! - `convert`: locale-flexible number parsing and the price/wage computation
//! - `models`: the persisted `Settings` record and its enums
//! - `settings`: key-value storage and the settings controller
//! - `i18n`: language dictionaries and the result presentation adapter
//! - `offline`: the offline cache controller serving the application shell
//! - `config`: on-disk configuration and directory locations

pub mod config;
pub mod convert;
pub mod i18n;
pub mod models;
pub mod offline;
pub mod settings;
pub mod utils;

pub use config::Config;
pub use convert::{compute_duration, hours_to_hm, parse_flexible_number, Conversion, WorkDuration, WorkTime};
pub use models::{Currency, Lang, Settings, Theme};
pub use settings::SettingsController;
