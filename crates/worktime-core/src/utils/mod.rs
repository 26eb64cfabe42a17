//! Utility functions for number formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_number, format_number_in, NumberLocale, PLACEHOLDER};
