//! Language dictionaries and result presentation.
//!
//! `Dictionary` holds every user-facing string for one language;
//! `present` turns a `Conversion` into the two display lines.

pub mod dictionary;
pub mod presenter;

pub use dictionary::{dictionary, dictionary_for_code, Dictionary};
pub use presenter::{present, wage_suffix, ResultView};
