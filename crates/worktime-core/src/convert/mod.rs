//! Price to work time conversion.
//!
//! This module is pure and synchronous:
//!
//! - `parse_flexible_number`: accepts both `12,50` and `12.50` style input
//! - `hours_to_hm`: splits decimal hours into whole hours and minutes
//! - `compute_duration`: classifies a wage/price pair as `Empty`, `Invalid`
//!   or a computed `WorkTime`

pub mod duration;
pub mod parse;

pub use duration::{compute_duration, hours_to_hm, Conversion, WorkDuration, WorkTime};
pub use parse::parse_flexible_number;
