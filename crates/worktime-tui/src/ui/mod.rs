//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, the converter card and overlays
//! - `input`: keyboard event handling
//! - `styles`: theme palettes and text styling

pub mod input;
pub mod render;
pub mod styles;
