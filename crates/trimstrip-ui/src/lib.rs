//! TrimStrip UI - egui rendering of the trim strip
//!
//! Provides:
//! - `TimelineView`, the widget a host embeds
//! - `StripLayout`, the pure shape layout the painter draws
//! - Pointer translation and handle cursors

pub mod input;
pub mod layout;
pub mod paint;
pub mod view;

pub use input::{handle_cursor, pointer_events};
pub use layout::{format_duration_label, StripLayout};
pub use paint::{paint_strip, StripPalette};
pub use view::{TimelineOutput, TimelineView, DEFAULT_HEIGHT};
