//! UI module root: exposes drawing functions for individual panels.

pub mod detail;
pub mod header;
pub mod popup;
pub mod status;
pub mod targets;
pub mod theme;
pub mod util;
