//! Utility Module
//!
//! - [`Timer`]: frame delta and elapsed time for hosts that drive the widget
//!   from a display refresh callback

pub mod time;

pub use time::Timer;
