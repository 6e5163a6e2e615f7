//! Gesture recognition used to trigger menus
//!
//! Right clicks need no recognition; this module covers the press-and-hold
//! alternative for touch surfaces and, optionally, the primary mouse button.

pub mod long_press;

pub use long_press::{
    LongPressConfig, LongPressDetector, PointerId, DEFAULT_LONG_PRESS_DELAY_MS,
    DEFAULT_LONG_PRESS_SLOP,
};
