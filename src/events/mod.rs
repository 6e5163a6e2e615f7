//! Input events and listener plumbing
//!
//! The event layer provides:
//! - Native input events normalized across mouse and touch
//! - Point sources for anchoring and slop tracking
//! - Listener bookkeeping for the reacting element
//! - A named signal emitter for outward notifications

pub mod binding;
pub mod emitter;
pub mod event;
pub mod point;

pub use binding::TargetBinding;
pub use emitter::EventEmitter;
pub use event::{
    EventKind, InputEvent, MouseButton, MouseEvent, MouseEventType, Pointer, Touch, TouchEvent,
    TouchEventType,
};
pub use point::PointSource;
