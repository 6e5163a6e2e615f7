//! Long-press detection with slop tolerance
//!
//! A press starts a cancellable timer. Lifting the pointer or moving it past
//! the slop threshold on either axis cancels the timer; otherwise the timer
//! fires once and hands the triggering event to the caller.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::events::InputEvent;
use crate::layout::Point;
use crate::timer::{TimerHost, TimerId};

/// Default long-press delay in milliseconds.
pub const DEFAULT_LONG_PRESS_DELAY_MS: u64 = 500;

/// Default maximum movement on either axis, in pixels, before a press is
/// no longer a long press.
pub const DEFAULT_LONG_PRESS_SLOP: f32 = 10.0;

/// Timing and tolerance for long-press detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LongPressConfig {
    /// How long the pointer must stay down
    pub delay_ms: u64,
    /// Allowed travel on either axis
    pub slop: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_LONG_PRESS_DELAY_MS,
            slop: DEFAULT_LONG_PRESS_SLOP,
        }
    }
}

impl LongPressConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Identifies the pointer a gesture is tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// The single live gesture
struct GestureState {
    pointer: PointerId,
    origin: Point,
    pending: Option<TimerId>,
    generation: u64,
}

/// Tracks at most one press at a time and fires after the configured delay
pub struct LongPressDetector {
    config: LongPressConfig,
    timers: Rc<dyn TimerHost>,
    state: Rc<RefCell<Option<GestureState>>>,
    generation: Cell<u64>,
}

impl fmt::Debug for LongPressDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongPressDetector")
            .field("config", &self.config)
            .field("tracked", &self.tracked_pointer())
            .finish()
    }
}

impl LongPressDetector {
    pub fn new(config: LongPressConfig, timers: Rc<dyn TimerHost>) -> Self {
        Self {
            config,
            timers,
            state: Rc::new(RefCell::new(None)),
            generation: Cell::new(0),
        }
    }

    pub fn config(&self) -> &LongPressConfig {
        &self.config
    }

    /// Whether a press is currently being tracked
    pub fn is_tracking(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// The pointer of the press being tracked, if any
    pub fn tracked_pointer(&self) -> Option<PointerId> {
        self.state.borrow().as_ref().map(|state| state.pointer)
    }

    /// Start tracking a press at `origin`
    ///
    /// Returns `false` without side effects when a press is already tracked.
    /// When the delay elapses, `on_fire` receives `trigger` with its default
    /// action already prevented.
    pub fn begin(
        &self,
        pointer: PointerId,
        origin: Point,
        trigger: InputEvent,
        on_fire: impl FnOnce(InputEvent) + 'static,
    ) -> bool {
        if self.is_tracking() {
            trace!("ignoring {:?}, already tracking a press", pointer);
            return false;
        }

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        *self.state.borrow_mut() = Some(GestureState {
            pointer,
            origin,
            pending: None,
            generation,
        });

        let state = Rc::downgrade(&self.state);
        let id = self.timers.schedule(
            self.config.delay(),
            Box::new(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };

                let live = matches!(
                    state.borrow().as_ref(),
                    Some(current) if current.generation == generation
                );
                if !live {
                    return;
                }

                state.borrow_mut().take();
                trace!("long press fired for {:?}", pointer);

                let mut event = trigger;
                event.prevent_default();
                on_fire(event);
            }),
        );

        if let Some(current) = self.state.borrow_mut().as_mut() {
            if current.generation == generation {
                current.pending = Some(id);
            }
        }

        trace!("tracking press of {:?} at {:?}", pointer, origin);
        true
    }

    /// Feed a new pointer position
    ///
    /// Returns `true` if the movement exceeded the slop and cancelled the
    /// press.
    pub fn track_movement(&self, current: Point) -> bool {
        let exceeded = self.state.borrow().as_ref().is_some_and(|state| {
            let (dx, dy) = state.origin.axis_delta(current);
            dx > self.config.slop || dy > self.config.slop
        });

        if exceeded {
            trace!("press moved past slop to {:?}", current);
            self.cancel();
        }

        exceeded
    }

    /// Stop tracking and clear any pending timer
    pub fn cancel(&self) {
        let state = self.state.borrow_mut().take();

        if let Some(GestureState {
            pending: Some(id), ..
        }) = state
        {
            self.timers.cancel(id);
        }
    }
}

impl Drop for LongPressDetector {
    fn drop(&mut self) {
        self.cancel();
    }
}
