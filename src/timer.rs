//! Cancellable one-shot timers
//!
//! The long-press delay is the only timed behavior in the crate. Hosts plug
//! their event loop in through [`TimerHost`]; [`VirtualTimers`] is a
//! deterministic implementation driven by explicit calls to
//! [`VirtualTimers::advance`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;

/// Identifier of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Capability for scheduling one-shot timers on the UI thread
pub trait TimerHost {
    /// Run `callback` once after `delay`
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Unknown or already fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

struct PendingTimer {
    id: TimerId,
    deadline: Duration,
    callback: TimerCallback,
}

/// Timer host with a manually advanced clock
#[derive(Default)]
pub struct VirtualTimers {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<PendingTimer>>,
}

impl fmt::Debug for VirtualTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualTimers")
            .field("now", &self.now.get())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of timers waiting to fire
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, firing every timer that falls due in
    /// deadline order
    ///
    /// Callbacks may schedule or cancel timers; a timer scheduled during
    /// the advance fires in the same call if its deadline is reached.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;

        loop {
            let due = {
                let mut pending = self.pending.borrow_mut();
                let next = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| (timer.deadline, timer.id.0))
                    .map(|(index, _)| index);

                next.map(|index| pending.remove(index))
            };

            let Some(timer) = due else {
                break;
            };

            self.now.set(timer.deadline);
            (timer.callback)();
        }

        self.now.set(target);
    }
}

impl TimerHost for VirtualTimers {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.pending.borrow_mut().push(PendingTimer {
            id,
            deadline: self.now.get() + delay,
            callback,
        });

        id
    }

    fn cancel(&self, id: TimerId) {
        self.pending.borrow_mut().retain(|timer| timer.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_fires_in_deadline_order() {
        let timers = VirtualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let late = log.clone();
        timers.schedule(Duration::from_millis(200), Box::new(move || late.borrow_mut().push("late")));
        let early = log.clone();
        timers.schedule(Duration::from_millis(100), Box::new(move || early.borrow_mut().push("early")));

        timers.advance(Duration::from_millis(150));
        assert_eq!(*log.borrow(), vec!["early"]);

        timers.advance(Duration::from_millis(50));
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(timers.pending_count(), 0);
        assert_eq!(timers.now(), Duration::from_millis(200));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let timers = VirtualTimers::new();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        let id = timers.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));
        timers.cancel(id);
        timers.cancel(id);
        timers.advance(Duration::from_secs(1));

        assert!(!fired.get());
    }
}
