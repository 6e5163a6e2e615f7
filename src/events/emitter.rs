//! Named signal emitter for outward-facing notifications

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Type for signal handler callbacks
type SignalCallback<E> = Rc<dyn Fn(&E)>;

/// Emitter for signals addressed by name
///
/// Handlers are grouped by signal name. Emitting a signal nobody subscribed
/// to is a no-op.
pub struct EventEmitter<E> {
    /// Signal handlers grouped by signal name
    handlers: RefCell<HashMap<String, Vec<SignalCallback<E>>>>,
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("signals", &self.handlers.borrow().len())
            .finish()
    }
}

impl<E> EventEmitter<E> {
    /// Create a new event emitter
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Register a handler for the named signal
    pub fn on(&self, signal: impl Into<String>, handler: impl Fn(&E) + 'static) {
        self.handlers
            .borrow_mut()
            .entry(signal.into())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Emit the named signal to every registered handler
    pub fn emit(&self, signal: &str, event: &E) {
        // Handlers may subscribe while being called.
        let handlers = match self.handlers.borrow().get(signal) {
            Some(handlers) => handlers.clone(),
            None => return,
        };

        for handler in handlers {
            handler(event);
        }
    }

    /// Remove all handlers for the named signal
    pub fn off(&self, signal: &str) {
        self.handlers.borrow_mut().remove(signal);
    }

    /// Number of handlers registered for the named signal
    pub fn handler_count(&self, signal: &str) -> usize {
        self.handlers.borrow().get(signal).map_or(0, Vec::len)
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_named_handlers_only() {
        let emitter = EventEmitter::<String>::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        emitter.on("a", move |payload: &String| {
            assert_eq!(payload, "hello");
            counter.set(counter.get() + 1);
        });
        emitter.on("b", |_| panic!("wrong signal"));

        emitter.emit("a", &"hello".to_string());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_emit_without_handlers_is_noop() {
        let emitter = EventEmitter::<()>::new();
        emitter.emit("nobody", &());
        assert_eq!(emitter.handler_count("nobody"), 0);
    }

    #[test]
    fn test_off() {
        let emitter = EventEmitter::<()>::new();
        emitter.on("a", |_| {});
        assert_eq!(emitter.handler_count("a"), 1);
        emitter.off("a");
        assert_eq!(emitter.handler_count("a"), 0);
    }
}
