//! Bookkeeping of listeners attached to a target element
//!
//! Every listener added through a [`TargetBinding`] is recorded so teardown
//! can remove all of them, including transient viewport listeners that are
//! only live during a mouse press.

use log::trace;

use crate::events::EventKind;
use crate::target::{ElementTree, Listener, ListenerId, ListenerScope};
use crate::Error;

/// The element gestures are attached to and the listeners attached for it
#[derive(Debug)]
pub struct TargetBinding<E> {
    element: Option<E>,
    listeners: Vec<ListenerId>,
    transient: Vec<ListenerId>,
}

impl<E: Clone> TargetBinding<E> {
    pub fn new() -> Self {
        Self {
            element: None,
            listeners: Vec::new(),
            transient: Vec::new(),
        }
    }

    /// The bound element
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.element.is_some()
    }

    /// Number of listeners currently attached through this binding
    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.transient.len()
    }

    /// Bind to `element`, attaching every `(kind, listener)` pair to it
    pub fn bind<T>(
        &mut self,
        tree: &T,
        element: E,
        listeners: Vec<(EventKind, Listener)>,
    ) -> Result<(), Error>
    where
        T: ElementTree<Element = E> + ?Sized,
    {
        if self.is_bound() {
            return Err(Error::AlreadyBound);
        }

        for (kind, listener) in listeners {
            let id = tree.add_listener(ListenerScope::Element(element.clone()), kind, listener);
            trace!("attached {:?} listener {:?}", kind, id);
            self.listeners.push(id);
        }

        self.element = Some(element);
        Ok(())
    }

    /// Attach a viewport listener that lives until [`Self::release_transient`]
    pub fn add_transient<T>(&mut self, tree: &T, kind: EventKind, listener: Listener)
    where
        T: ElementTree<Element = E> + ?Sized,
    {
        let id = tree.add_listener(ListenerScope::Viewport, kind, listener);
        trace!("attached transient {:?} listener {:?}", kind, id);
        self.transient.push(id);
    }

    /// Remove every transient listener
    pub fn release_transient<T>(&mut self, tree: &T)
    where
        T: ElementTree<Element = E> + ?Sized,
    {
        for id in self.transient.drain(..) {
            tree.remove_listener(id);
        }
    }

    /// Remove every listener and forget the element
    pub fn unbind<T>(&mut self, tree: &T)
    where
        T: ElementTree<Element = E> + ?Sized,
    {
        self.release_transient(tree);

        for id in self.listeners.drain(..) {
            tree.remove_listener(id);
        }

        self.element = None;
    }
}

impl<E: Clone> Default for TargetBinding<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessTree;
    use crate::layout::Rect;
    use std::rc::Rc;

    #[test]
    fn test_bind_and_unbind() {
        let tree = HeadlessTree::new();
        let element = tree.add_element(&tree.root(), "target", Rect::zero());
        let mut binding = TargetBinding::new();

        let listener: Listener = Rc::new(|_: &mut crate::events::InputEvent| {});
        binding
            .bind(
                &tree,
                element,
                vec![
                    (EventKind::ContextMenu, listener.clone()),
                    (EventKind::TouchStart, listener.clone()),
                ],
            )
            .unwrap();
        binding.add_transient(&tree, EventKind::MouseMove, listener);

        assert_eq!(binding.listener_count(), 3);
        assert_eq!(tree.listener_count(), 3);

        binding.unbind(&tree);
        assert!(!binding.is_bound());
        assert_eq!(tree.listener_count(), 0);
    }

    #[test]
    fn test_double_bind_is_rejected() {
        let tree = HeadlessTree::new();
        let element = tree.add_element(&tree.root(), "target", Rect::zero());
        let mut binding = TargetBinding::new();

        binding.bind(&tree, element, Vec::new()).unwrap();
        let error = binding.bind(&tree, element, Vec::new()).unwrap_err();

        assert!(matches!(error, Error::AlreadyBound));
    }
}
