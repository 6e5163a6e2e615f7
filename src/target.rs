//! Host element tree contract and target resolution

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;

use crate::events::{EventKind, InputEvent};
use crate::layout::Rect;

/// Identifier of an attached native listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Native event listener
pub type Listener = Rc<dyn Fn(&mut InputEvent)>;

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerScope<E> {
    /// Events targeting this element or its descendants
    Element(E),
    /// Every event in the viewport
    Viewport,
}

/// Capability interface of the host's element tree
///
/// The tree is assumed to be acyclic.
#[async_trait(?Send)]
pub trait ElementTree {
    /// Host reference to an element
    type Element: Clone + PartialEq + fmt::Debug + 'static;

    /// Root of the composition being displayed
    fn root(&self) -> Self::Element;

    /// The display name the host assigned to `element`
    fn display_name(&self, element: &Self::Element) -> Option<String>;

    /// Direct children of `element`, in order
    fn children(&self, element: &Self::Element) -> Vec<Self::Element>;

    /// Bounding box of `element` in viewport coordinates
    fn bounding_box(&self, element: &Self::Element) -> Rect;

    /// Attach `listener` for events of `kind` delivered within `scope`
    fn add_listener(
        &self,
        scope: ListenerScope<Self::Element>,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Show or hide `element`
    fn set_hidden(&self, _element: &Self::Element, _hidden: bool) {}

    /// Resolves once the host finished laying out the tree
    async fn layout_complete(&self) {}
}

/// Find the first element named `name` in a pre-order walk from `root`
pub fn resolve<T: ElementTree + ?Sized>(
    tree: &T,
    name: &str,
    root: &T::Element,
) -> Option<T::Element> {
    if tree.display_name(root).as_deref() == Some(name) {
        return Some(root.clone());
    }

    tree.children(root)
        .iter()
        .find_map(|child| resolve(tree, name, child))
}
