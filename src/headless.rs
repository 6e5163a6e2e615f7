//! In-memory host for running menus without a UI
//!
//! [`HeadlessTree`] implements [`ElementTree`] over a simple arena and lets
//! callers dispatch synthetic input. [`RecordingMenus`] implements
//! [`MenuLibrary`] by recording every call and can simulate a user picking
//! an item.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::events::{EventKind, InputEvent};
use crate::layout::{Point, Rect};
use crate::menu::{MenuDelegate, MenuLibrary, MenuTree};
use crate::target::{ElementTree, Listener, ListenerId, ListenerScope};

/// Element reference of a [`HeadlessTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

#[derive(Debug)]
struct Node {
    name: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    bounds: Rect,
    hidden: bool,
}

struct Registration {
    id: ListenerId,
    scope: ListenerScope<ElementId>,
    kind: EventKind,
    listener: Listener,
}

/// Element tree held in memory
pub struct HeadlessTree {
    nodes: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<u64>,
    layout: RefCell<Option<oneshot::Receiver<()>>>,
}

impl fmt::Debug for HeadlessTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessTree")
            .field("nodes", &self.nodes.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl HeadlessTree {
    /// Create a tree holding an unnamed root
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![Node {
                name: None,
                parent: None,
                children: Vec::new(),
                bounds: Rect::zero(),
                hidden: false,
            }]),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            layout: RefCell::new(None),
        }
    }

    /// Append a named child to `parent`
    pub fn add_element(&self, parent: &ElementId, name: &str, bounds: Rect) -> ElementId {
        let mut nodes = self.nodes.borrow_mut();
        let id = ElementId(nodes.len());

        nodes.push(Node {
            name: Some(name.to_string()),
            parent: Some(*parent),
            children: Vec::new(),
            bounds,
            hidden: false,
        });
        nodes[parent.0].children.push(id);

        id
    }

    pub fn set_display_name(&self, element: &ElementId, name: &str) {
        self.nodes.borrow_mut()[element.0].name = Some(name.to_string());
    }

    pub fn is_hidden(&self, element: &ElementId) -> bool {
        self.nodes.borrow()[element.0].hidden
    }

    /// Make the next [`ElementTree::layout_complete`] wait until the returned
    /// sender fires or is dropped
    pub fn defer_layout(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.layout.borrow_mut() = Some(receiver);
        sender
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` as if it happened on `target`
    ///
    /// Listeners on the target and its ancestors run first, then viewport
    /// listeners, each group in attach order. Returns the event as the
    /// listeners left it.
    pub fn dispatch(&self, target: &ElementId, event: InputEvent) -> InputEvent {
        let path = self.ancestors(*target);
        self.deliver(event, |element| path.contains(element))
    }

    /// Deliver `event` outside every element
    pub fn dispatch_viewport(&self, event: InputEvent) -> InputEvent {
        self.deliver(event, |_| false)
    }

    fn deliver(
        &self,
        mut event: InputEvent,
        on_path: impl Fn(&ElementId) -> bool,
    ) -> InputEvent {
        let kind = event.kind();

        // Listeners may attach or detach listeners while running.
        let (element, viewport): (Vec<_>, Vec<_>) = self
            .listeners
            .borrow()
            .iter()
            .filter(|registration| registration.kind == kind)
            .filter(|registration| match &registration.scope {
                ListenerScope::Element(element) => on_path(element),
                ListenerScope::Viewport => true,
            })
            .map(|registration| (registration.scope.clone(), registration.listener.clone()))
            .partition(|(scope, _)| *scope != ListenerScope::Viewport);

        for (_, listener) in element.into_iter().chain(viewport) {
            listener(&mut event);
        }

        event
    }

    fn ancestors(&self, element: ElementId) -> Vec<ElementId> {
        let nodes = self.nodes.borrow();
        let mut path = vec![element];
        let mut current = nodes[element.0].parent;

        while let Some(parent) = current {
            path.push(parent);
            current = nodes[parent.0].parent;
        }

        path
    }
}

impl Default for HeadlessTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ElementTree for HeadlessTree {
    type Element = ElementId;

    fn root(&self) -> ElementId {
        ElementId(0)
    }

    fn display_name(&self, element: &ElementId) -> Option<String> {
        self.nodes.borrow().get(element.0)?.name.clone()
    }

    fn children(&self, element: &ElementId) -> Vec<ElementId> {
        self.nodes
            .borrow()
            .get(element.0)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, element: &ElementId) -> Rect {
        self.nodes
            .borrow()
            .get(element.0)
            .map_or(Rect::zero(), |node| node.bounds)
    }

    fn add_listener(
        &self,
        scope: ListenerScope<ElementId>,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        self.listeners.borrow_mut().push(Registration {
            id,
            scope,
            kind,
            listener,
        });

        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|registration| registration.id != id);
    }

    fn set_hidden(&self, element: &ElementId, hidden: bool) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(element.0) {
            node.hidden = hidden;
        }
    }

    async fn layout_complete(&self) {
        let receiver = self.layout.borrow_mut().take();
        if let Some(receiver) = receiver {
            // A dropped sender also means layout is over.
            let _ = receiver.await;
        }
    }
}

/// A call made to [`RecordingMenus`]
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCall<E> {
    Created(usize),
    OpenedAtPoint(usize, Point),
    OpenedFromElement(usize, E),
    ClassUpdated(usize, Option<String>),
}

impl<E> MenuCall<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::OpenedAtPoint(..) | Self::OpenedFromElement(..))
    }
}

struct RecordedMenu {
    tree: MenuTree,
    delegate: Option<Rc<dyn MenuDelegate>>,
}

/// Menu library that records calls instead of showing menus
///
/// Handles are indices in creation order.
pub struct RecordingMenus<E> {
    menus: RefCell<Vec<RecordedMenu>>,
    calls: RefCell<Vec<MenuCall<E>>>,
}

impl<E: fmt::Debug> fmt::Debug for RecordingMenus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingMenus")
            .field("menus", &self.menus.borrow().len())
            .field("calls", &self.calls.borrow())
            .finish()
    }
}

impl<E: Clone> RecordingMenus<E> {
    pub fn new() -> Self {
        Self {
            menus: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every call, in order
    pub fn calls(&self) -> Vec<MenuCall<E>> {
        self.calls.borrow().clone()
    }

    /// Only the calls that opened a menu
    pub fn opened(&self) -> Vec<MenuCall<E>> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_open())
            .cloned()
            .collect()
    }

    pub fn created_count(&self) -> usize {
        self.menus.borrow().len()
    }

    /// Tree of the menu behind `handle`
    pub fn menu(&self, handle: usize) -> Option<MenuTree> {
        self.menus.borrow().get(handle).map(|menu| menu.tree.clone())
    }

    /// Simulate the user picking the item at `path` in menu `handle`
    ///
    /// Returns `false` if there is no such item or no delegate.
    pub fn select(&self, handle: usize, path: &[usize]) -> bool {
        let (tree, delegate) = match self.menus.borrow().get(handle) {
            Some(menu) => (menu.tree.clone(), menu.delegate.clone()),
            None => return false,
        };

        match (tree.item_at(path), delegate) {
            (Some(item), Some(delegate)) => {
                delegate.menu_did_select_item(&tree, item);
                true
            }
            _ => false,
        }
    }
}

impl<E: Clone> Default for RecordingMenus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> MenuLibrary<E> for RecordingMenus<E> {
    type Handle = usize;

    fn create_menu(&self, tree: &MenuTree) -> usize {
        let mut menus = self.menus.borrow_mut();
        menus.push(RecordedMenu {
            tree: tree.clone(),
            delegate: None,
        });

        let handle = menus.len() - 1;
        self.calls.borrow_mut().push(MenuCall::Created(handle));
        handle
    }

    fn set_delegate(&self, handle: &usize, delegate: Rc<dyn MenuDelegate>) {
        if let Some(menu) = self.menus.borrow_mut().get_mut(*handle) {
            menu.delegate = Some(delegate);
        }
    }

    fn open_at_point(&self, handle: &usize, point: Point) {
        self.calls
            .borrow_mut()
            .push(MenuCall::OpenedAtPoint(*handle, point));
    }

    fn open_from_element(&self, handle: &usize, element: &E) {
        self.calls
            .borrow_mut()
            .push(MenuCall::OpenedFromElement(*handle, element.clone()));
    }

    fn update_menu_class(&self, handle: &usize, css_class: Option<&str>) {
        if let Some(menu) = self.menus.borrow_mut().get_mut(*handle) {
            menu.tree.css_class = css_class.map(str::to_string);
        }
        self.calls
            .borrow_mut()
            .push(MenuCall::ClassUpdated(*handle, css_class.map(str::to_string)));
    }
}
