//! Gesture router
//!
//! ## Overview
//!
//! The router owns the menu built from the configured data source, finds the
//! element that should react to gestures, attaches listeners to it, and asks
//! the menu library to open the menu when a gesture calls for it.
//!
//! ## Lifecycle
//!
//! `Uninitialized → Attached → TornDown`, each transition happening once.
//! [`GestureRouter::attach`] runs after the host rendered the menu's element;
//! when the target is a named reference it waits for the host's
//! layout-complete signal before searching the element tree.
//! [`GestureRouter::teardown`] removes every listener attached since, and
//! cancels any pending long press.
//!
//! ## Triggers
//!
//! - Right click, when enabled.
//! - Long press on touch, always.
//! - Long press of the primary mouse button, when enabled. Movement and
//!   release are tracked on the whole viewport while the button is down.
//!
//! ## Presentation
//!
//! [`DisplayMode`] decides per opening. Touch-style menus are anchored to the
//! target element. Mouse-style menus open at the event's client position, or
//! at the middle of the target's bottom edge when opened programmatically.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;

use crate::config::{DataSourceKind, DisplayMode, MenuConfig, MenuStyle, TargetKind};
use crate::events::{EventKind, InputEvent, Pointer, PointSource, TargetBinding, Touch};
use crate::gesture::{LongPressDetector, PointerId};
use crate::layout::Point;
use crate::menu::{MenuLibrary, MenuTree, MenuTreeBuilder, StateDefinitions};
use crate::selection::SelectionReporter;
use crate::target::{resolve, ElementTree, Listener};
use crate::timer::TimerHost;
use crate::Error;

/// Lifecycle phase of a [`GestureRouter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    Uninitialized,
    Attached,
    TornDown,
}

/// Where a menu was opened
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAnchor<E> {
    /// Desktop-style menu at a viewport position
    Point(Point),
    /// Touch-style menu attached to an element
    Element(E),
}

/// Collaborators a router depends on
pub struct RouterServices<T, M> {
    pub tree: Rc<T>,
    pub menus: Rc<M>,
    pub states: Rc<dyn StateDefinitions>,
    pub timers: Rc<dyn TimerHost>,
}

struct BuiltMenu<H> {
    tree: MenuTree,
    handle: H,
}

struct Shared<T: ElementTree, M: MenuLibrary<T::Element>> {
    tree: Rc<T>,
    menus: Rc<M>,
    builder: MenuTreeBuilder,
    element: T::Element,
    config: RefCell<MenuConfig>,
    rows: RefCell<Option<Value>>,
    menu: RefCell<Option<BuiltMenu<M::Handle>>>,
    phase: Cell<RouterPhase>,
    binding: RefCell<TargetBinding<T::Element>>,
    press: LongPressDetector,
    reporter: Rc<SelectionReporter>,
}

/// Popup menu trigger attached to one element
pub struct GestureRouter<T: ElementTree, M: MenuLibrary<T::Element>> {
    shared: Rc<Shared<T, M>>,
}

impl<T: ElementTree, M: MenuLibrary<T::Element>> fmt::Debug for GestureRouter<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRouter")
            .field("element", &self.shared.element)
            .field("phase", &self.shared.phase.get())
            .field("target", &self.shared.binding.borrow().element())
            .finish_non_exhaustive()
    }
}

impl<T, M> GestureRouter<T, M>
where
    T: ElementTree + 'static,
    M: MenuLibrary<T::Element> + 'static,
{
    /// Create a router for the menu rendered as `element`
    pub fn new(element: T::Element, config: MenuConfig, services: RouterServices<T, M>) -> Self {
        let RouterServices {
            tree,
            menus,
            states,
            timers,
        } = services;

        let shared = Shared {
            tree,
            menus,
            builder: MenuTreeBuilder::new(states),
            element,
            press: LongPressDetector::new(config.long_press, timers),
            config: RefCell::new(config),
            rows: RefCell::new(None),
            menu: RefCell::new(None),
            phase: Cell::new(RouterPhase::Uninitialized),
            binding: RefCell::new(TargetBinding::new()),
            reporter: Rc::new(SelectionReporter::new()),
        };

        Self {
            shared: Rc::new(shared),
        }
    }

    pub fn phase(&self) -> RouterPhase {
        self.shared.phase.get()
    }

    /// The element gestures are attached to
    pub fn target(&self) -> Option<T::Element> {
        self.shared.binding.borrow().element().cloned()
    }

    /// The current menu, if the data source produced any items
    pub fn menu(&self) -> Option<MenuTree> {
        self.shared.menu.borrow().as_ref().map(|menu| menu.tree.clone())
    }

    pub fn config(&self) -> MenuConfig {
        self.shared.config.borrow().clone()
    }

    /// Selection state and signals
    pub fn selection(&self) -> Rc<SelectionReporter> {
        self.shared.reporter.clone()
    }

    /// Name of the last selected item
    pub fn selected_menu_item(&self) -> Option<String> {
        self.shared.reporter.selected()
    }

    /// Build the menu, resolve the target and attach gesture listeners
    pub async fn attach(&self) -> Result<(), Error> {
        let shared = &self.shared;
        let phase = shared.phase.get();
        if phase != RouterPhase::Uninitialized {
            return Err(Error::InvalidTransition {
                phase,
                operation: "attach",
            });
        }
        shared.phase.set(RouterPhase::Attached);

        shared.rebuild_menu();

        let config = shared.config.borrow().clone();
        let target = match config.target_kind {
            TargetKind::ThisWidget => Some(shared.element.clone()),
            TargetKind::Reference => {
                shared.tree.set_hidden(&shared.element, true);
                shared.tree.layout_complete().await;

                // Torn down while waiting for layout.
                if shared.phase.get() != RouterPhase::Attached {
                    return Ok(());
                }

                shared.find_target(config.target_widget.as_deref())
            }
        };

        let Some(target) = target else {
            debug!("no target, gestures disabled");
            return Ok(());
        };

        debug!("attaching menu gestures to {:?}", target);
        let listeners = shared.listeners(&config);
        shared
            .binding
            .borrow_mut()
            .bind(&*shared.tree, target, listeners)
    }

    /// Open the menu in response to `event`
    ///
    /// Returns where the menu was opened, or `None` when there is no target
    /// or no menu.
    pub fn open_menu_for(&self, event: Option<&mut InputEvent>) -> Option<MenuAnchor<T::Element>> {
        self.shared.open_menu_for(event)
    }

    /// Open the menu programmatically
    pub fn show_menu(&self) -> Option<MenuAnchor<T::Element>> {
        self.open_menu_for(None)
    }

    /// Replace the row source and rebuild the menu from it
    ///
    /// `Value::Null` clears the row source.
    pub fn set_rows(&self, rows: Value) {
        let rows = if rows.is_null() { None } else { Some(rows) };
        *self.shared.rows.borrow_mut() = rows;

        if self.shared.config.borrow().data_source_kind == DataSourceKind::Infotable {
            self.shared.rebuild_menu();
        }
    }

    /// Replace the whole-menu style class without rebuilding
    pub fn set_menu_class(&self, menu_class: Option<String>) {
        let css_class = {
            let mut config = self.shared.config.borrow_mut();
            config.menu_class = menu_class;
            config.menu_class()
        };

        let handle = self.shared.menu.borrow_mut().as_mut().map(|menu| {
            menu.tree.css_class = css_class.clone();
            menu.handle.clone()
        });

        if let Some(handle) = handle {
            self.shared
                .menus
                .update_menu_class(&handle, css_class.as_deref());
        }
    }

    /// Replace the configuration and rebuild the menu
    ///
    /// Listener wiring and long-press timing stay as they were at attach.
    pub fn set_config(&self, config: MenuConfig) {
        *self.shared.config.borrow_mut() = config;
        self.shared.rebuild_menu();
    }

    /// Remove every listener and cancel pending gestures
    pub fn teardown(&self) -> Result<(), Error> {
        let shared = &self.shared;
        let phase = shared.phase.get();
        if phase == RouterPhase::TornDown {
            return Err(Error::InvalidTransition {
                phase,
                operation: "teardown",
            });
        }
        shared.phase.set(RouterPhase::TornDown);

        shared.press.cancel();
        shared.binding.borrow_mut().unbind(&*shared.tree);

        debug!("menu gestures torn down for {:?}", shared.element);
        Ok(())
    }
}

impl<T: ElementTree, M: MenuLibrary<T::Element>> Drop for GestureRouter<T, M> {
    fn drop(&mut self) {
        let shared = &self.shared;
        if shared.phase.get() == RouterPhase::Attached {
            shared.phase.set(RouterPhase::TornDown);
            shared.press.cancel();
            shared.binding.borrow_mut().unbind(&*shared.tree);
        }
    }
}

impl<T, M> Shared<T, M>
where
    T: ElementTree + 'static,
    M: MenuLibrary<T::Element> + 'static,
{
    fn is_attached(&self) -> bool {
        self.phase.get() == RouterPhase::Attached
    }

    fn rebuild_menu(&self) {
        if self.phase.get() == RouterPhase::TornDown {
            return;
        }

        let tree = self
            .builder
            .build(&self.config.borrow(), self.rows.borrow().as_ref());

        let menu = tree.map(|tree| {
            let handle = self.menus.create_menu(&tree);
            self.menus.set_delegate(&handle, self.reporter.clone());
            BuiltMenu { tree, handle }
        });

        if menu.is_none() {
            debug!("data source produced no menu items");
        }
        *self.menu.borrow_mut() = menu;
    }

    fn find_target(&self, name: Option<&str>) -> Option<T::Element> {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            warn!("target is a reference but no target name is configured");
            return None;
        };

        let found = resolve(&*self.tree, name, &self.tree.root());
        if found.is_none() {
            warn!("target `{}` not found", name);
        }
        found
    }

    fn listeners(self: &Rc<Self>, config: &MenuConfig) -> Vec<(EventKind, Listener)> {
        let mut listeners = Vec::new();

        if config.trigger_on_right_click {
            listeners.push((EventKind::ContextMenu, self.listener(Self::on_context_menu)));
        }

        listeners.push((EventKind::TouchStart, self.listener(Self::on_touch_start)));
        listeners.push((EventKind::TouchMove, self.listener(Self::on_touch_move)));
        listeners.push((EventKind::TouchEnd, self.listener(Self::on_touch_end)));
        listeners.push((EventKind::TouchCancel, self.listener(Self::on_touch_end)));

        if config.trigger_on_long_click {
            listeners.push((EventKind::MouseDown, self.listener(Self::on_mouse_down)));
        }

        listeners
    }

    /// Wrap a handler so the listener does not keep the router alive
    fn listener(self: &Rc<Self>, handler: fn(&Rc<Self>, &mut InputEvent)) -> Listener {
        let shared = Rc::downgrade(self);
        Rc::new(move |event: &mut InputEvent| {
            if let Some(shared) = shared.upgrade() {
                if shared.is_attached() {
                    handler(&shared, event);
                }
            }
        })
    }

    fn on_context_menu(self: &Rc<Self>, event: &mut InputEvent) {
        self.open_menu_for(Some(event));
    }

    fn on_touch_start(self: &Rc<Self>, event: &mut InputEvent) {
        if self.press.is_tracking() {
            return;
        }

        let Pointer::Touch(touch) = &event.pointer else {
            return;
        };
        let Some(first) = touch.changed_touches.first() else {
            return;
        };
        let pointer = PointerId::Touch(first.id);
        let Some(origin) = event.page_point() else {
            return;
        };

        let shared = Rc::downgrade(self);
        self.press
            .begin(pointer, origin, event.clone(), move |mut trigger| {
                if let Some(shared) = shared.upgrade() {
                    shared.open_menu_for(Some(&mut trigger));
                }
            });
    }

    /// The tracked touch among the event's changed touches
    fn tracked_touch<'a>(&self, event: &'a InputEvent) -> Option<&'a Touch> {
        let Some(PointerId::Touch(id)) = self.press.tracked_pointer() else {
            return None;
        };

        match &event.pointer {
            Pointer::Touch(touch) => touch.touch(id),
            Pointer::Mouse(_) => None,
        }
    }

    fn on_touch_move(self: &Rc<Self>, event: &mut InputEvent) {
        if let Some(point) = self.tracked_touch(event).and_then(|touch| touch.page_point()) {
            self.press.track_movement(point);
        }
    }

    fn on_touch_end(self: &Rc<Self>, event: &mut InputEvent) {
        if self.tracked_touch(event).is_some() {
            self.press.cancel();
        }
    }

    fn on_mouse_down(self: &Rc<Self>, event: &mut InputEvent) {
        let Pointer::Mouse(mouse) = &event.pointer else {
            return;
        };
        // A touch press in progress also blocks a mouse press.
        if !mouse.button.is_primary() || self.press.is_tracking() {
            return;
        }
        let Some(origin) = event.page_point() else {
            return;
        };

        let shared = Rc::downgrade(self);
        let began = self
            .press
            .begin(PointerId::Mouse, origin, event.clone(), move |mut trigger| {
                if let Some(shared) = shared.upgrade() {
                    shared.open_menu_for(Some(&mut trigger));
                }
            });

        if began {
            let mut binding = self.binding.borrow_mut();
            binding.add_transient(
                &*self.tree,
                EventKind::MouseMove,
                self.listener(Self::on_mouse_move),
            );
            binding.add_transient(
                &*self.tree,
                EventKind::MouseUp,
                self.listener(Self::on_mouse_up),
            );
        }
    }

    fn on_mouse_move(self: &Rc<Self>, event: &mut InputEvent) {
        if self.press.tracked_pointer() != Some(PointerId::Mouse) {
            return;
        }

        if let Some(point) = event.page_point() {
            self.press.track_movement(point);
        }
    }

    fn on_mouse_up(self: &Rc<Self>, _event: &mut InputEvent) {
        if self.press.tracked_pointer() == Some(PointerId::Mouse) {
            self.press.cancel();
        }
        self.binding
            .borrow_mut()
            .release_transient(&*self.tree);
    }

    fn open_menu_for(&self, event: Option<&mut InputEvent>) -> Option<MenuAnchor<T::Element>> {
        let target = self.binding.borrow().element().cloned()?;

        let trigger = event.map(|event| {
            event.prevent_default();
            (event.kind(), event.client_point())
        });

        let handle = self
            .menu
            .borrow()
            .as_ref()
            .map(|menu| menu.handle.clone())?;

        let display_mode: DisplayMode = self.config.borrow().display_mode;
        match display_mode.resolve(trigger.map(|(kind, _)| kind)) {
            MenuStyle::Touch => {
                debug!("opening touch menu from {:?}", target);
                self.menus.open_from_element(&handle, &target);
                Some(MenuAnchor::Element(target))
            }
            MenuStyle::Mouse => {
                let point = trigger
                    .and_then(|(_, point)| point)
                    .unwrap_or_else(|| self.tree.bounding_box(&target).bottom_center());
                debug!("opening mouse menu at {:?}", point);
                self.menus.open_at_point(&handle, point);
                Some(MenuAnchor::Point(point))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MouseButton, MouseEvent, MouseEventType, Touch, TouchEvent, TouchEventType};
    use crate::headless::{ElementId, HeadlessTree, MenuCall, RecordingMenus};
    use crate::layout::Rect;
    use crate::timer::VirtualTimers;
    use futures::executor::block_on;
    use std::collections::HashMap;
    use std::time::Duration;

    struct Fixture {
        tree: Rc<HeadlessTree>,
        menus: Rc<RecordingMenus<ElementId>>,
        timers: Rc<VirtualTimers>,
        element: ElementId,
    }

    impl Fixture {
        fn new() -> Self {
            let tree = Rc::new(HeadlessTree::new());
            let element = tree.add_element(&tree.root(), "menu", Rect::new(10.0, 10.0, 100.0, 40.0));
            Self {
                tree,
                menus: Rc::new(RecordingMenus::new()),
                timers: Rc::new(VirtualTimers::new()),
                element,
            }
        }

        fn router(&self, config: MenuConfig) -> GestureRouter<HeadlessTree, RecordingMenus<ElementId>> {
            let mut states = HashMap::new();
            states.insert("Actions".to_string(), vec!["Cut".to_string(), "Paste".to_string()]);

            GestureRouter::new(
                self.element,
                config,
                RouterServices {
                    tree: self.tree.clone(),
                    menus: self.menus.clone(),
                    states: Rc::new(states),
                    timers: self.timers.clone(),
                },
            )
        }
    }

    fn state_config() -> MenuConfig {
        MenuConfig {
            menu_definition: Some("Actions".to_string()),
            ..MenuConfig::default()
        }
    }

    fn touch(event_type: TouchEventType, id: u64, x: f32, y: f32) -> InputEvent {
        InputEvent::touch(TouchEvent::new(event_type, vec![Touch::new(id, x, y)]))
    }

    #[test]
    fn test_attach_twice_is_rejected() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());

        block_on(router.attach()).unwrap();
        let error = block_on(router.attach()).unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidTransition {
                phase: RouterPhase::Attached,
                ..
            }
        ));
    }

    #[test]
    fn test_open_without_target_is_noop() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());

        assert_eq!(router.show_menu(), None);
        assert!(fixture.menus.opened().is_empty());
    }

    #[test]
    fn test_open_without_menu_is_noop() {
        let fixture = Fixture::new();
        let router = fixture.router(MenuConfig::default());
        block_on(router.attach()).unwrap();

        let mut event = InputEvent::context_menu(1.0, 1.0);
        assert_eq!(router.open_menu_for(Some(&mut event)), None);
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_show_menu_uses_bottom_center() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());
        block_on(router.attach()).unwrap();

        assert_eq!(router.show_menu(), Some(MenuAnchor::Point(Point::new(60.0, 50.0))));
    }

    #[test]
    fn test_display_modes() {
        let cases = [
            (DisplayMode::Auto, true, true),
            (DisplayMode::Auto, false, false),
            (DisplayMode::Mouse, true, false),
            (DisplayMode::Touch, false, true),
            (DisplayMode::Touch, true, true),
        ];

        for (mode, touch_event, expect_element) in cases {
            let fixture = Fixture::new();
            let router = fixture.router(MenuConfig {
                display_mode: mode,
                ..state_config()
            });
            block_on(router.attach()).unwrap();

            let mut event = if touch_event {
                touch(TouchEventType::Start, 1, 30.0, 20.0)
            } else {
                InputEvent::context_menu(30.0, 20.0)
            };

            let anchor = router.open_menu_for(Some(&mut event)).unwrap();
            if expect_element {
                assert_eq!(anchor, MenuAnchor::Element(fixture.element), "{:?}", mode);
            } else {
                assert_eq!(anchor, MenuAnchor::Point(Point::new(30.0, 20.0)), "{:?}", mode);
            }
        }
    }

    #[test]
    fn test_mouse_long_click_tracks_viewport() {
        let fixture = Fixture::new();
        let router = fixture.router(MenuConfig {
            trigger_on_long_click: true,
            ..state_config()
        });
        block_on(router.attach()).unwrap();
        let baseline = fixture.tree.listener_count();

        let down = InputEvent::mouse(MouseEvent::new(
            MouseEventType::Down,
            MouseButton::Left,
            20.0,
            20.0,
        ));
        fixture.tree.dispatch(&fixture.element, down);
        assert_eq!(fixture.tree.listener_count(), baseline + 2);

        // Movement outside the target still counts.
        let moved = InputEvent::mouse(MouseEvent::new(
            MouseEventType::Move,
            MouseButton::Left,
            20.0,
            45.0,
        ));
        fixture.tree.dispatch_viewport(moved);
        fixture.timers.advance(Duration::from_secs(1));
        assert!(fixture.menus.opened().is_empty());

        let up = InputEvent::mouse(MouseEvent::new(MouseEventType::Up, MouseButton::Left, 20.0, 45.0));
        fixture.tree.dispatch_viewport(up);
        assert_eq!(fixture.tree.listener_count(), baseline);
    }

    #[test]
    fn test_secondary_button_does_not_start_long_click() {
        let fixture = Fixture::new();
        let router = fixture.router(MenuConfig {
            trigger_on_long_click: true,
            trigger_on_right_click: false,
            ..state_config()
        });
        block_on(router.attach()).unwrap();

        let down = InputEvent::mouse(MouseEvent::new(
            MouseEventType::Down,
            MouseButton::Right,
            20.0,
            20.0,
        ));
        fixture.tree.dispatch(&fixture.element, down);
        fixture.timers.advance(Duration::from_secs(1));

        assert!(fixture.menus.opened().is_empty());
    }

    #[test]
    fn test_set_menu_class_rewrites_in_place() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());
        block_on(router.attach()).unwrap();
        let created = fixture.menus.created_count();

        router.set_menu_class(Some("dark".to_string()));

        assert_eq!(router.menu().unwrap().css_class.as_deref(), Some("dark"));
        assert_eq!(fixture.menus.created_count(), created);
        assert!(fixture
            .menus
            .calls()
            .contains(&MenuCall::ClassUpdated(0, Some("dark".to_string()))));
    }

    #[test]
    fn test_teardown_twice_is_rejected() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());
        block_on(router.attach()).unwrap();

        router.teardown().unwrap();
        assert!(router.teardown().is_err());
        assert_eq!(router.phase(), RouterPhase::TornDown);
    }

    #[test]
    fn test_drop_detaches_listeners() {
        let fixture = Fixture::new();
        let router = fixture.router(state_config());
        block_on(router.attach()).unwrap();
        assert!(fixture.tree.listener_count() > 0);

        drop(router);
        assert_eq!(fixture.tree.listener_count(), 0);
    }
}
