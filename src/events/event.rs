//! Input events delivered by the host to gesture listeners

use crate::layout::Point;

/// Kinds of native events a listener can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Secondary-button click or platform context gesture
    ContextMenu,
    /// Mouse button pressed
    MouseDown,
    /// Mouse moved
    MouseMove,
    /// Mouse button released
    MouseUp,
    /// Finger placed on the surface
    TouchStart,
    /// Finger moved
    TouchMove,
    /// Finger lifted
    TouchEnd,
    /// Touch interrupted by the platform
    TouchCancel,
}

impl EventKind {
    /// Whether this kind is produced by a touch surface
    pub fn is_touch(self) -> bool {
        matches!(
            self,
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// Types of mouse events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventType {
    /// Mouse button pressed
    Down,
    /// Mouse button released
    Up,
    /// Mouse moved
    Move,
    /// Context menu requested (usually a right click)
    ContextMenu,
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button (scroll wheel)
    Middle,
    /// Right mouse button
    Right,
}

impl MouseButton {
    /// The primary button is the one a long click is tracked for
    pub fn is_primary(self) -> bool {
        self == Self::Left
    }
}

/// Mouse event containing position and button information
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Type of mouse event
    pub event_type: MouseEventType,
    /// Which mouse button was involved
    pub button: MouseButton,
    /// Position relative to the viewport
    pub client: Point,
    /// Position relative to the document
    pub page: Point,
}

impl MouseEvent {
    /// Create a mouse event whose client and page coordinates coincide
    pub fn new(event_type: MouseEventType, button: MouseButton, x: f32, y: f32) -> Self {
        Self {
            event_type,
            button,
            client: Point::new(x, y),
            page: Point::new(x, y),
        }
    }
}

/// Touch event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEventType {
    /// Touch start
    Start,
    /// Touch move
    Move,
    /// Touch end
    End,
    /// Touch cancel
    Cancel,
}

/// Touch point
#[derive(Debug, Clone, PartialEq)]
pub struct Touch {
    /// Touch identifier, stable for the lifetime of the contact
    pub id: u64,
    /// Position relative to the viewport
    pub client: Point,
    /// Position relative to the document
    pub page: Point,
}

impl Touch {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            client: Point::new(x, y),
            page: Point::new(x, y),
        }
    }
}

/// Touch event carrying the touches that changed
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Type of touch event
    pub event_type: TouchEventType,
    /// Touches whose state changed in this event
    pub changed_touches: Vec<Touch>,
}

impl TouchEvent {
    pub fn new(event_type: TouchEventType, changed_touches: Vec<Touch>) -> Self {
        Self {
            event_type,
            changed_touches,
        }
    }

    /// Find the changed touch with the given identifier
    pub fn touch(&self, id: u64) -> Option<&Touch> {
        self.changed_touches.iter().find(|touch| touch.id == id)
    }
}

/// Payload of an [`InputEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum Pointer {
    Mouse(MouseEvent),
    Touch(TouchEvent),
}

/// A native input event as seen by a gesture listener
///
/// Listeners receive the event mutably so they can suppress the host's
/// default handling with [`InputEvent::prevent_default`].
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub pointer: Pointer,
    default_prevented: bool,
}

impl InputEvent {
    pub fn mouse(event: MouseEvent) -> Self {
        Self {
            pointer: Pointer::Mouse(event),
            default_prevented: false,
        }
    }

    pub fn touch(event: TouchEvent) -> Self {
        Self {
            pointer: Pointer::Touch(event),
            default_prevented: false,
        }
    }

    /// Shorthand for a right-click context menu event at a viewport position
    pub fn context_menu(x: f32, y: f32) -> Self {
        Self::mouse(MouseEvent::new(
            MouseEventType::ContextMenu,
            MouseButton::Right,
            x,
            y,
        ))
    }

    /// The listener kind this event is delivered to
    pub fn kind(&self) -> EventKind {
        match &self.pointer {
            Pointer::Mouse(mouse) => match mouse.event_type {
                MouseEventType::Down => EventKind::MouseDown,
                MouseEventType::Up => EventKind::MouseUp,
                MouseEventType::Move => EventKind::MouseMove,
                MouseEventType::ContextMenu => EventKind::ContextMenu,
            },
            Pointer::Touch(touch) => match touch.event_type {
                TouchEventType::Start => EventKind::TouchStart,
                TouchEventType::Move => EventKind::TouchMove,
                TouchEventType::End => EventKind::TouchEnd,
                TouchEventType::Cancel => EventKind::TouchCancel,
            },
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self.pointer, Pointer::Touch(_))
    }

    /// Prevent the host's default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check if default is prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(InputEvent::context_menu(0.0, 0.0).kind(), EventKind::ContextMenu);

        let start = InputEvent::touch(TouchEvent::new(
            TouchEventType::Start,
            vec![Touch::new(1, 0.0, 0.0)],
        ));
        assert_eq!(start.kind(), EventKind::TouchStart);
        assert!(start.is_touch());
        assert!(start.kind().is_touch());
        assert!(!EventKind::MouseMove.is_touch());
    }

    #[test]
    fn test_prevent_default() {
        let mut event = InputEvent::context_menu(1.0, 2.0);
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
