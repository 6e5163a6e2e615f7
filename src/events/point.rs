//! Normalized coordinates for heterogeneous pointer input

use crate::events::event::{InputEvent, MouseEvent, Pointer, Touch};
use crate::layout::Point;

/// Anything that can report where a pointer is
///
/// Client coordinates anchor menus, page coordinates drive long-press
/// slop tracking.
pub trait PointSource {
    /// Position relative to the viewport
    fn client_point(&self) -> Option<Point>;

    /// Position relative to the document
    fn page_point(&self) -> Option<Point>;
}

impl PointSource for MouseEvent {
    fn client_point(&self) -> Option<Point> {
        Some(self.client)
    }

    fn page_point(&self) -> Option<Point> {
        Some(self.page)
    }
}

impl PointSource for Touch {
    fn client_point(&self) -> Option<Point> {
        Some(self.client)
    }

    fn page_point(&self) -> Option<Point> {
        Some(self.page)
    }
}

/// Touch events report the first changed touch
impl PointSource for InputEvent {
    fn client_point(&self) -> Option<Point> {
        match &self.pointer {
            Pointer::Mouse(mouse) => mouse.client_point(),
            Pointer::Touch(touch) => touch.changed_touches.first()?.client_point(),
        }
    }

    fn page_point(&self) -> Option<Point> {
        match &self.pointer {
            Pointer::Mouse(mouse) => mouse.page_point(),
            Pointer::Touch(touch) => touch.changed_touches.first()?.page_point(),
        }
    }
}
