// Popup menu trigger for the Orbit UI Framework
pub mod config;
pub mod events;
pub mod gesture;
pub mod headless;
pub mod layout;
pub mod menu;
pub mod router;
pub mod selection;
pub mod target;
pub mod timer;

use router::RouterPhase;

/// Version of the popup menu crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::{DataSourceKind, DisplayMode, MenuConfig, TargetKind};
    pub use crate::events::{
        EventKind, InputEvent, MouseButton, MouseEvent, MouseEventType, PointSource, Touch,
        TouchEvent, TouchEventType,
    };
    pub use crate::gesture::{LongPressConfig, LongPressDetector};
    pub use crate::layout::{Point, Rect};
    pub use crate::menu::{
        build_from_enumeration, build_from_rows, MenuDelegate, MenuItem, MenuLibrary, MenuTree,
        RowFields, StateDefinitions,
    };
    pub use crate::router::{GestureRouter, MenuAnchor, RouterPhase, RouterServices};
    pub use crate::selection::{Selection, SelectionReporter, SELECTION_CHANGED};
    pub use crate::target::{resolve, ElementTree, Listener, ListenerId, ListenerScope};
    pub use crate::timer::{TimerHost, TimerId, VirtualTimers};
    pub use crate::Error;
}

/// Errors that can occur while configuring or driving a popup menu
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid lifecycle transition: cannot {operation} while {phase:?}")]
    InvalidTransition {
        phase: RouterPhase,
        operation: &'static str,
    },

    #[error("Listeners are already attached to a target")]
    AlreadyBound,
}
