//! Republishes menu selections as named signals

use std::cell::RefCell;

use log::debug;

use crate::events::EventEmitter;
use crate::menu::{MenuDelegate, MenuItem, MenuTree};

/// Name of the signal emitted for every selection
pub const SELECTION_CHANGED: &str = "menuDidSelectItem";

/// Payload of selection signals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Name of the selected item
    pub item: String,
}

/// Records the selected item and notifies subscribers
///
/// Each selection emits [`SELECTION_CHANGED`] followed by the item's own
/// signal, `"Menu:<name>"`.
#[derive(Debug, Default)]
pub struct SelectionReporter {
    selected: RefCell<Option<String>>,
    signals: EventEmitter<Selection>,
}

impl SelectionReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the last selected item
    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    /// Signals emitted on selection
    pub fn signals(&self) -> &EventEmitter<Selection> {
        &self.signals
    }

    pub fn on_item_selected(&self, item: &MenuItem) {
        debug!("menu item `{}` selected", item.name);
        *self.selected.borrow_mut() = Some(item.name.clone());

        let selection = Selection {
            item: item.name.clone(),
        };
        self.signals.emit(SELECTION_CHANGED, &selection);
        self.signals.emit(&item.signal_name(), &selection);
    }
}

impl MenuDelegate for SelectionReporter {
    fn menu_did_select_item(&self, _menu: &MenuTree, item: &MenuItem) {
        self.on_item_selected(item);
    }
}
