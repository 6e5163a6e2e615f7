//! Menu data model and the capability contract of the menu library
//!
//! Menus are built once from their data source and rebuilt wholesale when it
//! changes. Rendering and positioning an open menu belong to an external
//! library reached through [`MenuLibrary`].

pub mod builder;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::layout::Point;

pub use builder::{
    build_from_enumeration, build_from_rows, rows_of, MenuTreeBuilder, RowFields,
    StateDefinitions,
};

/// Prefix of the per-item selection signal
pub const ITEM_SIGNAL_PREFIX: &str = "Menu:";

/// A single selectable entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<MenuTree>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            css_class: None,
            submenu: None,
        }
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    pub fn with_submenu(mut self, submenu: MenuTree) -> Self {
        self.submenu = Some(submenu);
        self
    }

    /// Name of the signal emitted when this item is selected
    pub fn signal_name(&self) -> String {
        format!("{}{}", ITEM_SIGNAL_PREFIX, self.name)
    }
}

/// An ordered, possibly nested list of items
///
/// Never empty: builders return `None` instead of an empty tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuTree {
    pub items: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
}

impl MenuTree {
    /// Wrap `items`, or `None` if there are none
    pub fn from_items(items: Vec<MenuItem>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        Some(Self {
            items,
            css_class: None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the root items, in order
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    /// Follow a path of item indices through nested submenus
    pub fn item_at(&self, path: &[usize]) -> Option<&MenuItem> {
        let (first, rest) = path.split_first()?;
        let item = self.items.get(*first)?;

        if rest.is_empty() {
            Some(item)
        } else {
            item.submenu.as_ref()?.item_at(rest)
        }
    }
}

/// Per-item signal names a host declares for a menu's root items
pub fn selection_signal_names(tree: &MenuTree) -> Vec<String> {
    tree.items.iter().map(MenuItem::signal_name).collect()
}

/// Receives the user's choice from an open menu
pub trait MenuDelegate {
    fn menu_did_select_item(&self, menu: &MenuTree, item: &MenuItem);
}

/// Capability interface of the external menu library
///
/// `E` is the host's element reference, used for element-anchored menus.
pub trait MenuLibrary<E> {
    /// Library-side handle of a created menu
    type Handle: Clone;

    /// Create a menu for `tree`
    fn create_menu(&self, tree: &MenuTree) -> Self::Handle;

    /// Install the object notified about selections in `handle`
    fn set_delegate(&self, handle: &Self::Handle, delegate: Rc<dyn MenuDelegate>);

    /// Open as a desktop-style menu at `point`
    fn open_at_point(&self, handle: &Self::Handle, point: Point);

    /// Open as a touch-style menu attached to `element`
    fn open_from_element(&self, handle: &Self::Handle, element: &E);

    /// Apply a new whole-menu style class
    fn update_menu_class(&self, _handle: &Self::Handle, _css_class: Option<&str>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MenuTree {
        MenuTree::from_items(vec![
            MenuItem::new("Edit"),
            MenuItem::new("More").with_submenu(
                MenuTree::from_items(vec![MenuItem::new("Delete"), MenuItem::new("Rename")])
                    .unwrap(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_items_are_absent() {
        assert_eq!(MenuTree::from_items(Vec::new()), None);
    }

    #[test]
    fn test_item_at_follows_submenus() {
        let tree = sample();
        assert_eq!(tree.item_at(&[0]).map(|i| i.name.as_str()), Some("Edit"));
        assert_eq!(tree.item_at(&[1, 1]).map(|i| i.name.as_str()), Some("Rename"));
        assert_eq!(tree.item_at(&[0, 0]), None);
        assert_eq!(tree.item_at(&[]), None);
    }

    #[test]
    fn test_selection_signal_names() {
        assert_eq!(selection_signal_names(&sample()), vec!["Menu:Edit", "Menu:More"]);
    }
}
