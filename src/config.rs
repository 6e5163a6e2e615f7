//! Popup menu configuration
//!
//! Field names follow the host's property names so a serialized widget
//! configuration can be loaded directly with [`MenuConfig::from_json`].

use serde::{Deserialize, Serialize};

use crate::events::EventKind;
use crate::gesture::LongPressConfig;
use crate::menu::RowFields;
use crate::Error;

/// Where menu entries come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataSourceKind {
    /// A named state definition supplying display strings
    #[default]
    #[serde(rename = "state")]
    State,
    /// A row source, possibly with nested rows for submenus
    #[serde(rename = "infotable", alias = "rows")]
    Infotable,
}

/// Which element reacts to menu gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    /// The menu's own element
    #[default]
    #[serde(rename = "thisWidget", alias = "self")]
    ThisWidget,
    /// Another element, found by display name
    #[serde(rename = "reference")]
    Reference,
}

/// How an open menu is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Decided by the kind of event that opened the menu
    #[default]
    Auto,
    /// Always a desktop menu anchored to a point
    Mouse,
    /// Always a touch menu anchored to the target element
    Touch,
}

/// Presentation chosen for one opening of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStyle {
    Mouse,
    Touch,
}

impl DisplayMode {
    /// Pick the presentation for a menu opened by an event of `trigger` kind
    ///
    /// Only the event kind is consulted, never device capabilities.
    /// Programmatic opens pass `None` and get the mouse style unless the
    /// touch style is forced.
    pub fn resolve(self, trigger: Option<EventKind>) -> MenuStyle {
        match (self, trigger) {
            (Self::Touch, _) => MenuStyle::Touch,
            (Self::Auto, Some(kind)) if kind.is_touch() => MenuStyle::Touch,
            _ => MenuStyle::Mouse,
        }
    }
}

/// Complete configuration of a popup menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuConfig {
    pub data_source_kind: DataSourceKind,
    /// State definition name when the data source is [`DataSourceKind::State`]
    pub menu_definition: Option<String>,
    pub name_field: String,
    pub submenu_field: Option<String>,
    pub class_field: Option<String>,
    pub target_kind: TargetKind,
    /// Display name of the target when the target is a reference
    pub target_widget: Option<String>,
    /// Custom classes applied to the whole menu
    pub menu_class: Option<String>,
    pub display_mode: DisplayMode,
    /// Open on a long press of the primary mouse button
    pub trigger_on_long_click: bool,
    /// Open on right click
    pub trigger_on_right_click: bool,
    pub long_press: LongPressConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            data_source_kind: DataSourceKind::State,
            menu_definition: None,
            name_field: "name".to_string(),
            submenu_field: None,
            class_field: None,
            target_kind: TargetKind::ThisWidget,
            target_widget: None,
            menu_class: None,
            display_mode: DisplayMode::Auto,
            trigger_on_long_click: false,
            trigger_on_right_click: true,
            long_press: LongPressConfig::default(),
        }
    }
}

impl MenuConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Row source keys, with blank optional keys treated as unset
    pub fn row_fields(&self) -> RowFields {
        RowFields {
            name: self.name_field.clone(),
            submenu: non_blank(self.submenu_field.as_deref()),
            css_class: non_blank(self.class_field.as_deref()),
        }
    }

    /// Whole-menu class, or `None` when blank
    pub fn menu_class(&self) -> Option<String> {
        non_blank(self.menu_class.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
