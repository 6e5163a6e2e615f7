//! Menu tree construction from declarative data sources
//!
//! Two sources are supported: an ordered enumeration of display strings
//! looked up in a [`StateDefinitions`] provider, and a row source of JSON
//! records that may nest further row sources for submenus.
//!
//! Building is best-effort. Anything malformed is skipped, and a source that
//! yields no items yields no menu.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::{DataSourceKind, MenuConfig};
use crate::menu::{MenuItem, MenuTree};

/// Read-only lookup of named state definitions
pub trait StateDefinitions {
    /// Display strings of the definition called `name`, in order
    fn display_strings(&self, name: &str) -> Option<Vec<String>>;
}

impl StateDefinitions for HashMap<String, Vec<String>> {
    fn display_strings(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).cloned()
    }
}

/// Record keys used when reading a row source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub name: String,
    pub submenu: Option<String>,
    pub css_class: Option<String>,
}

impl RowFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submenu: None,
            css_class: None,
        }
    }

    pub fn with_submenu(mut self, submenu: impl Into<String>) -> Self {
        self.submenu = Some(submenu.into());
        self
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }
}

/// Build a flat menu with one item per non-blank name
pub fn build_from_enumeration<I, S>(names: I) -> Option<MenuTree>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items = names
        .into_iter()
        .filter(|name| !name.as_ref().trim().is_empty())
        .map(|name| MenuItem::new(name.as_ref()))
        .collect();

    MenuTree::from_items(items)
}

/// The rows of a row source
///
/// Accepts a JSON array of records or a table object carrying a `rows`
/// array.
pub fn rows_of(source: &Value) -> Option<&[Value]> {
    match source {
        Value::Array(rows) => Some(rows),
        Value::Object(table) => table.get("rows")?.as_array().map(Vec::as_slice),
        _ => None,
    }
}

/// Build a possibly nested menu from a row source
///
/// Submenus are built recursively from the value under `fields.submenu`.
/// The depth is bounded by the input, which is an owned tree and therefore
/// acyclic.
pub fn build_from_rows(source: &Value, fields: &RowFields) -> Option<MenuTree> {
    let rows = rows_of(source)?;

    let items = rows
        .iter()
        .filter_map(|row| match row.as_object() {
            Some(record) => item_from_record(record, fields),
            None => {
                warn!("skipping menu row that is not a record: {}", row);
                None
            }
        })
        .collect();

    MenuTree::from_items(items)
}

fn item_from_record(record: &Map<String, Value>, fields: &RowFields) -> Option<MenuItem> {
    let Some(name) = record.get(&fields.name).and_then(scalar_text) else {
        warn!("skipping menu row without a usable `{}` field", fields.name);
        return None;
    };

    if name.trim().is_empty() {
        return None;
    }

    let mut item = MenuItem::new(name);

    item.css_class = fields
        .css_class
        .as_ref()
        .and_then(|key| record.get(key))
        .and_then(scalar_text)
        .filter(|class| !class.is_empty());

    item.submenu = fields
        .submenu
        .as_ref()
        .and_then(|key| record.get(key))
        .and_then(|nested| build_from_rows(nested, fields));

    Some(item)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Builds the root menu for a configuration
#[derive(Clone)]
pub struct MenuTreeBuilder {
    states: Rc<dyn StateDefinitions>,
}

impl fmt::Debug for MenuTreeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuTreeBuilder").finish_non_exhaustive()
    }
}

impl MenuTreeBuilder {
    pub fn new(states: Rc<dyn StateDefinitions>) -> Self {
        Self { states }
    }

    /// Build the menu the configuration describes
    ///
    /// `rows` is the current row source and is only consulted when the
    /// configured data source is a row source.
    pub fn build(&self, config: &MenuConfig, rows: Option<&Value>) -> Option<MenuTree> {
        let built = match config.data_source_kind {
            DataSourceKind::State => {
                let definition = config.menu_definition.as_deref()?;
                let names = self.states.display_strings(definition);
                if names.is_none() {
                    warn!("state definition `{}` not found", definition);
                }
                build_from_enumeration(names?)
            }
            DataSourceKind::Infotable => build_from_rows(rows?, &config.row_fields()),
        };

        let mut tree = built?;
        tree.css_class = config.menu_class();

        debug!("built menu with {} root items", tree.len());
        Some(tree)
    }
}
