use crate::coords::{CellCoord, parse_cell_name};
use std::fmt;

pub const DEFAULT_ID_PREFIX: &str = "GRID_LABEL_";

/// Scene item identifier as seen through a label namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemId {
    /// A label this crate created for the given cell.
    Owned(CellCoord),
    /// Carries the namespace prefix but no cell name after it. Still ours to
    /// remove.
    Reserved(String),
    /// Anything else in the scene.
    Opaque(String),
}

impl ItemId {
    pub fn is_owned(&self) -> bool {
        matches!(self, ItemId::Owned(_))
    }

    /// True for every identifier under the namespace prefix.
    pub fn is_label(&self) -> bool {
        !matches!(self, ItemId::Opaque(_))
    }

    pub fn coord(&self) -> Option<CellCoord> {
        match self {
            ItemId::Owned(coord) => Some(*coord),
            ItemId::Reserved(_) | ItemId::Opaque(_) => None,
        }
    }
}

/// Encodes cells to host identifiers and classifies host identifiers back.
///
/// Every identifier under the prefix is reserved, so [`LabelNamespace::classify`]
/// never reports one as [`ItemId::Opaque`], even when the suffix is not a cell
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNamespace {
    prefix: String,
}

impl LabelNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, coord: CellCoord) -> String {
        format!("{}{}", self.prefix, coord.name())
    }

    pub fn classify(&self, raw: &str) -> ItemId {
        match raw.strip_prefix(self.prefix.as_str()) {
            None => ItemId::Opaque(raw.to_string()),
            Some(suffix) => match parse_cell_name(suffix) {
                Some(coord) => ItemId::Owned(coord),
                None => ItemId::Reserved(raw.to_string()),
            },
        }
    }

    /// Renders an [`ItemId`] back into the host's string form.
    pub fn to_raw(&self, id: &ItemId) -> String {
        match id {
            ItemId::Owned(coord) => self.encode(*coord),
            ItemId::Reserved(raw) | ItemId::Opaque(raw) => raw.clone(),
        }
    }
}

impl Default for LabelNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl fmt::Display for LabelNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}
