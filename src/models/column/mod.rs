// Column module
// Grid lanes keyed by professional or by physical treatment room ("box")

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the synthetic column used when no appointment has a box assigned.
pub const UNASSIGNED_BOX_ID: &str = "unassigned";

/// Label shown for the synthetic unassigned column.
pub const UNASSIGNED_BOX_LABEL: &str = "Unassigned";

/// Which axis the grid columns are keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    #[serde(alias = "profesional")]
    Professional,
    Box,
}

impl GroupBy {
    /// Column kind produced when grouping by this axis
    pub fn column_kind(self) -> ColumnKind {
        match self {
            GroupBy::Professional => ColumnKind::Professional,
            GroupBy::Box => ColumnKind::Box,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Professional,
    Box,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Professional => write!(f, "professional"),
            ColumnKind::Box => write!(f, "box"),
        }
    }
}

/// One lane of the time grid.
///
/// Columns are derived on every render from the appointment set and/or the
/// roster and are never persisted. Within one grid every column has the same
/// [`ColumnKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn professional(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnKind::Professional,
        }
    }

    /// Box column labelled `Box <id>`
    pub fn boxed(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: format!("Box {}", id),
            id,
            kind: ColumnKind::Box,
        }
    }

    pub fn unassigned_box() -> Self {
        Self {
            id: UNASSIGNED_BOX_ID.to_string(),
            label: UNASSIGNED_BOX_LABEL.to_string(),
            kind: ColumnKind::Box,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.kind == ColumnKind::Box && self.id == UNASSIGNED_BOX_ID
    }
}

/// Roster entry supplied by the controller for professional-mode grids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    #[serde(alias = "nombre")]
    pub name: String,
}

impl Professional {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn to_column(&self) -> Column {
        Column::professional(self.id.clone(), self.name.clone())
    }
}
