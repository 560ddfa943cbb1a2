// src/models.rs

use std::fmt;

/// Number of logical fields in one row of the upstream table.
pub const SCHEMA_LEN: usize = 7;

/// Header row + up row + down row.
pub const RECORD_FIELDS: usize = 3 * SCHEMA_LEN;

/// Logical columns of the expression table, in upstream order.
///
/// Each slot occupies three physical positions in the flat record:
/// `index` (header row), `index + 7` (up row) and `index + 14` (down row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    Regulation,
    TreatmentProject,
    ExpressionFpkm,
    Experiment,
    Stderr,
    AvgLog2fc,
    SingleDpts,
}

/// How the values of a slot are laid out inside one direction's field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLayout {
    /// Occupies a position but is never emitted.
    Positional,
    /// One `;`-separated element per treatment.
    Single,
    /// Mock and treated groups joined by `_`, elements separated by `;`.
    DualCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float32,
}

impl FieldSlot {
    pub const ALL: [FieldSlot; SCHEMA_LEN] = [
        FieldSlot::Regulation,
        FieldSlot::TreatmentProject,
        FieldSlot::ExpressionFpkm,
        FieldSlot::Experiment,
        FieldSlot::Stderr,
        FieldSlot::AvgLog2fc,
        FieldSlot::SingleDpts,
    ];

    pub fn index(self) -> usize {
        match self {
            FieldSlot::Regulation => 0,
            FieldSlot::TreatmentProject => 1,
            FieldSlot::ExpressionFpkm => 2,
            FieldSlot::Experiment => 3,
            FieldSlot::Stderr => 4,
            FieldSlot::AvgLog2fc => 5,
            FieldSlot::SingleDpts => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldSlot::Regulation => "regulation",
            FieldSlot::TreatmentProject => "treatment_project",
            FieldSlot::ExpressionFpkm => "expression_fpkm",
            FieldSlot::Experiment => "experiment",
            FieldSlot::Stderr => "stderr",
            FieldSlot::AvgLog2fc => "avg_log2fc",
            FieldSlot::SingleDpts => "single_dpts",
        }
    }

    pub fn layout(self) -> SlotLayout {
        match self {
            FieldSlot::Regulation | FieldSlot::Experiment => SlotLayout::Positional,
            FieldSlot::TreatmentProject | FieldSlot::AvgLog2fc => SlotLayout::Single,
            FieldSlot::ExpressionFpkm | FieldSlot::Stderr | FieldSlot::SingleDpts => {
                SlotLayout::DualCondition
            }
        }
    }

    /// Declared value kind of the emitted column(s).
    /// Single data points hold several replicate values per cell, so they stay text.
    pub fn kind(self) -> ColumnKind {
        match self {
            FieldSlot::ExpressionFpkm | FieldSlot::Stderr | FieldSlot::AvgLog2fc => {
                ColumnKind::Float32
            }
            _ => ColumnKind::Text,
        }
    }

    /// Position of this slot's field for the given regulation direction.
    pub fn position(self, regulation: Regulation) -> usize {
        self.index() + regulation.row() * SCHEMA_LEN
    }
}

impl fmt::Display for FieldSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regulation {
    Up,
    Down,
}

impl Regulation {
    /// Row index inside the record; row 0 is the header.
    fn row(self) -> usize {
        match self {
            Regulation::Up => 1,
            Regulation::Down => 2,
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regulation::Up => "up",
            Regulation::Down => "down",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Mock,
    Treated,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Mock => "mock",
            Condition::Treated => "treated",
        };
        write!(f, "{s}")
    }
}
