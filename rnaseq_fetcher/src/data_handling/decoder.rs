// src/data_handling/decoder.rs
// -----------------------------------------------------------------------------
// Positional decoding of a 21-cell record into emitted columns.
// The treatment_project cells of the up and down rows fix the number of rows
// per direction; every other emitted slot has to agree with them.
// -----------------------------------------------------------------------------

use tracing::{debug, error};

use crate::data_handling::condition::expand_conditions;
use crate::data_handling::raw_record::RawRecord;
use crate::errors::RecordError;
use crate::models::{ColumnKind, FieldSlot, Regulation, SlotLayout};

/// One output column, still split by regulation direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl DecodedColumn {
    pub fn elements(&self, regulation: Regulation) -> &[String] {
        match regulation {
            Regulation::Up => &self.up,
            Regulation::Down => &self.down,
        }
    }

    /// Up rows followed by down rows.
    pub fn rows(&self) -> impl Iterator<Item = &String> {
        self.up.iter().chain(self.down.iter())
    }
}

#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub gene: String,
    /// `treatment_project` first, then the remaining emitted columns in schema order.
    pub columns: Vec<DecodedColumn>,
}

impl DecodedRecord {
    pub fn treatments(&self) -> &DecodedColumn {
        &self.columns[0]
    }

    pub fn direction_len(&self, regulation: Regulation) -> usize {
        self.treatments().elements(regulation).len()
    }
}

/// Split a cell on `;`. An empty cell holds no elements.
pub(crate) fn split_elements(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(';').map(str::to_string).collect()
}

pub(crate) fn check_len(
    gene: &str,
    slot: &str,
    regulation: Regulation,
    found: usize,
    expected: usize,
) -> Result<(), RecordError> {
    if found == expected {
        return Ok(());
    }
    error!(
        "length of {}-regulated treatment is NOT equal to that of {} for gene {}",
        regulation, slot, gene
    );
    Err(RecordError::SchemaMismatch {
        gene: gene.to_string(),
        slot: slot.to_string(),
        regulation,
        found,
        expected,
    })
}

pub fn decode(record: &RawRecord) -> Result<DecodedRecord, RecordError> {
    let gene = record.gene();
    let treatments = decode_single(record, FieldSlot::TreatmentProject);
    let len_up = treatments.up.len();
    let len_down = treatments.down.len();
    debug!("gene {}: {} up / {} down treatments", gene, len_up, len_down);

    let mut columns = vec![treatments];
    for slot in FieldSlot::ALL {
        match slot.layout() {
            SlotLayout::Positional => {}
            SlotLayout::Single if slot == FieldSlot::TreatmentProject => {}
            SlotLayout::Single => {
                let column = decode_single(record, slot);
                check_len(gene, slot.name(), Regulation::Up, column.up.len(), len_up)?;
                check_len(gene, slot.name(), Regulation::Down, column.down.len(), len_down)?;
                columns.push(column);
            }
            SlotLayout::DualCondition => {
                columns.extend(expand_conditions(record, slot, len_up, len_down)?);
            }
        }
    }

    Ok(DecodedRecord {
        gene: gene.to_string(),
        columns,
    })
}

fn decode_single(record: &RawRecord, slot: FieldSlot) -> DecodedColumn {
    DecodedColumn {
        name: slot.name().to_string(),
        kind: slot.kind(),
        up: split_elements(record.field(slot, Regulation::Up)),
        down: split_elements(record.field(slot, Regulation::Down)),
    }
}
