// src/data_handling/condition.rs

use crate::data_handling::decoder::{check_len, split_elements, DecodedColumn};
use crate::data_handling::raw_record::RawRecord;
use crate::errors::RecordError;
use crate::models::{Condition, FieldSlot, Regulation};

/// Split a dual-condition slot into its `{slot}_mock` and `{slot}_treated` columns.
///
/// Each direction's cell holds `2 * len` elements once the `_` group separator is
/// folded into `;`: the first half is mock, the second half treated.
pub fn expand_conditions(
    record: &RawRecord,
    slot: FieldSlot,
    len_up: usize,
    len_down: usize,
) -> Result<[DecodedColumn; 2], RecordError> {
    let (up_mock, up_treated) = split_halves(record, slot, Regulation::Up, len_up)?;
    let (down_mock, down_treated) = split_halves(record, slot, Regulation::Down, len_down)?;

    let column = |condition: Condition, up: Vec<String>, down: Vec<String>| DecodedColumn {
        name: format!("{}_{}", slot, condition),
        kind: slot.kind(),
        up,
        down,
    };

    Ok([
        column(Condition::Mock, up_mock, down_mock),
        column(Condition::Treated, up_treated, down_treated),
    ])
}

fn split_halves(
    record: &RawRecord,
    slot: FieldSlot,
    regulation: Regulation,
    len: usize,
) -> Result<(Vec<String>, Vec<String>), RecordError> {
    let cell = record.field(slot, regulation).replace('_', ";");
    let mut mock = split_elements(&cell);
    check_len(record.gene(), slot.name(), regulation, mock.len(), 2 * len)?;
    let treated = mock.split_off(len);
    Ok((mock, treated))
}
