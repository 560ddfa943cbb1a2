// src/data_handling/result_table.rs

use polars::prelude::*;
use tracing::debug;

use crate::data_handling::decoder::DecodedRecord;
use crate::errors::{GeneError, RecordError};
use crate::models::ColumnKind;

/// Cells that stand for a missing measurement in float columns.
const NULL_MARKERS: [&str; 4] = ["", "NA", "nan", "NaN"];

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<String>,
}

/// Column name → values, with the declared kind of every column.
/// Columns keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<TableColumn>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every treatment of the record, up rows first, no filtering.
    pub fn from_record(decoded: &DecodedRecord) -> Self {
        let mut table = Self::new();
        for column in &decoded.columns {
            table.extend_column(&column.name, column.kind, column.rows().cloned());
        }
        table
    }

    /// Append values to `name`, creating the column on first use.
    pub fn extend_column<I>(&mut self, name: &str, kind: ColumnKind, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values.extend(values),
            None => self.columns.push(TableColumn {
                name: name.to_string(),
                kind,
                values: values.into_iter().collect(),
            }),
        }
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Cast every column to its declared kind.
    pub fn to_dataframe(&self, gene: &str) -> Result<DataFrame, GeneError> {
        let mut df = DataFrame::default();
        for column in &self.columns {
            let name = PlSmallStr::from(column.name.as_str());
            let series = match column.kind {
                ColumnKind::Text => Series::new(name, &column.values),
                ColumnKind::Float32 => {
                    let values = column
                        .values
                        .iter()
                        .map(|v| parse_float(gene, &column.name, v))
                        .collect::<Result<Vec<Option<f32>>, _>>()?;
                    Series::new(name, values)
                }
            };
            df.with_column(series)?;
        }
        debug!(
            "gene {}: result frame shape {:?}, columns {:?}",
            gene,
            df.shape(),
            self.column_names()
        );
        Ok(df)
    }
}

fn parse_float(gene: &str, column: &str, value: &str) -> Result<Option<f32>, RecordError> {
    let value = value.trim();
    if NULL_MARKERS.contains(&value) {
        return Ok(None);
    }
    value
        .parse::<f32>()
        .map(Some)
        .map_err(|_| RecordError::InvalidNumber {
            gene: gene.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::decoder::decode;
    use crate::data_handling::decoder::tests::{record, PAYLOAD};
    use crate::models::Regulation;

    #[test]
    fn unfiltered_rows_match_treatment_count() {
        let decoded = decode(&record(PAYLOAD)).unwrap();
        let table = ResultTable::from_record(&decoded);
        assert_eq!(
            table.height(),
            decoded.direction_len(Regulation::Up) + decoded.direction_len(Regulation::Down)
        );
        assert_eq!(
            table.column("treatment_project").unwrap().values,
            ["flg22_rep1", "mock_rep1", "Chitin_PRJ1"]
        );
    }

    #[test]
    fn frame_uses_declared_kinds() {
        let decoded = decode(&record(PAYLOAD)).unwrap();
        let df = ResultTable::from_record(&decoded)
            .to_dataframe("AT1G01010")
            .unwrap();
        assert_eq!(df.shape(), (3, 8));
        assert_eq!(df.column("treatment_project").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("single_dpts_mock").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("stderr_treated").unwrap().dtype(), &DataType::Float32);
        let fpkm = df
            .column("expression_fpkm_treated")
            .unwrap()
            .as_materialized_series()
            .f32()
            .unwrap()
            .clone();
        assert_eq!(fpkm.get(2), Some(2.0));
    }

    #[test]
    fn missing_measurements_become_nulls() {
        let mut table = ResultTable::new();
        table.extend_column("avg_log2fc", ColumnKind::Float32, ["NA".to_string(), "0.5".to_string()]);
        let df = table.to_dataframe("AT1G01010").unwrap();
        assert_eq!(df.column("avg_log2fc").unwrap().null_count(), 1);
    }

    #[test]
    fn unparsable_number_fails_the_gene() {
        let mut table = ResultTable::new();
        table.extend_column("stderr_mock", ColumnKind::Float32, ["0.1x".to_string()]);
        match table.to_dataframe("AT1G01010") {
            Err(GeneError::Record(RecordError::InvalidNumber { column, value, .. })) => {
                assert_eq!(column, "stderr_mock");
                assert_eq!(value, "0.1x");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn extending_keeps_column_order() {
        let mut table = ResultTable::new();
        table.extend_column("a", ColumnKind::Text, ["1".to_string()]);
        table.extend_column("b", ColumnKind::Text, ["2".to_string()]);
        table.extend_column("a", ColumnKind::Text, ["3".to_string()]);
        assert_eq!(table.column_names(), ["a", "b"]);
        assert_eq!(table.column("a").unwrap().values, ["1", "3"]);
    }
}
