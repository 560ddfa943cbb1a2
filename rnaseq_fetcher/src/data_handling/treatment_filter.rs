// src/data_handling/treatment_filter.rs

use tracing::{debug, info};

use crate::data_handling::decoder::DecodedRecord;
use crate::data_handling::result_table::ResultTable;
use crate::models::{ColumnKind, Regulation};

/// Separator between keywords in a multi-treatment pattern, e.g. `flg22_chitin`.
const KEYWORD_SEPARATOR: char = '_';

pub const KEYWORD_COLUMN: &str = "keyword";
pub const GENE_COLUMN: &str = "gene";

/// Keyword selection over treatment-project labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentFilter {
    pattern: String,
    keywords: Vec<String>,
}

impl TreatmentFilter {
    /// `None` when no pattern was given.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        let keywords: Vec<String> = pattern
            .split(KEYWORD_SEPARATOR)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            return None;
        }
        Some(Self {
            pattern: pattern.to_string(),
            keywords,
        })
    }

    /// The pattern as given; names the output file.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Rows of `decoded` matching any keyword, keyword by keyword, tagged
    /// with the producing keyword and gene.
    pub fn apply(&self, decoded: &DecodedRecord) -> ResultTable {
        let mut table = ResultTable::new();
        for keyword in self.keywords() {
            let rows = append_matches(&mut table, decoded, keyword);
            debug!("gene {}: {} rows match {:?}", decoded.gene, rows, keyword);
        }
        info!(
            "gene {}: {} rows retained for pattern {:?}",
            decoded.gene,
            table.height(),
            self.pattern
        );
        table
    }
}

/// Case-insensitive substring test of `keyword` against each label.
pub fn treatment_mask(labels: &[String], keyword: &str) -> Vec<bool> {
    let keyword = keyword.to_lowercase();
    labels
        .iter()
        .map(|label| label.to_lowercase().contains(&keyword))
        .collect()
}

fn select<'a>(values: &'a [String], mask: &'a [bool]) -> impl Iterator<Item = String> + 'a {
    values
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(value, _)| value.clone())
}

/// Append the rows of `decoded` whose treatment matches `keyword`. Returns the row count.
pub fn append_matches(table: &mut ResultTable, decoded: &DecodedRecord, keyword: &str) -> usize {
    let treatments = decoded.treatments();
    let up_mask = treatment_mask(treatments.elements(Regulation::Up), keyword);
    let down_mask = treatment_mask(treatments.elements(Regulation::Down), keyword);

    for column in &decoded.columns {
        let rows = select(&column.up, &up_mask).chain(select(&column.down, &down_mask));
        table.extend_column(&column.name, column.kind, rows);
    }

    let matched = up_mask.iter().chain(&down_mask).filter(|keep| **keep).count();
    table.extend_column(
        KEYWORD_COLUMN,
        ColumnKind::Text,
        std::iter::repeat(keyword.to_string()).take(matched),
    );
    table.extend_column(
        GENE_COLUMN,
        ColumnKind::Text,
        std::iter::repeat(decoded.gene.clone()).take(matched),
    );
    matched
}
