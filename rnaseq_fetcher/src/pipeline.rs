// src/pipeline.rs
// -----------------------------------------------------------------------------
// Gene-wise run: fetch → normalize → decode → expand/filter → write.
// Genes are handled one after another; a failing gene is recorded and the run
// moves on. Rows written for earlier genes are never rolled back.
// -----------------------------------------------------------------------------

use tracing::{error, info};

use crate::api_handler::RecordSource;
use crate::config::QueryConfig;
use crate::data_handling::decoder::decode;
use crate::data_handling::raw_record::RawRecord;
use crate::data_handling::result_table::ResultTable;
use crate::data_handling::treatment_filter::TreatmentFilter;
use crate::errors::{GeneError, RecordError};
use crate::helper_functions::write_results_csv;
use crate::models::Regulation;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    /// Gene → reason, in processing order.
    pub failed: Vec<(String, GeneError)>,
}

/// Turn one gene's payload into its result table, filtered when a pattern is active.
pub fn format_record(
    gene: &str,
    content: Option<&str>,
    filter: Option<&TreatmentFilter>,
) -> Result<ResultTable, RecordError> {
    info!("Results formatting for gene {} is started (3/4)", gene);
    let record = RawRecord::from_payload(gene, content)?;
    let decoded = decode(&record)?;
    info!(
        "gene {}: {} up-regulated and {} down-regulated treatments",
        gene,
        decoded.direction_len(Regulation::Up),
        decoded.direction_len(Regulation::Down)
    );
    let table = match filter {
        Some(filter) => filter.apply(&decoded),
        None => ResultTable::from_record(&decoded),
    };
    info!("Results formatting for gene {} is finished (3/4)", gene);
    Ok(table)
}

/// Write `table` to the gene's (or the pattern's) CSV. Returns the number of rows written.
pub fn write_formatted_results(
    config: &QueryConfig,
    gene: &str,
    table: &ResultTable,
) -> Result<usize, GeneError> {
    info!("Formatted results writing for gene {} is started (4/4)", gene);
    let path = config.output_path(gene);
    let mut df = table.to_dataframe(gene)?;
    write_results_csv(&mut df, &path, config.write_mode())
        .map_err(|source| GeneError::Write { path, source })?;
    info!("Formatted results writing for gene {} is finished (4/4)", gene);
    Ok(df.height())
}

pub fn process_gene<S: RecordSource + ?Sized>(
    config: &QueryConfig,
    filter: Option<&TreatmentFilter>,
    source: &S,
    gene: &str,
) -> Result<usize, GeneError> {
    let content = source.fetch(gene, &config.data_tag);
    let table = format_record(gene, content.as_deref(), filter)?;
    write_formatted_results(config, gene, &table)
}

pub fn run<S: RecordSource + ?Sized>(config: &QueryConfig, source: &S, genes: &[String]) -> RunSummary {
    let filter = config.treatment_filter();
    let mut summary = RunSummary::default();

    for (i, gene) in genes.iter().enumerate() {
        info!("Processing gene {} ({}/{})", gene, i + 1, genes.len());
        match process_gene(config, filter.as_ref(), source, gene) {
            Ok(rows) => {
                info!("gene {}: {} rows written", gene, rows);
                summary.succeeded.push(gene.clone());
            }
            Err(e) => {
                error!("gene {} failed: {}", gene, e);
                summary.failed.push((gene.clone(), e));
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::decoder::tests::PAYLOAD;
    use crate::helper_functions::read_csv;
    use std::collections::HashMap;
    use std::path::Path;

    struct InMemorySource(HashMap<String, String>);

    impl InMemorySource {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(g, p)| (g.to_string(), p.to_string()))
                    .collect(),
            )
        }
    }

    impl RecordSource for InMemorySource {
        fn fetch(&self, gene: &str, _tag: &str) -> Option<String> {
            self.0.get(gene).cloned()
        }
    }

    fn config(out_dir: &Path, pattern: &str) -> QueryConfig {
        QueryConfig {
            out_dir: out_dir.to_path_buf(),
            data_pattern: pattern.to_string(),
            ..QueryConfig::default()
        }
    }

    fn genes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn failed_genes_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let source = InMemorySource::new(&[
            ("AT1G01010", PAYLOAD),
            ("AT1G01030", "a,b,c"),
            ("AT1G01040", PAYLOAD),
        ]);
        let summary = run(
            &config(dir.path(), ""),
            &source,
            &genes(&["AT1G01010", "AT1G01020", "AT1G01030", "AT1G01040"]),
        );

        assert_eq!(summary.succeeded, ["AT1G01010", "AT1G01040"]);
        assert_eq!(summary.failed.len(), 2);
        assert!(matches!(
            summary.failed[0],
            (ref gene, GeneError::Record(RecordError::MissingData { .. })) if gene == "AT1G01020"
        ));
        assert!(matches!(
            summary.failed[1].1,
            GeneError::Record(RecordError::Format { found: 3, .. })
        ));
        assert!(dir.path().join("AT1G01040_RNAseq_data.csv").exists());
        assert!(!dir.path().join("AT1G01030_RNAseq_data.csv").exists());
    }

    #[test]
    fn per_gene_output_is_rewritten_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let source = InMemorySource::new(&[("AT1G01010", PAYLOAD)]);
        let config = config(dir.path(), "");
        run(&config, &source, &genes(&["AT1G01010", "AT1G01010"]));

        let df = read_csv(&dir.path().join("AT1G01010_RNAseq_data.csv")).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 8);
    }

    #[test]
    fn pattern_output_accumulates_genes_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let other = PAYLOAD.replace("Chitin_PRJ1", "flg22_PRJ2");
        let source = InMemorySource::new(&[("AT1G01010", PAYLOAD), ("AT1G01020", &other)]);
        let summary = run(
            &config(dir.path(), "flg22"),
            &source,
            &genes(&["AT1G01010", "AT1G01020"]),
        );
        assert_eq!(summary.succeeded.len(), 2);

        let path = dir.path().join("flg22_RNAseq_data.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("treatment_project").count(), 1);

        let df = read_csv(&path).unwrap();
        assert_eq!(df.height(), 3);
        let gene = df.column("gene").unwrap().str().unwrap();
        assert_eq!(gene.get(0), Some("AT1G01010"));
        assert_eq!(gene.get(2), Some("AT1G01020"));
        let keyword = df.column("keyword").unwrap().str().unwrap();
        assert!(keyword.into_iter().all(|k| k == Some("flg22")));
    }

    #[test]
    fn gene_without_matches_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let source = InMemorySource::new(&[("AT1G01010", PAYLOAD)]);
        let summary = run(&config(dir.path(), "heat_cold"), &source, &genes(&["AT1G01010"]));
        assert_eq!(summary.succeeded, ["AT1G01010"]);
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn format_record_keeps_keyword_order() {
        let filter = TreatmentFilter::parse("chitin_flg22").unwrap();
        let table = format_record("AT1G01010", Some(PAYLOAD), Some(&filter)).unwrap();
        assert_eq!(
            table.column("keyword").unwrap().values,
            ["chitin", "flg22"]
        );
        assert_eq!(
            table.column("treatment_project").unwrap().values,
            ["Chitin_PRJ1", "flg22_rep1"]
        );
    }
}
