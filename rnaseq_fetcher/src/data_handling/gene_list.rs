// src/data_handling/gene_list.rs

use std::path::Path;

use tracing::{error, info};

use crate::config::{ListFormat, ListSeparator};
use crate::errors::GeneListError;

/// Gene identifiers from every cell of the list file, trimmed and upper-cased.
/// Duplicates are kept; each occurrence is processed on its own.
pub fn read_gene_list(
    path: &Path,
    format: ListFormat,
    separator: ListSeparator,
) -> Result<Vec<String>, GeneListError> {
    if path.as_os_str().is_empty() {
        return Err(GeneListError::EmptyPath);
    }
    if !path.exists() {
        return Err(GeneListError::NotFound(path.to_path_buf()));
    }
    info!("Reading {} gene list {}", format, path.display());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator.as_byte())
        .from_path(path)?;

    let mut genes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            error!("Reading of gene list failed: {}", e);
            e
        })?;
        genes.extend(
            record
                .iter()
                .map(|cell| cell.trim().to_uppercase())
                .filter(|gene| !gene.is_empty()),
        );
    }

    info!("Reading gene list is finished, {} genes found", genes.len());
    Ok(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn list_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_cells_across_lines() {
        let file = list_file("at1g01010, At1g01020\nAT1G01030,\n\nat1g01010\n");
        let genes = read_gene_list(file.path(), ListFormat::Csv, ListSeparator::Comma).unwrap();
        assert_eq!(genes, ["AT1G01010", "AT1G01020", "AT1G01030", "AT1G01010"]);
    }

    #[test]
    fn honours_tab_separator() {
        let file = list_file("at1g01010\tat1g01020\n");
        let genes = read_gene_list(file.path(), ListFormat::Txt, ListSeparator::Tab).unwrap();
        assert_eq!(genes, ["AT1G01010", "AT1G01020"]);
    }

    #[test]
    fn rejects_missing_and_empty_paths() {
        assert!(matches!(
            read_gene_list(Path::new(""), ListFormat::Csv, ListSeparator::Comma),
            Err(GeneListError::EmptyPath)
        ));
        assert!(matches!(
            read_gene_list(Path::new("/no/such/genes.csv"), ListFormat::Csv, ListSeparator::Comma),
            Err(GeneListError::NotFound(_))
        ));
    }
}
