use std::env;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => {
            // Fall back to current directory if PROJECT_ROOT not set
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Add rows to the file; the header only goes into a new file.
    Append,
    /// Replace the file with header and rows.
    Overwrite,
}

pub fn write_results_csv(df: &mut DataFrame, path: &Path, mode: WriteMode) -> PolarsResult<()> {
    let (mut file, include_header) = match mode {
        WriteMode::Append => {
            let is_new = !path.exists();
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (file, is_new)
        }
        WriteMode::Overwrite => (File::create(path)?, true),
    };
    info!(
        "Writing {} rows to {} (header: {})",
        df.height(),
        path.display(),
        include_header
    );
    CsvWriter::new(&mut file)
        .include_header(include_header)
        .finish(df)
}

#[cfg(test)]
pub fn read_csv(file_path: &Path) -> PolarsResult<DataFrame> {
    use polars::prelude::{CsvReadOptions, SerReader};

    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flg22_RNAseq_data.csv");

        let mut first = df!["gene" => &["AT1G01010"], "avg_log2fc" => &[1.5f32]].unwrap();
        let mut second = df!["gene" => &["AT1G01020"], "avg_log2fc" => &[-0.5f32]].unwrap();
        write_results_csv(&mut first, &path, WriteMode::Append).unwrap();
        write_results_csv(&mut second, &path, WriteMode::Append).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("gene,avg_log2fc").count(), 1);
        assert_eq!(read_csv(&path).unwrap().height(), 2);
    }

    #[test]
    fn overwrite_replaces_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AT1G01010_RNAseq_data.csv");

        let mut df = df!["treatment_project" => &["flg22_rep1", "mock_rep1"]].unwrap();
        write_results_csv(&mut df, &path, WriteMode::Overwrite).unwrap();
        write_results_csv(&mut df, &path, WriteMode::Overwrite).unwrap();

        assert_eq!(read_csv(&path).unwrap().height(), 2);
    }
}
