// src/config.rs

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::data_handling::treatment_filter::TreatmentFilter;
use crate::helper_functions::{project_root, WriteMode};

pub const DEFAULT_DB_URL: &str = "https://plantrnadb.com/athrdb/";
pub const DEFAULT_DATA_TAG: &str = "tbox";
const OUTPUT_SUFFIX: &str = "_RNAseq_data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    Csv,
    Txt,
}

impl fmt::Display for ListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListFormat::Csv => "csv",
            ListFormat::Txt => "txt",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListSeparator {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = "\t")]
    Tab,
}

impl ListSeparator {
    pub fn as_byte(self) -> u8 {
        match self {
            ListSeparator::Comma => b',',
            ListSeparator::Semicolon => b';',
            ListSeparator::Tab => b'\t',
        }
    }
}

impl FromStr for ListSeparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," => Ok(ListSeparator::Comma),
            ";" => Ok(ListSeparator::Semicolon),
            "\t" | "\\t" | "tab" => Ok(ListSeparator::Tab),
            other => Err(format!(
                "delimiter can only be either comma, semicolon or tab, but got {other:?}"
            )),
        }
    }
}

impl fmt::Display for ListSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListSeparator::Comma => ",",
            ListSeparator::Semicolon => ";",
            ListSeparator::Tab => "\\t",
        };
        write!(f, "{s}")
    }
}

/// Parameters of one fetch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub db_url: String,
    pub gene_list: PathBuf,
    pub list_format: ListFormat,
    pub list_sep: ListSeparator,
    /// Data source on the server, e.g. `tbox` for expression under treatments.
    pub data_tag: String,
    /// Treatment keyword(s), `_`-separated. Empty disables filtering.
    pub data_pattern: String,
    pub out_dir: PathBuf,
    pub presearch_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            gene_list: PathBuf::new(),
            list_format: ListFormat::Csv,
            list_sep: ListSeparator::Comma,
            data_tag: DEFAULT_DATA_TAG.to_string(),
            data_pattern: String::new(),
            out_dir: project_root(),
            presearch_timeout_secs: 10,
            fetch_timeout_secs: 60,
        }
    }
}

impl QueryConfig {
    pub fn treatment_filter(&self) -> Option<TreatmentFilter> {
        TreatmentFilter::parse(&self.data_pattern)
    }

    /// Pattern mode appends every gene to one file, otherwise each gene gets its own.
    pub fn write_mode(&self) -> WriteMode {
        match self.treatment_filter() {
            Some(_) => WriteMode::Append,
            None => WriteMode::Overwrite,
        }
    }

    /// Always a direct child of `out_dir`; path separators in the stem are replaced.
    pub fn output_path(&self, gene: &str) -> PathBuf {
        let stem = match self.treatment_filter() {
            Some(filter) => file_stem(filter.pattern()),
            None => file_stem(gene),
        };
        self.out_dir.join(format!("{stem}{OUTPUT_SUFFIX}"))
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect()
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Headers and cookies sent with every request, mirroring a browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let headers = [
            ("Accept", "*/*"),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Connection", "keep-alive"),
            ("Sec-Fetch-Dest", "empty"),
            ("Sec-Fetch-Mode", "cors"),
            ("Sec-Fetch-Site", "same-origin"),
            (
                "User-Agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
            ),
            ("X-Requested-With", "XMLHttpRequest"),
        ];
        let cookies = [
            ("newigv", "no"),
            ("newinfo", "no"),
            ("newplot", "no"),
            ("newtable", "no"),
            ("trans", "yes"),
        ];
        Self {
            headers: to_map(&headers),
            cookies: to_map(&cookies),
        }
    }
}

impl SessionConfig {
    /// Read a JSON file with `headers` and `cookies` objects.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open session config {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("session config {} is not valid", path.display()))
    }

    /// Value of the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
