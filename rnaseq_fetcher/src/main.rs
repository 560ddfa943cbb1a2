use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::api_handler::APIHandler;
use crate::config::{ListFormat, ListSeparator, QueryConfig, SessionConfig, DEFAULT_DATA_TAG, DEFAULT_DB_URL};
use crate::data_handling::gene_list::read_gene_list;
use crate::helper_functions::project_root;
use crate::reporting::{info_table, run_summary};

mod api_handler;
mod config;
mod data_handling;
mod errors;
mod helper_functions;
mod models;
mod pipeline;
mod reporting;

const LOG_FILE: &str = "message.log";

/// Fetch RNA expression data from the online database.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the RNAseq database
    #[arg(long, default_value = DEFAULT_DB_URL)]
    base_url: String,

    /// Full path to the gene list file
    #[arg(long)]
    gene_list: PathBuf,

    /// Format of the gene list file
    #[arg(long, value_enum, default_value_t = ListFormat::Csv)]
    list_format: ListFormat,

    /// Delimiter used in the gene list: ",", ";" or "\t"
    #[arg(long, default_value = ",")]
    list_sep: ListSeparator,

    /// Type of desired information, e.g. "tbox" for expression data under different treatments
    #[arg(long, default_value = DEFAULT_DATA_TAG)]
    data_tag: String,

    /// Treatment keyword(s) to extract, e.g. "flg22" or "flg22_chitin"
    #[arg(long, default_value = "")]
    data_pattern: String,

    /// Output directory for results and the log file (default: current directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Timeout in seconds for each data download
    #[arg(long, default_value_t = 60)]
    fetch_timeout: u64,

    /// JSON file overriding the request headers and cookies
    #[arg(long)]
    session_config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> QueryConfig {
        QueryConfig {
            db_url: self.base_url,
            gene_list: self.gene_list,
            list_format: self.list_format,
            list_sep: self.list_sep,
            data_tag: self.data_tag,
            data_pattern: self.data_pattern,
            out_dir: self.out_dir.unwrap_or_else(project_root),
            fetch_timeout_secs: self.fetch_timeout,
            ..QueryConfig::default()
        }
    }
}

fn init_logging(config: &QueryConfig) {
    let writer = match File::create(config.out_dir.join(LOG_FILE)) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::stderr),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let session_path = cli.session_config.clone();
    let config = cli.into_config();

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("cannot create output dir {}", config.out_dir.display()))?;
    init_logging(&config);

    println!("{}", info_table(&config));

    println!("Initializing request session settings...");
    let session = match &session_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let handler = APIHandler::new(&config, &session)?;
    println!("Request session is successfully established");
    info!("Request session initialization is done");

    let genes = read_gene_list(&config.gene_list, config.list_format, config.list_sep)?;
    if genes.is_empty() {
        warn!("gene list {} holds no genes", config.gene_list.display());
    }
    println!(
        "In total {} genes are recognized from which data will be fetched",
        genes.len()
    );

    let summary = pipeline::run(&config, &handler, &genes);
    println!("{}", run_summary(&summary));
    Ok(())
}
