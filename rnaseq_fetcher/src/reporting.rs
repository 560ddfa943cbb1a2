// src/reporting.rs

use crate::config::QueryConfig;
use crate::pipeline::RunSummary;

const INFO_TITLE: &str = "INFO TABLE";

/// Bordered table of the run parameters, printed before fetching starts.
pub fn info_table(config: &QueryConfig) -> String {
    let treatment = if config.data_pattern.is_empty() {
        "none".to_string()
    } else {
        config.data_pattern.clone()
    };
    let rows = [
        ("database", config.db_url.clone()),
        ("gene list", config.gene_list.display().to_string()),
        ("format", config.list_format.to_string()),
        ("delimiter", config.list_sep.to_string()),
        ("data source", config.data_tag.clone()),
        ("treatment", treatment),
        ("output dir", config.out_dir.display().to_string()),
    ];

    let title_width = rows.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
    let detail_width = rows.iter().map(|(_, d)| d.chars().count()).max().unwrap_or(0);
    // "|" + title + ":  " + detail + "|"
    let width = (title_width + detail_width + 5).max(INFO_TITLE.len() + 2);

    let fill = width - INFO_TITLE.len();
    let left = fill / 2;
    let right = fill - left;
    let border = "-".repeat(width);

    let mut lines = vec![
        border.clone(),
        format!(
            "|{}{}{}|",
            "#".repeat(left - 1),
            INFO_TITLE,
            "#".repeat(right - 1)
        ),
    ];
    let detail_width = width - title_width - 5;
    for (title, detail) in &rows {
        lines.push(format!("|{title:<title_width$}:  {detail:>detail_width$}|"));
    }
    lines.push(border);
    lines.join("\n")
}

/// Successful genes, then one `gene | reason` line per failure.
pub fn run_summary(summary: &RunSummary) -> String {
    let mut lines = Vec::new();
    if summary.succeeded.is_empty() {
        lines.push("None of genes provided succeeded".to_string());
    } else {
        lines.push("Successful data fetching for following genes:".to_string());
        lines.push(summary.succeeded.join(", "));
    }
    lines.push("Data fetching for following genes failed (gene ID | reason):".to_string());
    for (gene, reason) in &summary.failed {
        lines.push(format!("{gene} | {reason}"));
    }
    lines.join("\n")
}
