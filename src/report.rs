//! CSV report and per-project tally.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::ResultTable;
use crate::types::AppResult;

pub const CSV_HEADER: [&str; 3] = ["Project", "Title", "URL"];

/// Write one `Project,Title,URL` row per (project, document) pair, creating
/// the destination directory first.
pub fn write_csv(path: &Path, table: &ResultTable) -> AppResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for (project, doc) in table.rows() {
        wtr.write_record([project, doc.title.as_str(), doc.url.as_str()])?;
        rows += 1;
    }
    wtr.flush()?;

    info!(path = %path.display(), rows, "CSV report written");
    Ok(rows)
}

/// Number of papers per project, in project-name order.
pub fn tally(table: &ResultTable) -> Vec<(String, usize)> {
    table
        .projects()
        .map(|(project, docs)| (project.to_string(), docs.len()))
        .collect()
}
