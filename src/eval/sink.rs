//! Writers for the two run artifacts: the ranked-rows CSV and the
//! metrics summary JSON.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LfError, Result};
use crate::eval::driver::RankedRow;
use crate::eval::metrics::MetricsSummary;

/// Default file name for the ranked candidate rows.
pub const RESULTS_FILE: &str = "tfidf_results.csv";

/// Default file name for the metrics summary.
pub const METRICS_FILE: &str = "tfidf_metrics_summary.json";

const RESULTS_HEADER: &str = "queryId,candidateId,score,rank,isMatch";

/// Render the results table as CSV text, header first.
#[must_use]
pub fn render_results_csv(rows: &[RankedRow]) -> String {
    let mut out = String::with_capacity(rows.len() * 48 + RESULTS_HEADER.len() + 1);
    out.push_str(RESULTS_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&row.query_id),
            csv_field(&row.candidate_id),
            row.score,
            row.rank,
            row.is_match
        );
    }
    out
}

/// Render the summary as pretty JSON. Unavailable metrics serialize as
/// `null`.
pub fn render_metrics_json(summary: &MetricsSummary) -> Result<String> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| LfError::Serialization(format!("metrics summary: {e}")))
}

/// Write the results CSV, creating parent directories as needed.
pub fn write_results_csv(path: &Path, rows: &[RankedRow]) -> Result<PathBuf> {
    write_artifact(path, &render_results_csv(rows))?;
    debug!(path = %path.display(), rows = rows.len(), "wrote results table");
    Ok(path.to_path_buf())
}

/// Write the metrics summary JSON, creating parent directories as needed.
pub fn write_metrics_json(path: &Path, summary: &MetricsSummary) -> Result<PathBuf> {
    write_artifact(path, &render_metrics_json(summary)?)?;
    debug!(path = %path.display(), "wrote metrics summary");
    Ok(path.to_path_buf())
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Quote a CSV field only when it contains a delimiter, quote, or line
/// break. Embedded quotes are doubled.
fn csv_field(raw: &str) -> Cow<'_, str> {
    if raw.contains(['"', ',', '\n', '\r']) {
        let mut quoted = String::with_capacity(raw.len() + 2);
        quoted.push('"');
        for ch in raw.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        Cow::Owned(quoted)
    } else {
        Cow::Borrowed(raw)
    }
}
