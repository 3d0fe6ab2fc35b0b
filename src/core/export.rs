use crate::domain::model::ResultRecord;
use crate::utils::error::{Result, UnfollowrError};

pub fn profile_url(handle: &str) -> String {
    format!("https://instagram.com/{}/", handle)
}

/// Render the selected records as the downloadable CSV: header
/// `Username,Instagram URL`, one row per handle with its profile URL.
pub fn render_csv(records: &[ResultRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Username", "Instagram URL"])?;
    for record in records {
        writer.write_record([record.handle.as_str(), profile_url(&record.handle).as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| UnfollowrError::ProcessingError {
            message: format!("CSV buffer error: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| UnfollowrError::ProcessingError {
        message: format!("CSV output was not UTF-8: {}", e),
    })
}

/// Newline-delimited handle list.
pub fn render_txt(records: &[ResultRecord]) -> String {
    let mut out = records
        .iter()
        .map(|record| record.handle.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Dated download name, e.g. `unfollowr-export-2026-08-29.csv`.
pub fn dated_export_name(extension: &str) -> String {
    format!(
        "unfollowr-export-{}.{}",
        chrono::Local::now().format("%Y-%m-%d"),
        extension
    )
}
