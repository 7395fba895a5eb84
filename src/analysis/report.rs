use std::path::{Path, PathBuf};

use crate::{analysis::Summary, types::SummaryTableRow};

/// Renders the tab separated report: title, blank line, header, then one
/// `label<TAB>count<TAB>value` line per group with three decimals.
pub fn render_report(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&summary.title);
    out.push_str("\n\n");
    out.push_str(&format!(
        "{}\t{}\t{}\n",
        summary.group_header, summary.count_header, summary.stat_header
    ));
    for group in &summary.groups {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            group.label,
            group.count,
            format_value(group.value)
        ));
    }
    out
}

pub fn format_value(value: f64) -> String {
    format!("{:.3}", value)
}

pub async fn write_report(
    dir: &Path,
    file_name: &str,
    summary: &Summary,
) -> Result<PathBuf, std::io::Error> {
    async_fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    async_fs::write(&path, render_report(summary)).await?;
    Ok(path)
}

pub fn table_rows(summary: &Summary) -> Vec<SummaryTableRow> {
    summary
        .groups
        .iter()
        .map(|g| SummaryTableRow {
            group: g.label.clone(),
            count: g.count,
            value: format_value(g.value),
        })
        .collect()
}
