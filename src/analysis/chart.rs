use std::path::{Path, PathBuf};

use crate::analysis::{Summary, report::format_value};

const BAR_WIDTH: u32 = 48;
const BAR_GAP: u32 = 24;
const PLOT_HEIGHT: u32 = 280;
const MARGIN_LEFT: u32 = 70;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 110;

/// Renders the summary as an SVG bar chart, one bar per group in label
/// order, heights scaled to the largest value.
pub fn render_bar_chart(summary: &Summary) -> String {
    let bars = summary.groups.len() as u32;
    let width = MARGIN_LEFT + bars.max(1) * (BAR_WIDTH + BAR_GAP) + BAR_GAP;
    let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;
    let max = summary
        .groups
        .iter()
        .map(|g| g.value)
        .fold(0.0_f64, f64::max);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
        w = width,
        h = height
    ));
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        width, height
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"30\" font-size=\"16\" text-anchor=\"middle\">{}</text>\n",
        width / 2,
        escape_xml(&summary.title)
    ));
    svg.push_str(&format!(
        "  <line x1=\"{x}\" y1=\"{top}\" x2=\"{x}\" y2=\"{b}\" stroke=\"black\"/>\n",
        x = MARGIN_LEFT,
        top = MARGIN_TOP,
        b = baseline
    ));
    svg.push_str(&format!(
        "  <line x1=\"{x1}\" y1=\"{b}\" x2=\"{x2}\" y2=\"{b}\" stroke=\"black\"/>\n",
        x1 = MARGIN_LEFT,
        x2 = width - BAR_GAP / 2,
        b = baseline
    ));
    svg.push_str(&format!(
        "  <text x=\"16\" y=\"{y}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 16 {y})\">{label}</text>\n",
        y = MARGIN_TOP + PLOT_HEIGHT / 2,
        label = escape_xml(&summary.stat_header)
    ));

    for (idx, group) in summary.groups.iter().enumerate() {
        let x = MARGIN_LEFT + BAR_GAP + idx as u32 * (BAR_WIDTH + BAR_GAP);
        let bar_height = if max > 0.0 {
            ((group.value / max) * PLOT_HEIGHT as f64).round() as u32
        } else {
            0
        };
        let y = baseline - bar_height;
        let center = x + BAR_WIDTH / 2;

        svg.push_str(&format!(
            "  <rect class=\"bar\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"steelblue\" data-label=\"{}\"/>\n",
            x,
            y,
            BAR_WIDTH,
            bar_height,
            escape_xml(&group.label)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" text-anchor=\"middle\">{}</text>\n",
            center,
            y.saturating_sub(4),
            format_value(group.value)
        ));
        svg.push_str(&format!(
            "  <text x=\"{x}\" y=\"{y}\" font-size=\"11\" text-anchor=\"end\" transform=\"rotate(-45 {x} {y})\">{label}</text>\n",
            x = center,
            y = baseline + 14,
            label = escape_xml(&group.label)
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_LEFT + (width - MARGIN_LEFT) / 2,
        height - 10,
        escape_xml(&summary.group_header)
    ));
    svg.push_str("</svg>\n");
    svg
}

pub async fn write_chart(
    dir: &Path,
    file_name: &str,
    summary: &Summary,
) -> Result<PathBuf, std::io::Error> {
    async_fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    async_fs::write(&path, render_bar_chart(summary)).await?;
    Ok(path)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
