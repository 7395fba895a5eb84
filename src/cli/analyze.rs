use std::path::PathBuf;

use tabled::Table;

use crate::{
    Res,
    analysis::{self, RankBuckets, Summary, chart, report},
    cli::SourceKind,
    config::Settings,
    error, info,
    management::Store,
    success,
    types::{GeniusArtist, LastfmArtist, SpotifySong},
    warning,
};

pub async fn analyze(
    source: SourceKind,
    settings: &Settings,
    limit: Option<usize>,
    buckets: Vec<(u32, u32)>,
) {
    let limit = limit.unwrap_or(analysis::DEFAULT_ANALYSIS_LIMIT);

    match call_analyze(source, settings, limit, buckets).await {
        Ok((summary, report_path, chart_path)) => {
            if summary.groups.is_empty() {
                warning!(
                    "No {} rows stored yet. Run tunetally ingest {} first.",
                    source.display_name(),
                    source.command_name()
                );
            } else {
                println!("{}", Table::new(report::table_rows(&summary)));
            }
            if summary.skipped > 0 {
                info!("Skipped {} rows with an undefined ratio.", summary.skipped);
            }
            info!("Report written to {}", report_path.display());
            info!("Chart written to {}", chart_path.display());
            success!("{} analysis complete.", source.display_name());
        }
        Err(e) => error!("Cannot analyze {} data. Err: {}", source.display_name(), e),
    }
}

async fn call_analyze(
    source: SourceKind,
    settings: &Settings,
    limit: usize,
    buckets: Vec<(u32, u32)>,
) -> Res<(Summary, PathBuf, PathBuf)> {
    // scoped so the connection is closed before the files are written
    let (summary, report_file, chart_file) = {
        let store = Store::open(&settings.db_path)?;
        match source {
            SourceKind::Lastfm => {
                let buckets = if buckets.is_empty() {
                    RankBuckets::default()
                } else {
                    RankBuckets::new(buckets)?
                };
                let rows = store.query_ordered::<LastfmArtist>(limit)?;
                (
                    analysis::plays_per_listener(&rows, &buckets),
                    analysis::LASTFM_REPORT_FILE,
                    analysis::LASTFM_CHART_FILE,
                )
            }
            SourceKind::Spotify => {
                let rows = store.query_ordered::<SpotifySong>(limit)?;
                (
                    analysis::genre_distribution(&rows),
                    analysis::SPOTIFY_REPORT_FILE,
                    analysis::SPOTIFY_CHART_FILE,
                )
            }
            SourceKind::Genius => {
                let rows = store.query_ordered::<GeniusArtist>(limit)?;
                (
                    analysis::letter_distribution(&rows),
                    analysis::GENIUS_REPORT_FILE,
                    analysis::GENIUS_CHART_FILE,
                )
            }
        }
    };

    let report_path = report::write_report(&settings.output_dir, report_file, &summary).await?;
    let chart_path = chart::write_chart(&settings.output_dir, chart_file, &summary).await?;

    Ok((summary, report_path, chart_path))
}
