use crate::{
    Res,
    cli::SourceKind,
    config::{IngestSettings, Settings},
    error,
    ingest::{IngestReport, Ingestor},
    management::Store,
    sources::{CatalogSource, GeniusSource, LastfmSource, SpotifySource},
    success,
    types::Query,
    utils, warning,
};

pub async fn ingest(
    source: SourceKind,
    settings: &Settings,
    target_total: Option<u64>,
    per_run_cap: Option<u64>,
    terms: Vec<String>,
) {
    let bounds = IngestSettings {
        target_total: target_total.unwrap_or(settings.ingest.target_total),
        per_run_cap: per_run_cap.unwrap_or(settings.ingest.per_run_cap),
    };

    match call_ingest(source, settings, bounds, Query::new(terms)).await {
        Ok(report) => {
            if !report.already_complete && report.candidates == 0 {
                warning!("{} returned nothing to ingest.", source.display_name());
            }
            success!("{}", report)
        }
        Err(e) => error!("Cannot ingest from {}. Err: {}", source.display_name(), e),
    }
}

async fn call_ingest(
    source: SourceKind,
    settings: &Settings,
    bounds: IngestSettings,
    query: Query,
) -> Res<IngestReport> {
    let mut store = Store::open(&settings.db_path)?;
    let ingestor = Ingestor::new(bounds);

    match source {
        SourceKind::Spotify => {
            let mut src = SpotifySource::new(settings.spotify.clone()).await?;
            let query = if query.is_empty() {
                src.default_query()
            } else {
                query
            };
            run_source(&ingestor, &mut src, &query, &mut store).await
        }
        SourceKind::Lastfm => {
            let mut src = LastfmSource::new(settings.lastfm.clone())?;
            run_source(&ingestor, &mut src, &query, &mut store).await
        }
        SourceKind::Genius => {
            let mut src = GeniusSource::new(settings.genius.clone())?;
            let query = if query.is_empty() {
                src.default_query()
            } else {
                query
            };
            if (query.terms.len() as u64) < bounds.target_total {
                warning!(
                    "Only {} Genius artist names given; {} stored artists cannot be reached.",
                    query.terms.len(),
                    bounds.target_total
                );
            }
            run_source(&ingestor, &mut src, &query, &mut store).await
        }
    }
}

async fn run_source<S: CatalogSource>(
    ingestor: &Ingestor,
    source: &mut S,
    query: &Query,
    store: &mut Store,
) -> Res<IngestReport> {
    let pb = utils::spinner(&format!("Fetching {}...", source.label()));
    let result = ingestor.run(source, query, store).await;
    pb.finish_and_clear();
    Ok(result?)
}
