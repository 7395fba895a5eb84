use tabled::Table;

use crate::{config::Settings, error, info, management::Store};

/// Prints where the database lives, the ingestion bounds and the row count of
/// every stored table.
pub async fn info(settings: &Settings) {
    let store = match Store::open(&settings.db_path) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database {}. Err: {}", settings.db_path.display(), e),
    };

    let counts = match store.table_counts() {
        Ok(counts) => counts,
        Err(e) => error!("Cannot count stored rows. Err: {}", e),
    };

    info!("Database: {}", settings.db_path.display());
    info!(
        "Target total: {}, per run cap: {}",
        settings.ingest.target_total, settings.ingest.per_run_cap
    );
    println!("{}", Table::new(counts));
}
