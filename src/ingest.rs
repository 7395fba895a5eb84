//! Incremental ingestion.
//!
//! Every run inserts at most `per_run_cap` new rows, so repeated runs converge
//! on `target_total` stored rows without a single run hammering the remote
//! API. Progress lives entirely in the store: a run resumes from the current
//! row count and skips candidates by natural key, never by position, because
//! the upstream ranking may shift between runs.

use std::fmt;

use crate::{
    config::IngestSettings,
    management::{Record, Store, StoreError},
    sources::{CatalogSource, FetchError},
    types::Query,
};

#[derive(Debug)]
pub enum IngestError {
    Fetch(FetchError),
    Store(StoreError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Fetch(err) => write!(f, "{}", err),
            IngestError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Fetch(err) => Some(err),
            IngestError::Store(err) => Some(err),
        }
    }
}

impl From<FetchError> for IngestError {
    fn from(err: FetchError) -> Self {
        IngestError::Fetch(err)
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        IngestError::Store(err)
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub label: &'static str,
    pub target_total: u64,
    pub count_before: u64,
    pub count_after: u64,
    /// Rows this run may insert: `min(target_total - count_before, per_run_cap)`.
    pub cap: u64,
    pub candidates: usize,
    pub inserted: u64,
    /// Candidates whose key was already stored.
    pub skipped: u64,
    pub already_complete: bool,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.already_complete {
            write!(
                f,
                "Already have {} {}. Skipping insert.",
                self.count_before, self.label
            )
        } else {
            write!(
                f,
                "Inserted {} new {} ({}/{}).",
                self.inserted, self.label, self.count_after, self.target_total
            )
        }
    }
}

pub struct Ingestor {
    settings: IngestSettings,
}

impl Ingestor {
    pub fn new(settings: IngestSettings) -> Self {
        Self { settings }
    }

    /// Runs one bounded insertion pass of `source` into `store`.
    ///
    /// An empty candidate list is not an error and yields `inserted == 0`.
    /// Fetch failures propagate before anything is written; a store failure
    /// mid-run leaves the rows inserted so far in place.
    pub async fn run<S: CatalogSource>(
        &self,
        source: &mut S,
        query: &Query,
        store: &mut Store,
    ) -> Result<IngestReport, IngestError> {
        let target_total = self.settings.target_total;
        let count_before = store.count::<S::Record>()?;

        let mut report = IngestReport {
            label: source.label(),
            target_total,
            count_before,
            count_after: count_before,
            cap: 0,
            candidates: 0,
            inserted: 0,
            skipped: 0,
            already_complete: false,
        };

        if count_before >= target_total {
            report.already_complete = true;
            return Ok(report);
        }

        report.cap = (target_total - count_before).min(self.settings.per_run_cap);

        // The whole ranked list, not just the remaining slice: stored rows are
        // skipped by key below.
        let candidates = match source.fetch(query, target_total as usize).await {
            Ok(candidates) => candidates,
            Err(FetchError::Empty(_)) => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        report.candidates = candidates.len();

        let (inserted, skipped) = insert_capped(store, &candidates, report.cap)?;
        report.inserted = inserted;
        report.skipped = skipped;
        report.count_after = store.count::<S::Record>()?;

        Ok(report)
    }
}

/// Inserts candidates in rank order until `cap` rows were written. Already
/// stored keys are skipped and do not count against the cap.
pub fn insert_capped<R: Record>(
    store: &mut Store,
    candidates: &[R],
    cap: u64,
) -> Result<(u64, u64), StoreError> {
    let mut ordered: Vec<&R> = candidates.iter().collect();
    ordered.sort_by_key(|r| r.rank());

    let mut inserted = 0;
    let mut skipped = 0;
    for candidate in ordered {
        if inserted >= cap {
            break;
        }
        if store.insert_if_absent(candidate)? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }
    Ok((inserted, skipped))
}
