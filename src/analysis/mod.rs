//! Aggregations over stored rows.
//!
//! Two shapes cover every analysis: a bucketed ratio average and a
//! categorical frequency distribution. Both group rows by a pure function of
//! one field and emit groups in sorted label order, which keeps reports and
//! charts deterministic.

use std::collections::BTreeMap;

use crate::{
    types::{GeniusArtist, LastfmArtist, SpotifySong},
    utils,
};

pub mod chart;
pub mod report;

pub const LASTFM_REPORT_FILE: &str = "lastfm_bucket_results.txt";
pub const LASTFM_CHART_FILE: &str = "lastfm_bucket_plays_per_listener.svg";
pub const SPOTIFY_REPORT_FILE: &str = "spotify_genre_results.txt";
pub const SPOTIFY_CHART_FILE: &str = "spotify_genre_distribution.svg";
pub const GENIUS_REPORT_FILE: &str = "genius_letter_results.txt";
pub const GENIUS_CHART_FILE: &str = "genius_letter_distribution.svg";

/// Rows read per analysis unless overridden.
pub const DEFAULT_ANALYSIS_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStat {
    pub label: String,
    pub count: u64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub title: String,
    pub group_header: String,
    pub count_header: String,
    pub stat_header: String,
    /// Sorted by label.
    pub groups: Vec<GroupStat>,
    /// Rows that contributed to a group.
    pub total: u64,
    /// Rows left out because their statistic was undefined.
    pub skipped: u64,
}

impl Summary {
    pub fn group(&self, label: &str) -> Option<&GroupStat> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// Contiguous, disjoint rank ranges, each labelled `start-end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankBuckets {
    ranges: Vec<(u32, u32)>,
}

impl Default for RankBuckets {
    fn default() -> Self {
        Self {
            ranges: vec![(1, 10), (11, 25), (26, 50), (51, 100)],
        }
    }
}

impl RankBuckets {
    /// Fails unless the ranges are non-empty, ordered and each one starts
    /// right after the previous one ends.
    pub fn new(ranges: Vec<(u32, u32)>) -> Result<Self, String> {
        if ranges.is_empty() {
            return Err("at least one rank range is required".to_string());
        }
        for (idx, (start, end)) in ranges.iter().enumerate() {
            if start > end {
                return Err(format!("range {}-{} is reversed", start, end));
            }
            if idx > 0 && ranges[idx - 1].1.checked_add(1) != Some(*start) {
                return Err(format!(
                    "range {}-{} does not follow {}-{}",
                    start,
                    end,
                    ranges[idx - 1].0,
                    ranges[idx - 1].1
                ));
            }
        }
        Ok(Self { ranges })
    }

    pub fn labels(&self) -> Vec<String> {
        self.ranges
            .iter()
            .map(|(start, end)| format!("{}-{}", start, end))
            .collect()
    }

    /// Label of the range holding `rank`. Ranks outside the partition fall
    /// into the nearest end range.
    pub fn label_for(&self, rank: u32) -> String {
        let (start, end) = self
            .ranges
            .iter()
            .find(|(start, end)| rank >= *start && rank <= *end)
            .copied()
            .unwrap_or_else(|| {
                if rank < self.ranges[0].0 {
                    self.ranges[0]
                } else {
                    self.ranges[self.ranges.len() - 1]
                }
            });
        format!("{}-{}", start, end)
    }
}

/// Average of `numerator / denominator` per group. Rows with a zero
/// denominator are skipped rather than failing the computation.
///
/// Returns the groups in label order and the number of skipped rows.
pub fn bucketed_ratio_average<T, G, N, D>(
    rows: &[T],
    group: G,
    numerator: N,
    denominator: D,
) -> (Vec<GroupStat>, u64)
where
    G: Fn(&T) -> String,
    N: Fn(&T) -> f64,
    D: Fn(&T) -> f64,
{
    let mut sums: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    let mut skipped = 0;

    for row in rows {
        let denom = denominator(row);
        if denom == 0.0 {
            skipped += 1;
            continue;
        }
        let entry = sums.entry(group(row)).or_insert((0.0, 0));
        entry.0 += numerator(row) / denom;
        entry.1 += 1;
    }

    let groups = sums
        .into_iter()
        .map(|(label, (sum, count))| GroupStat {
            label,
            count,
            value: sum / count as f64,
        })
        .collect();
    (groups, skipped)
}

/// Count per label and its share `count / total`.
///
/// Returns the groups in label order and the total number of labels seen.
pub fn frequency_distribution<I>(labels: I) -> (Vec<GroupStat>, u64)
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let total: u64 = counts.values().sum();

    let groups = counts
        .into_iter()
        .map(|(label, count)| GroupStat {
            label,
            count,
            value: count as f64 / total as f64,
        })
        .collect();
    (groups, total)
}

/// Average plays per listener of Last.fm artists, grouped by rank bucket.
pub fn plays_per_listener(rows: &[LastfmArtist], buckets: &RankBuckets) -> Summary {
    let (groups, skipped) = bucketed_ratio_average(
        rows,
        |a| buckets.label_for(a.rank),
        |a| a.playcount as f64,
        |a| a.listeners as f64,
    );
    let total = groups.iter().map(|g| g.count).sum();

    Summary {
        title: "Last.fm Top Artists: Plays per Listener by Rank Bucket".to_string(),
        group_header: "Bucket".to_string(),
        count_header: "Artists".to_string(),
        stat_header: "Avg Plays per Listener".to_string(),
        groups,
        total,
        skipped,
    }
}

/// Share of each genre among stored Spotify songs.
pub fn genre_distribution(rows: &[SpotifySong]) -> Summary {
    let (groups, total) = frequency_distribution(rows.iter().map(|s| s.genre.clone()));

    Summary {
        title: "Spotify Playlist Songs: Genre Distribution".to_string(),
        group_header: "Genre".to_string(),
        count_header: "Songs".to_string(),
        stat_header: "Share".to_string(),
        groups,
        total,
        skipped: 0,
    }
}

/// Share of each initial letter among stored Genius artist names.
pub fn letter_distribution(rows: &[GeniusArtist]) -> Summary {
    let (groups, total) =
        frequency_distribution(rows.iter().map(|a| utils::initial_letter(&a.name)));

    Summary {
        title: "Genius Artists: Name Initial Letter Distribution".to_string(),
        group_header: "Letter".to_string(),
        count_header: "Artists".to_string(),
        stat_header: "Share".to_string(),
        groups,
        total,
        skipped: 0,
    }
}
