use tunetally::analysis::{
    RankBuckets, bucketed_ratio_average, frequency_distribution, genre_distribution,
    letter_distribution, plays_per_listener,
};
use tunetally::analysis::report::format_value;
use tunetally::types::{GeniusArtist, LastfmArtist, SpotifySong};

// Helper function to create a Last.fm artist
fn lastfm(name: &str, listeners: u64, playcount: u64, rank: u32) -> LastfmArtist {
    LastfmArtist {
        name: name.to_string(),
        listeners,
        playcount,
        rank,
    }
}

fn song(track_id: &str, genre: &str) -> SpotifySong {
    SpotifySong {
        track_id: track_id.to_string(),
        name: track_id.to_string(),
        artist_name: "Artist".to_string(),
        popularity: 50,
        genre: genre.to_string(),
        rank: 1,
    }
}

fn genius(id: i64, name: &str) -> GeniusArtist {
    GeniusArtist {
        genius_id: id,
        name: name.to_string(),
        rank: id as u32,
    }
}

#[test]
fn test_zero_listener_rows_are_skipped() {
    let rows = vec![lastfm("A", 10, 100, 5), lastfm("B", 0, 50, 12)];
    let summary = plays_per_listener(&rows, &RankBuckets::default());

    let top = summary.group("1-10").unwrap();
    assert_eq!(top.count, 1);
    assert_eq!(top.value, 10.0);
    assert!(summary.group("11-25").is_none());
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total, 1);
}

#[test]
fn test_bucket_average_of_ratios() {
    let rows = vec![
        lastfm("A", 10, 100, 1),  // 10.0
        lastfm("B", 4, 20, 2),    // 5.0
        lastfm("C", 2, 3, 11),    // 1.5
        lastfm("D", 1, 7, 60),    // 7.0
        lastfm("E", 1, 9, 100),   // 9.0
    ];
    let summary = plays_per_listener(&rows, &RankBuckets::default());

    let labels: Vec<&str> = summary.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["1-10", "11-25", "51-100"]);
    assert_eq!(summary.group("1-10").unwrap().value, 7.5);
    assert_eq!(summary.group("11-25").unwrap().value, 1.5);
    assert_eq!(summary.group("51-100").unwrap().count, 2);
    assert_eq!(summary.group("51-100").unwrap().value, 8.0);
}

#[test]
fn test_rank_buckets_cover_and_clamp() {
    let buckets = RankBuckets::default();

    assert_eq!(buckets.label_for(1), "1-10");
    assert_eq!(buckets.label_for(10), "1-10");
    assert_eq!(buckets.label_for(11), "11-25");
    assert_eq!(buckets.label_for(26), "26-50");
    assert_eq!(buckets.label_for(50), "26-50");
    assert_eq!(buckets.label_for(51), "51-100");
    assert_eq!(buckets.label_for(100), "51-100");
    // Outside the partition
    assert_eq!(buckets.label_for(250), "51-100");
    assert_eq!(buckets.label_for(0), "1-10");

    assert_eq!(buckets.labels(), vec!["1-10", "11-25", "26-50", "51-100"]);
}

#[test]
fn test_rank_buckets_reject_gaps_and_overlaps() {
    assert!(RankBuckets::new(vec![]).is_err());
    assert!(RankBuckets::new(vec![(1, 10), (12, 20)]).is_err());
    assert!(RankBuckets::new(vec![(1, 10), (10, 20)]).is_err());
    assert!(RankBuckets::new(vec![(5, 1)]).is_err());

    // A range ending at the largest rank has no successor
    assert!(RankBuckets::new(vec![(1, u32::MAX), (5, 6)]).is_err());
    assert!(RankBuckets::new(vec![(1, u32::MAX)]).is_ok());

    let custom = RankBuckets::new(vec![(1, 5), (6, 50)]).unwrap();
    assert_eq!(custom.label_for(7), "6-50");
}

#[test]
fn test_ratio_average_with_no_rows() {
    let rows: Vec<LastfmArtist> = Vec::new();
    let (groups, skipped) = bucketed_ratio_average(
        &rows,
        |a| a.name.clone(),
        |a| a.playcount as f64,
        |a| a.listeners as f64,
    );
    assert!(groups.is_empty());
    assert_eq!(skipped, 0);
}

#[test]
fn test_frequency_percentages_sum_to_one() {
    let labels = ["pop", "rap", "pop", "country", "rock", "rap", "pop"]
        .iter()
        .map(|s| s.to_string());
    let (groups, total) = frequency_distribution(labels);

    assert_eq!(total, 7);
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["country", "pop", "rap", "rock"]);

    let reported: f64 = groups
        .iter()
        .map(|g| format_value(g.value).parse::<f64>().unwrap())
        .sum();
    assert!((reported - 1.0).abs() <= 0.0005 * groups.len() as f64);

    let exact: f64 = groups.iter().map(|g| g.value).sum();
    assert!((exact - 1.0).abs() < 1e-9);
}

#[test]
fn test_genre_distribution_includes_unknown() {
    let rows = vec![
        song("t1", "pop"),
        song("t2", "Unknown"),
        song("t3", "pop"),
        song("t4", "Unknown"),
    ];
    let summary = genre_distribution(&rows);

    assert_eq!(summary.total, 4);
    let unknown = summary.group("Unknown").unwrap();
    assert_eq!(unknown.count, 2);
    assert_eq!(unknown.value, 0.5);
}

#[test]
fn test_letter_distribution_groups_by_initial() {
    let rows = vec![
        genius(1, "The Beatles"),
        genius(2, "taylor swift"),
        genius(3, "Madonna"),
        genius(4, "50 Cent"),
        genius(5, "2 + 2"),
    ];
    let summary = letter_distribution(&rows);

    assert_eq!(summary.group("T").unwrap().count, 2);
    assert_eq!(summary.group("M").unwrap().count, 1);
    assert_eq!(summary.group("C").unwrap().count, 1);
    assert_eq!(summary.group("#").unwrap().count, 1);
    assert_eq!(summary.group("T").unwrap().value, 0.4);
}
