use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Group label for a name's first letter: the first alphabetic character
/// upper-cased, or `#` when the name has none.
pub fn initial_letter(name: &str) -> String {
    name.chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "#".to_string())
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Parses a `start-end` rank range such as `11-25`.
pub fn parse_rank_range(s: &str) -> Result<(u32, u32), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got {:?}", s))?;
    let start = start
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid range start in {:?}", s))?;
    let end = end
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid range end in {:?}", s))?;
    Ok((start, end))
}
