// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use map_reduce_word_count::{key_length, RankedEntry};
use std::fmt;
use tracing::{info, warn};

/// Width of the longest bar, in columns
pub const BAR_WIDTH: usize = 50;

/// Horizontal bar chart of ranked words, most frequent at the top
pub struct BarChart<'a> {
    title: &'a str,
    entries: &'a [RankedEntry],
}

impl<'a> BarChart<'a> {
    pub fn new(title: &'a str, entries: &'a [RankedEntry]) -> Self {
        Self { title, entries }
    }
}

impl fmt::Display for BarChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;

        if self.entries.is_empty() {
            return writeln!(f, "(no words matched the filter)");
        }

        let max_total = self.entries.iter().map(|e| e.total).max().unwrap_or(0).max(1);
        let label_width = self.entries.iter().map(|e| key_length(&e.key)).max().unwrap_or(0);

        for entry in self.entries {
            writeln!(
                f,
                "{:<width$} | {} {}",
                entry.key,
                "#".repeat(bar_length(entry.total, max_total)),
                entry.total,
                width = label_width
            )?;
        }
        writeln!(f, "{:<width$}   Frequency", "", width = label_width)
    }
}

/// Bars scale linearly; any non-zero count gets at least one column
fn bar_length(total: u64, max_total: u64) -> usize {
    let scaled = (u128::from(total) * BAR_WIDTH as u128).div_ceil(u128::from(max_total));
    scaled.min(BAR_WIDTH as u128) as usize
}

/// Log the ranking, one line per word
pub fn log_ranking(entries: &[RankedEntry]) {
    if entries.is_empty() {
        warn!("no words matched the filter");
        return;
    }
    info!("{} most frequent words:", entries.len());
    for entry in entries {
        info!("  {:<15} {}", entry.key, entry.total);
    }
}
