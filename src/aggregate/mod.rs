//! Pure projections over a log snapshot. Nothing in here touches the disk
//! or caches between calls; with the log capped at 200 entries a full
//! recompute per render is cheaper than keeping derived state fresh.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{storage::entities::SessionEntity, utils::time::format_axis};

/// The chart shows at most this many distinct days. Days without sessions
/// don't occupy a slot, so gaps in usage compress out of the window.
pub const SERIES_WINDOW_DAYS: usize = 14;

/// Bars never render below this many height units, so a near-zero day is
/// still visible as a sliver.
pub const MIN_BAR_HEIGHT: u32 = 2;

/// Per-calendar-day aggregate over the log. Derived on every read, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub day: NaiveDate,
    /// Longest hold of the day in milliseconds.
    pub best: u64,
    /// Summed hold time of the day in milliseconds.
    pub total: u64,
}

/// Number of sessions recorded on `today`.
pub fn today_count(log: &[SessionEntity], today: NaiveDate) -> usize {
    log.iter().filter(|s| s.day() == today).count()
}

pub fn total_count(log: &[SessionEntity]) -> usize {
    log.len()
}

/// All-time longest hold, 0 for an empty log.
pub fn best_duration(log: &[SessionEntity]) -> u64 {
    log.iter().map(|s| s.duration).max().unwrap_or(0)
}

/// Groups the log by calendar day and keeps the most recent
/// [SERIES_WINDOW_DAYS] days that have at least one session, ascending by
/// date. Note the window counts days *with data*, not calendar days.
pub fn daily_series(log: &[SessionEntity]) -> Vec<DayBucket> {
    let mut map = HashMap::<NaiveDate, DayBucket>::new();

    for session in log {
        let bucket = map.entry(session.day()).or_insert_with(|| DayBucket {
            day: session.day(),
            best: 0,
            total: 0,
        });
        bucket.total += session.duration;
        bucket.best = bucket.best.max(session.duration);
    }

    let mut series = map.into_values().collect::<Vec<_>>();
    series.sort_by_key(|b| b.day);
    if series.len() > SERIES_WINDOW_DAYS {
        series.drain(..series.len() - SERIES_WINDOW_DAYS);
    }
    series
}

/// Normalization denominator for the chart: the largest daily total in the
/// window. Totals are used for both bars since `total >= best` always
/// holds per bucket.
pub fn series_max_total(series: &[DayBucket]) -> u64 {
    series.iter().map(|b| b.total).max().unwrap_or(0)
}

/// Scales a value into bar-height units against the window maximum,
/// flooring at [MIN_BAR_HEIGHT].
pub fn bar_height(value_ms: u64, max_total_ms: u64, chart_height: u32) -> u32 {
    let scaled = if max_total_ms > 0 {
        (value_ms as f64 / max_total_ms as f64 * chart_height as f64) as u32
    } else {
        0
    };
    scaled.max(MIN_BAR_HEIGHT)
}

/// Y-axis labels from top (100% of the window maximum) down to the bottom
/// tick, which is always the literal "0".
pub fn axis_ticks(max_total_ms: u64) -> [String; 5] {
    const FRACTIONS: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.0];

    FRACTIONS.map(|fraction| {
        if fraction == 0.0 {
            "0".to_string()
        } else {
            let seconds = (max_total_ms as f64 * fraction / 1000.0).round() as u64;
            format_axis(seconds)
        }
    })
}
