use chrono::NaiveDate;

use crate::{
    aggregate::{best_duration, today_count, total_count},
    storage::entities::SessionEntity,
    utils::time::format_clock,
};

/// Summary counters shown by `planktrack stats`.
pub fn stats_lines(log: &[SessionEntity], today: NaiveDate) -> Vec<String> {
    vec![
        format!("Today:          {}", today_count(log, today)),
        format!("Best time:      {}", format_clock(best_duration(log))),
        format!("Total sessions: {}", total_count(log)),
    ]
}

/// Chronological list, newest first, with a header line on every day
/// change. The log is already stored newest first, so this is a single
/// pass without re-sorting.
pub fn history_lines(log: &[SessionEntity]) -> Vec<String> {
    if log.is_empty() {
        return vec!["No exercises recorded yet. Start planking!".to_string()];
    }

    let mut lines = vec![];
    let mut last_day: Option<NaiveDate> = None;

    for session in log {
        let day = session.day();
        if last_day != Some(day) {
            lines.push(day.format("%A, %b %-d, %Y").to_string());
            last_day = Some(day);
        }
        lines.push(format!(
            "  {}  {}",
            session.date.format("%H:%M"),
            format_clock(session.duration),
        ));
    }
    lines
}
