use ansi_term::Colour;
use chrono::NaiveDate;

use crate::aggregate::{axis_ticks, bar_height, series_max_total, DayBucket};

/// Default chart body height in terminal rows.
pub const DEFAULT_CHART_ROWS: u32 = 12;

const COLUMN_WIDTH: usize = 7;

/// Renders the daily series as a vertical two-bar-per-day chart. Each
/// column pairs the day's best hold with its total, both scaled against
/// the largest total in the window. Returns finished lines so the chart
/// can be asserted on without a terminal.
pub fn chart_lines(series: &[DayBucket], height: u32, color: bool) -> Vec<String> {
    if series.is_empty() {
        return vec!["No data to chart yet.".to_string()];
    }

    let max_total = series_max_total(series);
    let ticks = axis_ticks(max_total);
    let gutter = ticks.iter().map(|t| t.len()).max().unwrap_or(1);

    // The 0% tick sits on the baseline; the rest map onto body rows.
    let tick_rows = [1.0f64, 0.75, 0.5, 0.25]
        .iter()
        .zip(ticks.iter())
        .map(|(fraction, label)| {
            let row = ((height as f64) * fraction).round().max(1.0) as u32;
            (row, label.as_str())
        })
        .collect::<Vec<_>>();

    let columns = series
        .iter()
        .map(|b| {
            (
                bar_height(b.best, max_total, height),
                bar_height(b.total, max_total, height),
            )
        })
        .collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(height as usize + 2);
    for row in (1..=height).rev() {
        let label = tick_rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, l)| *l)
            .unwrap_or("");
        let mut line = format!("{label:>gutter$} │");

        for (best_h, total_h) in &columns {
            line.push(' ');
            line.push_str(&bar_cell(*best_h >= row, color, Colour::Yellow));
            line.push_str(&bar_cell(*total_h >= row, color, Colour::Green));
            line.push_str(&" ".repeat(COLUMN_WIDTH - 3));
        }
        lines.push(line.trim_end().to_string());
    }

    let zero = ticks.last().map(String::as_str).unwrap_or("0");
    lines.push(format!(
        "{zero:>gutter$} └{}",
        "─".repeat(series.len() * COLUMN_WIDTH),
    ));

    let mut labels = format!("{:>gutter$}  ", "");
    for bucket in series {
        labels.push_str(&format!(" {:<width$}", day_label(bucket.day), width = COLUMN_WIDTH - 1));
    }
    lines.push(labels.trim_end().to_string());

    lines
}

/// Legend explaining the two bars of a column.
pub fn chart_legend(color: bool) -> String {
    if color {
        format!(
            "{} best  {} total",
            Colour::Yellow.paint("█"),
            Colour::Green.paint("█"),
        )
    } else {
        "█ best  █ total".to_string()
    }
}

fn bar_cell(filled: bool, color: bool, colour: Colour) -> String {
    if !filled {
        " ".to_string()
    } else if color {
        colour.paint("█").to_string()
    } else {
        "█".to_string()
    }
}

fn day_label(day: NaiveDate) -> String {
    day.format("%a %-d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::aggregate::DayBucket;

    use super::chart_lines;

    const TEST_DAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    fn bucket(day: NaiveDate, best: u64, total: u64) -> DayBucket {
        DayBucket { day, best, total }
    }

    #[test]
    fn test_empty_series_renders_placeholder() {
        assert_eq!(chart_lines(&[], 12, false), vec!["No data to chart yet."]);
    }

    #[test]
    fn test_chart_shape() {
        let series = vec![
            bucket(TEST_DAY.pred_opt().unwrap(), 30_000, 50_000),
            bucket(TEST_DAY, 45_000, 100_000),
        ];
        let lines = chart_lines(&series, 12, false);

        // Body rows + baseline + day labels.
        assert_eq!(lines.len(), 14);
        // Top row carries the 100% tick, which equals the window max total.
        assert!(lines[0].contains("1m40s"));
        // Baseline tick is the literal zero.
        assert!(lines[12].trim_start().starts_with("0 └"));
        // Day labels land under the bars.
        assert!(lines[13].contains("Thu 4"));
        assert!(lines[13].contains("Fri 5"));
    }

    #[test]
    fn test_tallest_total_fills_the_top_row() {
        let series = vec![bucket(TEST_DAY, 45_000, 100_000)];
        let lines = chart_lines(&series, 12, false);

        // The total bar of the max day reaches row 12; its best bar
        // (45% of max) does not.
        assert!(lines[0].contains('█'));
        let top_bars = lines[0].matches('█').count();
        assert_eq!(top_bars, 1);
    }

    #[test]
    fn test_tiny_day_still_gets_a_sliver() {
        let series = vec![
            bucket(TEST_DAY.pred_opt().unwrap(), 1_000, 1_000),
            bucket(TEST_DAY, 45_000, 100_000),
        ];
        let lines = chart_lines(&series, 12, false);

        // Minimum bar height keeps the near-zero day visible on the two
        // bottom body rows.
        let second_to_last_body = &lines[10];
        assert!(second_to_last_body.matches('█').count() >= 2);
    }
}
