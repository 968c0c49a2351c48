/// Formats a duration as `MM:SS` for the stats panel and history list.
pub fn format_clock(duration_ms: u64) -> String {
    let total_sec = duration_ms / 1000;
    format!("{:02}:{:02}", total_sec / 60, total_sec % 60)
}

/// Formats a whole-second duration as `MmSSs`/`Ss` for chart axis labels.
/// Minutes are omitted when zero, seconds are two-digit when minutes are
/// present and omitted entirely when zero under minutes.
pub fn format_axis(total_sec: u64) -> String {
    let m = total_sec / 60;
    let s = total_sec % 60;
    if m > 0 {
        if s > 0 {
            format!("{m}m{s:02}s")
        } else {
            format!("{m}m")
        }
    } else {
        format!("{s}s")
    }
}
