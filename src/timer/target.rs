use chrono::NaiveDate;

use crate::storage::entities::SessionEntity;

/// Daily goal for the first hold of the day.
pub const TARGET_MS: u64 = 20_000;

/// Goal marker for the first hold of the day. Lives only for the duration
/// of one timer run, never persisted.
///
/// Transitions: `Hidden -> Armed` happens once at start (and only for the
/// first attempt of the day), `Armed -> Reached` once the elapsed time
/// passes [TARGET_MS]. The indicator disappears with the display reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetIndicator {
    Hidden,
    Armed,
    Reached,
}

impl TargetIndicator {
    /// Decided once when the timer starts; a session logged mid-hold does
    /// not re-arm or disarm it.
    pub fn on_start(first_of_day: bool) -> Self {
        if first_of_day {
            TargetIndicator::Armed
        } else {
            TargetIndicator::Hidden
        }
    }

    pub fn advance(self, elapsed_ms: u64) -> Self {
        match self {
            TargetIndicator::Armed if elapsed_ms >= TARGET_MS => TargetIndicator::Reached,
            v => v,
        }
    }
}

/// True when no logged session falls on `today`.
pub fn is_first_of_day(log: &[SessionEntity], today: NaiveDate) -> bool {
    !log.iter().any(|s| s.day() == today)
}
