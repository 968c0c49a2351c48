use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// One completed plank hold as stored on disk. The on-disk shape is
/// `{"date": "<ISO-8601>", "duration": <ms>}`, which keeps the history slot
/// readable and diffable by hand.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionEntity {
    /// Moment the hold ended.
    pub date: DateTime<Utc>,
    /// Held time in milliseconds. Holds under a second are never stored.
    pub duration: u64,
}

impl SessionEntity {
    pub fn new(date: DateTime<Utc>, duration: u64) -> Self {
        Self { date, duration }
    }

    /// Calendar day this session counts towards.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}
