use anyhow::Result;
use tracing::{debug, warn};

use crate::utils::clock::Clock;

use super::{entities::SessionEntity, kv::KeyValueStore};

/// Slot the history lives under.
pub const HISTORY_KEY: &str = "plank_history";

/// The log keeps the most recent 200 holds. Anything older falls off the
/// end on append.
pub const MAX_SESSIONS: usize = 200;

/// Append-only log of completed holds, newest first. The log is the single
/// source of truth; every counter and chart is recomputed from a fresh
/// [load](SessionStore::load) on each render.
pub struct SessionStore<K: KeyValueStore> {
    slots: K,
    date_provider: Box<dyn Clock>,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(slots: K, date_provider: Box<dyn Clock>) -> Self {
        Self {
            slots,
            date_provider,
        }
    }

    /// Reads the full log. Content problems never surface: a missing slot,
    /// unreadable slot, or undeserializable document all come back as an
    /// empty log, and individually malformed entries are dropped so one
    /// corrupt line can't take the whole dashboard down.
    pub async fn load(&self) -> Vec<SessionEntity> {
        let raw = match self.slots.get(HISTORY_KEY).await {
            Ok(Some(v)) => v,
            Ok(None) => return vec![],
            Err(e) => {
                warn!("Failed to read history slot, treating as empty: {e}");
                return vec![];
            }
        };

        let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("History slot holds illegal json, treating as empty: {e}");
                return vec![];
            }
        };

        let mut sessions = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<SessionEntity>(value) {
                Ok(v) => sessions.push(v),
                Err(e) => {
                    // Might happen after a cut-off write or a hand edit.
                    warn!("Skipping malformed history entry: {e}")
                }
            }
        }
        sessions
    }

    /// Records a completed hold at the front of the log, truncates to
    /// [MAX_SESSIONS] and writes the whole log back. A failed write
    /// propagates so the caller can tell the user instead of silently
    /// losing the hold.
    pub async fn append(&self, duration_ms: u64) -> Result<()> {
        let mut log = self.load().await;
        log.insert(0, SessionEntity::new(self.date_provider.now(), duration_ms));
        log.truncate(MAX_SESSIONS);

        let serialized = serde_json::to_string(&log)?;
        self.slots.set(HISTORY_KEY, &serialized).await?;
        debug!("Recorded {duration_ms}ms hold, log holds {} entries", log.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;
    use tokio::time::Instant;

    use crate::{
        storage::kv::{FileKeyValueStore, KeyValueStore, MockKeyValueStore},
        utils::clock::Clock,
    };

    use super::{SessionStore, HISTORY_KEY, MAX_SESSIONS};

    const TEST_START_DATE: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );

    /// Hands out a fixed moment plus one second per call, so appended
    /// sessions stay distinguishable and ordered.
    struct SteppingClock {
        start: DateTime<Utc>,
        calls: std::sync::Mutex<i64>,
    }

    impl SteppingClock {
        fn new(start: NaiveDateTime) -> Self {
            Self {
                start: Utc.from_utc_datetime(&start),
                calls: std::sync::Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut calls = self.calls.lock().unwrap();
            let moment = self.start + Duration::seconds(*calls);
            *calls += 1;
            moment
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: StdDuration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    fn file_store(dir: &std::path::Path) -> Result<SessionStore<FileKeyValueStore>> {
        Ok(SessionStore::new(
            FileKeyValueStore::new(dir.to_owned())?,
            Box::new(SteppingClock::new(TEST_START_DATE)),
        ))
    }

    #[tokio::test]
    async fn test_empty_slot_loads_as_empty_log() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;

        assert_eq!(store.load().await, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;

        store.append(45_000).await?;
        store.append(30_000).await?;

        let log = store.load().await;
        assert_eq!(log.len(), 2);
        // Newest first.
        assert_eq!(log[0].duration, 30_000);
        assert_eq!(log[1].duration, 45_000);
        assert!(log[0].date > log[1].date);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;

        store.append(12_000).await?;
        assert_eq!(store.load().await, store.load().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_log_caps_at_two_hundred_entries() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;

        for i in 0..(MAX_SESSIONS as u64 + 1) {
            store.append(1_000 + i).await?;
        }

        let log = store.load().await;
        assert_eq!(log.len(), MAX_SESSIONS);
        // The 201st append sits at the front, the very first one is gone.
        assert_eq!(log[0].duration, 1_000 + MAX_SESSIONS as u64);
        assert!(log.iter().all(|s| s.duration != 1_000));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_slot_loads_as_empty_log() -> Result<()> {
        let mut slots = MockKeyValueStore::new();
        slots
            .expect_get()
            .returning(|_| Ok(Some("definitely not json".into())));

        let store = SessionStore::new(slots, Box::new(SteppingClock::new(TEST_START_DATE)));
        assert_eq!(store.load().await, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped_not_fatal() -> Result<()> {
        let mut slots = MockKeyValueStore::new();
        slots.expect_get().returning(|_| {
            Ok(Some(
                r#"[
                    {"date":"2024-04-05T08:00:00Z","duration":45000},
                    {"date":"2024-04-05T08:10:00Z","duration":"oops"},
                    {"duration":30000},
                    {"date":"2024-04-04T19:00:00Z","duration":30000}
                ]"#
                .into(),
            ))
        });

        let store = SessionStore::new(slots, Box::new(SteppingClock::new(TEST_START_DATE)));
        let log = store.load().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].duration, 45_000);
        assert_eq!(log[1].duration, 30_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_to_caller() -> Result<()> {
        let mut slots = MockKeyValueStore::new();
        slots.expect_get().returning(|_| Ok(None));
        slots
            .expect_set()
            .returning(|_, _| Err(anyhow!("disk full")));

        let store = SessionStore::new(slots, Box::new(SteppingClock::new(TEST_START_DATE)));
        assert!(store.append(45_000).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_stored_document_matches_slot_contract() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;
        store.append(45_000).await?;

        let kv = FileKeyValueStore::new(dir.path().to_owned())?;
        let raw = kv.get(HISTORY_KEY).await?.unwrap();
        assert_eq!(raw, r#"[{"date":"2024-04-05T08:00:00Z","duration":45000}]"#);
        Ok(())
    }
}
