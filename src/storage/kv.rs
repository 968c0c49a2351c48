use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// Key-value slot persistence. One slot holds one JSON document.
/// This is the only thing the session store knows about the disk.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Sync + Send + 'static {
    /// Reads a slot. A slot that was never written is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites a slot. Write errors propagate to the caller.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The main realization of [KeyValueStore]. Every slot is a `<key>.json`
/// file in the application state directory, guarded by advisory locks so a
/// second process can't interleave a write.
pub struct FileKeyValueStore {
    slot_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(slot_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&slot_dir)?;

        Ok(Self { slot_dir })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.slot_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        debug!("Reading slot {path:?}");

        let file = match File::open(&path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut file = file;
        let mut contents = String::new();
        let read_result = file.read_to_string(&mut contents).await;
        file.unlock_async().await?;
        read_result?;

        Ok(Some(contents))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);
        debug!("Writing slot {path:?}");

        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await?;

        file.lock_exclusive()?;
        let mut file = file;
        let write_result = async {
            file.write_all(value.as_bytes()).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        write_result?;

        Ok(())
    }
}
