use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use dispatch_core::errors::{DispatchError, DispatchResult};

use crate::schema;

pub const CHATS_DIR: &str = "chats";

/// File-backed record store. Each collection is one JSON document holding the
/// full ordered sequence of records, and every mutation is a load-modify-save
/// cycle run inside that collection's critical section. Different collections
/// are locked independently and proceed in parallel.
pub struct Store {
    data_dir: PathBuf,
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Store {
    /// Opens the store rooted at `data_dir`, creating the directory layout if
    /// it does not exist yet.
    pub async fn open(data_dir: impl Into<PathBuf>) -> DispatchResult<Self> {
        let data_dir = data_dir.into();
        schema::initialize_data_dir(&data_dir).await?;
        Ok(Self {
            data_dir,
            locks: std::sync::Mutex::new(HashMap::new()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn unit_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks.entry(collection.to_string()).or_default().clone()
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    async fn read_unlocked<T: DeserializeOwned>(&self, collection: &str) -> DispatchResult<Vec<T>> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(collection, "collection file absent, reading as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| DispatchError::CorruptCollection {
            collection: collection.to_string(),
            source,
        })
    }

    fn write_unlocked<T: Serialize>(&self, collection: &str, records: &[T]) -> DispatchResult<()> {
        let path = self.collection_path(collection);
        let parent = path.parent().unwrap_or(&self.data_dir);
        let json = serde_json::to_vec_pretty(records).map_err(std::io::Error::other)?;

        // Written next to the target and renamed over it, so a reader never
        // observes a half-written document.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.persist(&path)
            .map_err(|err| DispatchError::Storage(err.error))?;

        debug!(collection, records = records.len(), "collection saved");
        Ok(())
    }

    /// Loads the full record sequence for `collection`. A missing file is an
    /// empty collection; a file that fails to parse is `CorruptCollection`.
    pub async fn load<T: DeserializeOwned>(&self, collection: &str) -> DispatchResult<Vec<T>> {
        let lock = self.unit_lock(collection);
        let _guard = lock.lock().await;
        self.read_unlocked(collection).await
    }

    /// Replaces the whole collection with `records`.
    pub async fn save<T: Serialize>(&self, collection: &str, records: &[T]) -> DispatchResult<()> {
        let lock = self.unit_lock(collection);
        let _guard = lock.lock().await;
        self.write_unlocked(collection, records)
    }

    /// Appends one record to a grow-only collection.
    pub async fn append<T>(&self, collection: &str, record: T) -> DispatchResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.mutate(collection, |records: &mut Vec<T>| {
            records.push(record);
            Ok(())
        })
        .await
    }

    /// Runs `f` against the loaded records inside the collection's critical
    /// section and saves the result. Nothing is written when `f` fails, which
    /// is what keeps failed preconditions mutation-free.
    pub async fn mutate<T, R, F>(&self, collection: &str, f: F) -> DispatchResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> DispatchResult<R>,
    {
        let lock = self.unit_lock(collection);
        let _guard = lock.lock().await;
        let mut records = self.read_unlocked(collection).await?;
        let out = f(&mut records)?;
        self.write_unlocked(collection, &records)?;
        Ok(out)
    }

    pub async fn find_one<T, P>(&self, collection: &str, predicate: P) -> DispatchResult<Option<T>>
    where
        T: DeserializeOwned,
        P: FnMut(&T) -> bool,
    {
        let records = self.load::<T>(collection).await?;
        Ok(records.into_iter().find(predicate))
    }

    pub async fn find_all<T, P>(&self, collection: &str, predicate: P) -> DispatchResult<Vec<T>>
    where
        T: DeserializeOwned,
        P: FnMut(&T) -> bool,
    {
        let mut records = self.load::<T>(collection).await?;
        records.retain(predicate);
        Ok(records)
    }

    /// Applies `apply` to every record matching `predicate`, returning how
    /// many were touched. The document is rewritten only when something
    /// matched.
    pub async fn update_where<T, P, F>(
        &self,
        collection: &str,
        mut predicate: P,
        mut apply: F,
    ) -> DispatchResult<usize>
    where
        T: Serialize + DeserializeOwned,
        P: FnMut(&T) -> bool,
        F: FnMut(&mut T),
    {
        let lock = self.unit_lock(collection);
        let _guard = lock.lock().await;
        let mut records = self.read_unlocked::<T>(collection).await?;
        let mut touched = 0;
        for record in records.iter_mut() {
            if predicate(record) {
                apply(record);
                touched += 1;
            }
        }
        if touched > 0 {
            self.write_unlocked(collection, &records)?;
        }
        Ok(touched)
    }

    /// Removes every record matching `predicate`, returning how many were
    /// dropped.
    pub async fn remove_where<T, P>(&self, collection: &str, mut predicate: P) -> DispatchResult<usize>
    where
        T: Serialize + DeserializeOwned,
        P: FnMut(&T) -> bool,
    {
        let lock = self.unit_lock(collection);
        let _guard = lock.lock().await;
        let mut records = self.read_unlocked::<T>(collection).await?;
        let before = records.len();
        records.retain(|record| !predicate(record));
        let removed = before - records.len();
        if removed > 0 {
            self.write_unlocked(collection, &records)?;
        }
        Ok(removed)
    }

    /// Collection ids of every document under `dir` (e.g. the chat log
    /// directory), in directory order.
    pub async fn collections_in(&self, dir: &str) -> DispatchResult<Vec<String>> {
        let path = self.data_dir.join(dir);
        let mut entries = match tokio::fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut collections = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix(".json") {
                collections.push(format!("{dir}/{stem}"));
            }
        }
        Ok(collections)
    }
}
