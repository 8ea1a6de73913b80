use std::{collections::BTreeMap, path::{Path, PathBuf}};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;

/// How the map is written back to disk.
#[derive(Debug, Clone)]
pub struct PersistOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    /// Write to a sibling temp file, then rename over the target.
    pub atomic_writes: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self { indent: 4, atomic_writes: false }
    }
}

/// What happened when the backing file was read at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Missing,
    /// File existed but could not be read or decoded; started empty.
    Discarded,
}

/// Generic JSON file-backed key-value map store.
///
/// The whole map lives in memory behind one `RwLock`. Every mutation rewrites
/// the complete file while still holding the write lock, so memory and disk
/// are changed by one writer at a time.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: PathBuf,
    options: PersistOptions,
    loaded: LoadOutcome,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open the store at `path`. A missing or undecodable file yields an empty
    /// map; the file is left untouched until the first mutation.
    pub async fn open<P: Into<PathBuf>>(path: P, options: PersistOptions) -> Self {
        let file_path = path.into();
        let (map, loaded) = load(&file_path).await;
        Self { inner: RwLock::new(map), file_path, options, loaded }
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.loaded
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Run a read-only closure against the map.
    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&BTreeMap<K, V>) -> R,
    {
        let map = self.inner.read().await;
        f(&*map)
    }

    /// Apply a mutation and persist the whole map before releasing the lock.
    ///
    /// If `f` returns an error nothing is written. If the write fails, the
    /// in-memory change stays applied and the error is returned.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let out = f(&mut *map)?;
        let data = self.encode(&map)?;
        self.write_file(&data).await?;
        debug!(file = %self.file_path.display(), entries = map.len(), bytes = data.len(), "store persisted");
        Ok(out)
    }

    fn encode(&self, map: &BTreeMap<K, V>) -> Result<Vec<u8>, ServiceError> {
        let indent = vec![b' '; self.options.indent];
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        map.serialize(&mut ser).map_err(|e| ServiceError::Persistence(e.to_string()))?;
        Ok(buf)
    }

    async fn write_file(&self, data: &[u8]) -> Result<(), ServiceError> {
        let persist_err = |e: std::io::Error| ServiceError::Persistence(format!("{}: {e}", self.file_path.display()));
        if self.options.atomic_writes {
            let tmp = temp_path(&self.file_path);
            fs::write(&tmp, data).await.map_err(persist_err)?;
            fs::rename(&tmp, &self.file_path).await.map_err(persist_err)?;
        } else {
            fs::write(&self.file_path, data).await.map_err(persist_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    /// Clone of the current map.
    pub async fn snapshot(&self) -> BTreeMap<K, V> {
        self.inner.read().await.clone()
    }
}

async fn load<K, V>(path: &Path) -> (BTreeMap<K, V>, LoadOutcome)
where
    K: Ord + DeserializeOwned,
    V: DeserializeOwned,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<BTreeMap<K, V>>(&bytes) {
            Ok(map) => {
                info!(file = %path.display(), entries = map.len(), "loaded store from disk");
                let n = map.len();
                (map, LoadOutcome::Loaded(n))
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not decode data file; starting with an empty store");
                (BTreeMap::new(), LoadOutcome::Discarded)
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(file = %path.display(), "data file not found; starting with an empty store");
            (BTreeMap::new(), LoadOutcome::Missing)
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "could not read data file; starting with an empty store");
            (BTreeMap::new(), LoadOutcome::Discarded)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store.json".into());
    path.with_file_name(format!(".{name}.tmp"))
}
