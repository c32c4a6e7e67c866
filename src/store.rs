//! Core store type and builder.

use crate::error::{Error, Result};
use crate::persist::{atomic_write, read_snapshot, write_snapshot};
use crate::serializer::{JsonSerializer, Serializer};
use crate::DEFAULT_PATH;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Index;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// In-memory key-value store backed by a single snapshot file.
///
/// The map in memory is the source of truth. The file only changes on
/// [`flush`](Self::flush), or on every `set`/`delete` when autosync is on.
/// Construction loads whatever snapshot is already on disk.
///
/// Generic over key `K`, value `V`, and snapshot format `S` (JSON unless you
/// pick another one through the [`builder`](Self::builder)).
pub struct KvStore<K, V, S = JsonSerializer> {
    map: HashMap<K, V>,
    path: PathBuf,
    serializer: S,
    autosync: bool,
    atomic: bool,
}

impl<K, V> KvStore<K, V, JsonSerializer>
where
    K: Hash + Eq + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open (or create) a JSON store at `path`, flushing on every mutation if
    /// `autosync` is set.
    pub fn new(path: impl AsRef<Path>, autosync: bool) -> Result<Self> {
        Self::builder(path).autosync(autosync).build()
    }

    /// Open (or create) a store at `path` with manual flush and compact JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](KvStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> KvStoreBuilder<K, V, JsonSerializer> {
        KvStoreBuilder::new(path)
    }
}

impl<K, V, S> KvStore<K, V, S>
where
    K: Hash + Eq + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
    S: Serializer,
{
    // ---- reads ----

    /// Get the value for `key`.
    ///
    /// Only true absence is an error: a key mapped to `0`, `""` or an empty
    /// collection is found like any other.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).ok_or(Error::KeyNotFound)
    }

    /// `true` if the key exists.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All key-value pairs, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map.iter()
    }

    /// All keys, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// All values, in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values()
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether mutations flush straight away.
    #[must_use]
    pub fn autosync(&self) -> bool {
        self.autosync
    }

    // ---- writes ----

    /// Insert or overwrite `key`.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        self.map.insert(key, value);
        self.sync()
    }

    /// Remove `key` and return its value. Nothing is flushed when the key
    /// wasn't there.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.map.remove(key).ok_or(Error::KeyNotFound)?;
        self.sync()?;
        Ok(value)
    }

    /// Drop all entries from the store.
    pub fn clear(&mut self) -> Result<()> {
        self.map.clear();
        self.sync()
    }

    /// Bulk-insert from an iterator. Only triggers one flush at the end, not
    /// one per entry.
    pub fn extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.map.extend(iter);
        self.sync()
    }

    /// Mutate the value at `key` in place. Returns `false` if the key doesn't
    /// exist (nothing happens in that case).
    pub fn update<Q, F>(&mut self, key: &Q, f: F) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&mut V),
    {
        match self.map.get_mut(key) {
            Some(v) => {
                f(v);
                self.sync()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Return the value for `key`, inserting the result of `f` first if the
    /// key is missing. `f` only runs when it's needed.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> Result<&V>
    where
        K: Clone,
        F: FnOnce() -> V,
    {
        if !self.map.contains_key(&key) {
            self.map.insert(key.clone(), f());
            self.sync()?;
        }
        self.map.get(&key).ok_or(Error::KeyNotFound)
    }

    // ---- persistence ----

    /// Replace the in-memory map with the snapshot on disk.
    ///
    /// A missing or empty file leaves the map as it is. Content that doesn't
    /// decode fails with [`Error::CorruptData`] and also leaves the map alone.
    pub fn load(&mut self) -> Result<()> {
        let Some(bytes) = read_snapshot(&self.path)? else {
            debug!(path = %self.path.display(), "no snapshot on disk");
            return Ok(());
        };
        let map = self.serializer.deserialize(&bytes).map_err(|err| {
            warn!(
                path = %self.path.display(),
                format = self.serializer.name(),
                error = %err,
                "snapshot failed to decode"
            );
            err
        })?;
        self.map = map;
        debug!(
            path = %self.path.display(),
            entries = self.map.len(),
            "loaded snapshot"
        );
        Ok(())
    }

    /// Write the whole map to disk, replacing the previous snapshot.
    pub fn flush(&self) -> Result<()> {
        let bytes = self.serializer.serialize(&self.map)?;
        if self.atomic {
            atomic_write(&self.path, &bytes)?;
        } else {
            write_snapshot(&self.path, &bytes)?;
        }
        debug!(
            path = %self.path.display(),
            entries = self.map.len(),
            bytes = bytes.len(),
            format = self.serializer.name(),
            "flushed snapshot"
        );
        Ok(())
    }

    // ---- internal ----

    fn sync(&self) -> Result<()> {
        if self.autosync {
            self.flush()?;
        }
        Ok(())
    }
}

impl<K, V, S, Q> Index<&Q> for KvStore<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    type Output = V;

    /// Panics if `key` is absent, like `HashMap`. Use
    /// [`get`](KvStore::get) for the fallible version.
    fn index(&self, key: &Q) -> &V {
        self.map.get(key).expect("key not found")
    }
}

impl<K, V, S: Serializer> std::fmt::Debug for KvStore<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("path", &self.path)
            .field("format", &self.serializer.name())
            .field("autosync", &self.autosync)
            .field("atomic", &self.atomic)
            .field("entries", &self.map.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`KvStore`].
///
/// ```rust,no_run
/// use snap_kv::{BincodeSerializer, KvStore};
///
/// let db = KvStore::<(u32, u32), String>::builder("grid.bin")
///     .serializer(BincodeSerializer)
///     .autosync(true)
///     .build()
///     .unwrap();
/// ```
pub struct KvStoreBuilder<K, V, S = JsonSerializer> {
    path: PathBuf,
    autosync: bool,
    atomic: bool,
    serializer: S,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> KvStoreBuilder<K, V, JsonSerializer> {
    /// Builder for a JSON store at `path`, manual flush, plain writes.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            autosync: false,
            atomic: false,
            serializer: JsonSerializer::new(),
            _marker: PhantomData,
        }
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.serializer = if yes {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };
        self
    }
}

impl<K, V> Default for KvStoreBuilder<K, V, JsonSerializer> {
    /// Builder pointed at [`DEFAULT_PATH`] in the working directory.
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl<K, V, S> KvStoreBuilder<K, V, S>
where
    K: Hash + Eq + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
    S: Serializer,
{
    /// Flush after every `set`/`delete` (default: off).
    pub fn autosync(mut self, yes: bool) -> Self {
        self.autosync = yes;
        self
    }

    /// Flush through a temp file and rename instead of rewriting the file in
    /// place (default: off).
    pub fn atomic(mut self, yes: bool) -> Self {
        self.atomic = yes;
        self
    }

    /// Swap the snapshot format.
    pub fn serializer<S2: Serializer>(self, serializer: S2) -> KvStoreBuilder<K, V, S2> {
        KvStoreBuilder {
            path: self.path,
            autosync: self.autosync,
            atomic: self.atomic,
            serializer,
            _marker: PhantomData,
        }
    }

    /// Create the store and load any existing snapshot into it.
    pub fn build(self) -> Result<KvStore<K, V, S>> {
        let mut store = KvStore {
            map: HashMap::new(),
            path: self.path,
            serializer: self.serializer,
            autosync: self.autosync,
            atomic: self.atomic,
        };
        store.load()?;
        Ok(store)
    }
}

impl<K, V, S: Serializer> std::fmt::Debug for KvStoreBuilder<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStoreBuilder")
            .field("path", &self.path)
            .field("format", &self.serializer.name())
            .field("autosync", &self.autosync)
            .field("atomic", &self.atomic)
            .finish()
    }
}
