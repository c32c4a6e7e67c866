//! Persistent key-value store: a `HashMap` in memory, a single snapshot file
//! on disk.
//!
//! Reads and writes only touch memory. [`flush`](KvStore::flush) writes the
//! whole map out as one blob, and opening a store reads that blob back in.
//! Turn on autosync to flush after every `set`/`delete`.
//!
//! ```rust,no_run
//! use snap_kv::KvStore;
//!
//! let mut db = KvStore::<String, String>::open("db.json").unwrap();
//! db.set("hello".into(), "world".into()).unwrap();
//! assert_eq!(db.get("hello").unwrap(), "world");
//! db.flush().unwrap();
//! ```
//!
//! **Single-process, single-writer only.** Nothing locks the file. Two stores
//! pointed at the same path will clobber each other's snapshots.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod persist;
pub mod serializer;
pub mod store;

pub use error::{Error, Result};
pub use serializer::{BincodeSerializer, JsonSerializer, Serializer};
pub use store::{KvStore, KvStoreBuilder};

/// Backing file used by [`KvStoreBuilder::default`].
pub const DEFAULT_PATH: &str = "datastore.json";
