//! File-backed JSON key-value store

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Store name used when the caller does not pick one
pub const DEFAULT_STORE_NAME: &str = "default";

/// Directory component under the user cache directory
const APP_DIR: &str = "tunegate";

/// A named persistent mapping from string keys to JSON values.
///
/// Each store is one file, `<dir>/<name>.json`, holding a single JSON
/// object. Opening a store that does not exist yet initializes the file to
/// `{}`; opening an existing store never touches its contents.
///
/// An absent key is distinct from a key stored with a `null` (or otherwise
/// falsy) value: [`CacheStore::contains`] reports presence, and
/// [`CacheStore::load`] returns `None` only when the key is absent.
///
/// A backing file that no longer parses as a JSON object is treated as
/// corruption and every read operation fails; the store never silently
/// resets externally damaged data.
#[derive(Debug, Clone)]
pub struct CacheStore {
    name: String,
    path: PathBuf,
}

impl CacheStore {
    /// Open the default-named store under the user cache directory.
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_STORE_NAME)
    }

    /// Open a named store under the user cache directory
    /// (`<cache dir>/tunegate/<name>.json`).
    pub fn open(name: &str) -> Result<Self> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("no user cache directory available"))?
            .join(APP_DIR);
        Self::open_in(dir, name)
    }

    /// Open a named store in an explicit directory.
    ///
    /// Creates the directory and an empty store file if needed. Opening the
    /// same store repeatedly is idempotent and never overwrites existing
    /// data.
    pub fn open_in<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating cache directory {}", dir.display()))?;
            info!("Created cache directory: {}", dir.display());
        }

        let path = dir.join(format!("{}.json", name));
        if !path.exists() {
            fs::write(&path, "{}")
                .with_context(|| format!("initializing cache store {}", path.display()))?;
            debug!("Initialized empty cache store: {}", path.display());
        }

        Ok(Self {
            name: name.to_string(),
            path,
        })
    }

    /// Name of this store
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether `hash` is a present key.
    ///
    /// Returns `true` for keys stored with a `null` value; presence is about
    /// the key, not the value.
    pub fn contains(&self, hash: &str) -> Result<bool> {
        Ok(self.read_map()?.contains_key(hash))
    }

    /// Load the value stored under `hash`, or `None` if the key is absent.
    ///
    /// A missing key is not an error.
    pub fn load(&self, hash: &str) -> Result<Option<Value>> {
        Ok(self.read_map()?.get(hash).cloned())
    }

    /// Snapshot of the whole store.
    ///
    /// The returned mapping is detached; mutating it does not affect the
    /// stored state.
    pub fn load_all(&self) -> Result<Map<String, Value>> {
        self.read_map()
    }

    /// Insert or overwrite the value stored under `hash`.
    pub fn store<T: Serialize>(&self, hash: &str, data: &T) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(hash.to_string(), serde_json::to_value(data)?);
        self.write_map(&map)?;
        debug!("Stored {} in cache {}", hash, self.name);
        Ok(())
    }

    /// Delete the key if present; a no-op for an absent key.
    pub fn remove(&self, hash: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(hash).is_some() {
            self.write_map(&map)?;
            debug!("Removed {} from cache {}", hash, self.name);
        }
        Ok(())
    }

    /// Reset the store to an empty mapping, discarding all keys.
    pub fn clear(&self) -> Result<()> {
        self.write_map(&Map::new())?;
        debug!("Cleared cache {}", self.name);
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading cache store {}", self.path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("cache store {} is corrupted", self.path.display()))
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let text = serde_json::to_string(map)?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing cache store {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_load_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        let data = json!({"title": "So What", "artist": "Miles Davis", "length": 545});
        cache.store("abc123", &data)?;

        assert!(cache.contains("abc123")?);
        assert_eq!(cache.load("abc123")?, Some(data));

        Ok(())
    }

    #[test]
    fn test_absent_key_is_none_not_error() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        assert!(!cache.contains("missing")?);
        assert_eq!(cache.load("missing")?, None);

        Ok(())
    }

    #[test]
    fn test_null_value_is_present() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        cache.store("nulled", &Value::Null)?;

        // Presence is about the key, not the value.
        assert!(cache.contains("nulled")?);
        assert_eq!(cache.load("nulled")?, Some(Value::Null));

        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        cache.store("abc", &json!(1))?;
        cache.remove("abc")?;
        assert!(!cache.contains("abc")?);

        // Removing an absent key is a no-op, not an error.
        cache.remove("abc")?;

        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        cache.store("a", &json!(1))?;
        cache.store("b", &json!(2))?;
        cache.clear()?;

        assert!(cache.load_all()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_load_all_is_a_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        cache.store("a", &json!(1))?;

        let mut snapshot = cache.load_all()?;
        snapshot.insert("b".to_string(), json!(2));
        snapshot.remove("a");

        assert!(cache.contains("a")?);
        assert!(!cache.contains("b")?);

        Ok(())
    }

    #[test]
    fn test_reopen_is_idempotent() -> Result<()> {
        let dir = tempdir()?;

        let cache = CacheStore::open_in(dir.path(), "tracks")?;
        cache.store("a", &json!("kept"))?;

        // A second open of the same name must not reset existing data.
        let reopened = CacheStore::open_in(dir.path(), "tracks")?;
        assert_eq!(reopened.load("a")?, Some(json!("kept")));

        Ok(())
    }

    #[test]
    fn test_stores_are_isolated_by_name() -> Result<()> {
        let dir = tempdir()?;

        let tracks = CacheStore::open_in(dir.path(), "tracks")?;
        let playlists = CacheStore::open_in(dir.path(), "playlists")?;

        tracks.store("a", &json!(1))?;
        assert!(!playlists.contains("a")?);

        Ok(())
    }

    #[test]
    fn test_corrupted_backing_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let cache = CacheStore::open_in(dir.path(), "tracks")?;

        fs::write(cache.path(), "not json at all")?;

        assert!(cache.load("a").is_err());
        assert!(cache.contains("a").is_err());
        assert!(cache.load_all().is_err());

        Ok(())
    }
}
