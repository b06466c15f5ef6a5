//! # Persistent Key-Value Storage
//!
//! A small string store for state that must survive restarts. Today that is
//! only the session, kept under the `auth` key.
//!
//! ```text
//! ┌──────────────────────────┐      ┌───────────────────────────────────┐
//! │ FileStorage              │      │ MemoryStorage                     │
//! │ <data_dir>/auth.json     │      │ HashMap<String, String>           │
//! │ one file per key         │      │ tests and --no-persist runs       │
//! └──────────────────────────┘      └───────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// String storage keyed by name.
pub trait KeyValueStorage: Send + Sync {
    /// Returns `None` when the key was never written or has been removed.
    fn load(&self, key: &str) -> ClientResult<Option<String>>;

    fn save(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

// =============================================================================
// File Storage
// =============================================================================

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ClientResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ClientError::Storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(format!("{}: {e}", path.display()))),
        }
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ClientError::Storage(format!("{}: {e}", self.dir.display())))?;

        // Readers see the old file or the new one, never a partial write.
        let tmp = path.with_extension("json.tmp");
        write_private(&tmp, value)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))?;

        debug!(key, path = %path.display(), "Persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!("{}: {e}", path.display()))),
        }
    }
}

/// Writes `value` to a file only the owner can read. The stored session
/// holds bearer and refresh tokens.
fn write_private(path: &Path, value: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies on creation; a leftover file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

// =============================================================================
// Memory Storage
// =============================================================================

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
