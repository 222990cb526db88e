use crate::{
    error::{IdentityError, Result as IdentityResult},
    load_result::LoadResult,
    stored_identity::StoredIdentity,
};

use st_core::DeviceIdentity;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{info, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Owns the per-installation device identity file.
///
/// Every read and write goes through one mutex, so concurrent callers in this
/// process can never mint two identities.
pub struct IdentityStore {
    path: PathBuf,
    cached: Mutex<Option<DeviceIdentity>>,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted identity, minting and saving one on first use.
    ///
    /// A corrupted file is backed up and replaced with a fresh identity.
    pub fn get_or_create_device_identity(&self) -> IdentityResult<DeviceIdentity> {
        let mut cached = self.lock();
        if let Some(identity) = *cached {
            return Ok(identity);
        }

        let loaded = self.read()?;
        let identity = match loaded.identity {
            Some(stored) => stored.device_id,
            None => {
                if loaded.corruption_error.is_some() {
                    self.backup_corrupted()?;
                }
                let stored = StoredIdentity::mint();
                self.save(&stored)?;
                info!("Minted device identity {}", stored.device_id);
                stored.device_id
            }
        };

        *cached = Some(identity);
        Ok(identity)
    }

    /// Reads the identity file without creating one.
    ///
    /// Returns:
    /// - `LoadResult { identity: Some(..), corruption_error: None }` - loaded
    /// - `LoadResult { identity: None, corruption_error: None }` - no file yet
    /// - `LoadResult { identity: None, corruption_error: Some(..) }` - unreadable contents
    pub fn load(&self) -> IdentityResult<LoadResult> {
        let _guard = self.lock();
        self.read()
    }

    /// Deletes the persisted identity (app data reset). Returns whether a file
    /// was removed.
    pub fn reset(&self) -> IdentityResult<bool> {
        let mut cached = self.lock();
        *cached = None;

        match fs::remove_file(&self.path) {
            Ok(()) => {
                warn!("Device identity removed from {:?}", self.path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(IdentityError::file_remove(self.path.clone(), e)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<DeviceIdentity>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> IdentityResult<LoadResult> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No identity file at {:?} (first launch)", self.path);
                return Ok(LoadResult {
                    identity: None,
                    corruption_error: None,
                });
            }
            Err(e) => return Err(IdentityError::file_read(self.path.clone(), e)),
        };

        match serde_json::from_str::<StoredIdentity>(&contents) {
            Ok(stored) => {
                info!(
                    "Loaded device identity: {} (schema v{})",
                    stored.device_id, stored.schema_version
                );
                Ok(LoadResult {
                    identity: Some(stored),
                    corruption_error: None,
                })
            }
            Err(e) => {
                warn!("Identity file corrupted at {:?}: {e}", self.path);
                Ok(LoadResult {
                    identity: None,
                    corruption_error: Some(e.to_string()),
                })
            }
        }
    }

    /// Writes to a temp file, fsyncs, then renames over the final path so a
    /// crash never leaves a half-written identity.
    fn save(&self, stored: &StoredIdentity) -> IdentityResult<()> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&dir).map_err(|e| IdentityError::dir_creation(dir.clone(), e))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("device.json"));
        let temp_path = dir.join(format!("{file_name}.tmp.{}", std::process::id()));

        let json = serde_json::to_string_pretty(stored)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| IdentityError::file_write(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| IdentityError::file_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| IdentityError::file_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            IdentityError::atomic_rename(temp_path.clone(), self.path.clone(), e)
        })?;

        Ok(())
    }

    /// Renames the unreadable file to `<name>.corrupted.<timestamp>`.
    fn backup_corrupted(&self) -> IdentityResult<PathBuf> {
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupted.{timestamp}"));
        let backup_path = PathBuf::from(backup);

        fs::rename(&self.path, &backup_path)
            .map_err(|e| IdentityError::backup_failed(self.path.clone(), e))?;

        warn!("Backed up corrupted identity to {backup_path:?}");
        Ok(backup_path)
    }
}
