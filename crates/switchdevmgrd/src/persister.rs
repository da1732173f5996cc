//! Idempotent persistence of the switchdev config file.
//!
//! The file is only rewritten when its bytes would change. An empty config
//! is represented by a zero-byte file, and a missing file counts as empty,
//! so a node with nothing to configure never gets a file created.

use std::fs::{self, OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use sriov_cfgmgr_common::{CfgMgrError, CfgMgrResult};
use tracing::{debug, error, info};

use crate::tables::SWITCHDEV_CONF_MODE;
use crate::types::SwitchdevConfig;

/// Writes [`SwitchdevConfig`] to a fixed path.
///
/// Assumes a single writer; callers serialize invocations.
#[derive(Debug, Clone)]
pub struct ConfigPersister {
    path: PathBuf,
}

impl ConfigPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `config` as it is stored on disk.
    ///
    /// No interfaces means no content at all, not `{"interfaces":[]}`.
    pub fn render(config: &SwitchdevConfig) -> CfgMgrResult<Vec<u8>> {
        if config.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::to_vec(config)?)
    }

    /// Returns the current file bytes; a missing file reads as empty.
    pub fn read_current(&self) -> CfgMgrResult<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Switchdev config does not exist yet");
                Ok(Vec::new())
            }
            Err(e) => {
                error!("Failed to read {}: {}", self.path.display(), e);
                Err(CfgMgrError::io("read", &self.path, e))
            }
        }
    }

    /// Persists `config`, returning whether the file was written.
    ///
    /// A symlink at the path is read through but replaced by a regular file
    /// on write.
    ///
    /// `Ok(false)` means nothing was written. It does not imply the file
    /// exists: an empty config with no file on disk also yields `Ok(false)`.
    pub fn persist(&self, config: &SwitchdevConfig) -> CfgMgrResult<bool> {
        let old_content = self.read_current()?;
        let new_content = Self::render(config)?;

        if new_content == old_content {
            debug!(path = %self.path.display(), "Switchdev config unchanged");
            return Ok(false);
        }

        info!(
            path = %self.path.display(),
            interfaces = config.len(),
            "Writing switchdev config: '{}'",
            String::from_utf8_lossy(&new_content)
        );
        self.write(&new_content)?;
        Ok(true)
    }

    /// Replaces the file through a sibling temp file and a rename.
    ///
    /// The rename replaces the directory entry itself: if the path is a
    /// symlink, the link becomes a regular file and its target is left
    /// untouched. Readers never observe a partially written config.
    fn write(&self, content: &[u8]) -> CfgMgrResult<()> {
        let tmp = self.tmp_path();

        let result = write_file(&tmp, content).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(|e| CfgMgrError::io("rename", &self.path, e))
        });

        if let Err(e) = &result {
            error!("Failed to write switchdev config: {}", e);
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

fn write_file(path: &Path, content: &[u8]) -> CfgMgrResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(SWITCHDEV_CONF_MODE)
        .open(path)
        .map_err(|e| CfgMgrError::io("create", path, e))?;

    file.write_all(content)
        .and_then(|()| file.set_permissions(Permissions::from_mode(SWITCHDEV_CONF_MODE)))
        .and_then(|()| file.sync_all())
        .map_err(|e| CfgMgrError::io("write", path, e))
}
