//! Verification helpers for the switchdev config file
//!
//! Provides assertion helpers to verify what a manager left on disk

use std::path::{Path, PathBuf};

use switchdevmgrd::{EswitchMode, SwitchdevConfig};
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected no file at {0}")]
    UnexpectedFile(PathBuf),

    #[error("Expected an empty file, found {0} bytes")]
    NotEmpty(usize),

    #[error("Interface mismatch: expected {expected:?}, got {actual:?}")]
    InterfaceMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Interface '{0}' not found in config")]
    InterfaceNotFound(String),

    #[error("eswitchMode mismatch for {pci}: expected {expected:?}, got {actual:?}")]
    ModeMismatch {
        pci: String,
        expected: Option<EswitchMode>,
        actual: Option<EswitchMode>,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Switchdev config verification helper
pub struct ConfigVerifier<'a> {
    path: &'a Path,
}

impl<'a> ConfigVerifier<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    /// Raw bytes of the config file
    pub fn read_bytes(&self) -> VerifyResult<Vec<u8>> {
        std::fs::read(self.path).map_err(|source| VerificationError::Io {
            path: self.path.to_path_buf(),
            source,
        })
    }

    /// Parsed config file
    pub fn read_config(&self) -> VerifyResult<SwitchdevConfig> {
        Ok(serde_json::from_slice(&self.read_bytes()?)?)
    }

    /// Verify that no config file was created
    pub fn assert_absent(&self) -> VerifyResult<()> {
        if self.path.exists() {
            return Err(VerificationError::UnexpectedFile(self.path.to_path_buf()));
        }
        Ok(())
    }

    /// Verify that the config file exists and has zero bytes
    pub fn assert_empty(&self) -> VerifyResult<()> {
        let bytes = self.read_bytes()?;
        if !bytes.is_empty() {
            return Err(VerificationError::NotEmpty(bytes.len()));
        }
        Ok(())
    }

    /// Verify the PCI addresses of the config, in order
    pub fn assert_interfaces(&self, expected: &[&str]) -> VerifyResult<()> {
        let actual: Vec<String> = self
            .read_config()?
            .interfaces
            .into_iter()
            .map(|i| i.pci_address)
            .collect();
        if actual != expected {
            return Err(VerificationError::InterfaceMismatch {
                expected: expected.iter().map(|s| s.to_string()).collect(),
                actual,
            });
        }
        Ok(())
    }

    /// Verify the persisted eswitch mode of one PF
    pub fn assert_eswitch_mode(&self, pci: &str, expected: Option<EswitchMode>) -> VerifyResult<()> {
        let config = self.read_config()?;
        let iface = config
            .interfaces
            .iter()
            .find(|i| i.pci_address == pci)
            .ok_or_else(|| VerificationError::InterfaceNotFound(pci.to_string()))?;
        if iface.eswitch_mode != expected {
            return Err(VerificationError::ModeMismatch {
                pci: pci.to_string(),
                expected,
                actual: iface.eswitch_mode,
            });
        }
        Ok(())
    }
}
