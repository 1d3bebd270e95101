//! Driver configuration.

use crate::error::{Result, VmwdError};
use crate::paths;
use crate::pid::LOG_FILE_NAME;
use crate::types::Flavor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest VMX file the driver will read. Real ones are a few kilobytes.
pub const DEFAULT_MAX_VMX_BYTES: u64 = 10_000;

/// Persistent configuration for the VMware driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Path to `vmrun`; empty means "look it up"
    pub vmrun_path: PathBuf,
    pub flavor: Flavor,
    /// Upper bound on any single `vmrun`/companion invocation
    pub command_timeout_secs: u64,
    pub max_vmx_bytes: u64,
    pub log_file_name: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            vmrun_path: PathBuf::new(),
            flavor: Flavor::Workstation,
            command_timeout_secs: 30,
            max_vmx_bytes: DEFAULT_MAX_VMX_BYTES,
            log_file_name: LOG_FILE_NAME.to_string(),
        }
    }
}

impl DriverConfig {
    /// Load configuration from [`paths::config_path`].
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Load configuration from `path`; a missing file yields the defaults.
    ///
    /// An unset `vmrun_path` is filled in from [`paths::find_vmrun`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| VmwdError::InvalidConfig {
                reason: format!("Failed to read config {}: {}", path.display(), e),
            })?;
            serde_json::from_str(&content).map_err(|e| VmwdError::InvalidConfig {
                reason: format!("Failed to parse config {}: {}", path.display(), e),
            })?
        } else {
            Self::default()
        };

        if config.vmrun_path.as_os_str().is_empty() {
            config.vmrun_path = paths::find_vmrun().unwrap_or_default();
        }
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VmwdError::Io { path: parent.to_path_buf(), source: e })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| VmwdError::InvalidConfig {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| VmwdError::Io { path: path.to_path_buf(), source: e })
    }

    /// Check the invariants the driver relies on before shelling out.
    pub fn validate(&self) -> Result<()> {
        if self.vmrun_path.as_os_str().is_empty() {
            return Err(VmwdError::InvalidConfig {
                reason: "vmrun path is not set and vmrun was not found".to_string(),
            });
        }
        if self.command_timeout_secs == 0 {
            return Err(VmwdError::InvalidConfig {
                reason: "command_timeout_secs must be positive".to_string(),
            });
        }
        if self.log_file_name.is_empty() || self.log_file_name.contains('/') {
            return Err(VmwdError::InvalidConfig {
                reason: format!("invalid log file name {:?}", self.log_file_name),
            });
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
