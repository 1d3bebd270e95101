//! Centralized path configuration for vmwd.
//!
//! Configuration lookup and `vmrun` discovery go through this module so the
//! driver and the CLI agree on where things live.

use std::path::{Path, PathBuf};

/// Name of the VMware control tool.
#[cfg(windows)]
pub const VMRUN_BINARY: &str = "vmrun.exe";
#[cfg(not(windows))]
pub const VMRUN_BINARY: &str = "vmrun";

/// Get the vmwd configuration directory.
///
/// Resolution order:
/// 1. `VMWD_CONFIG_DIR` environment variable
/// 2. `<platform config dir>/vmwd` (e.g. `~/.config/vmwd`)
/// 3. `/etc/vmwd`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VMWD_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    dirs::config_dir().map(|d| d.join("vmwd")).unwrap_or_else(|| PathBuf::from("/etc/vmwd"))
}

/// Get the configuration file path (`VMWD_CONFIG` overrides it entirely).
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("VMWD_CONFIG") {
        return PathBuf::from(path);
    }

    config_dir().join("config.json")
}

/// Well-known install locations of `vmrun`.
fn vmrun_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    #[cfg(target_os = "macos")]
    candidates.push(PathBuf::from("/Applications/VMware Fusion.app/Contents/Library/vmrun"));

    #[cfg(windows)]
    {
        candidates.push(PathBuf::from(r"C:\Program Files (x86)\VMware\VMware Workstation\vmrun.exe"));
        candidates.push(PathBuf::from(r"C:\Program Files (x86)\VMware\VMware VIX\vmrun.exe"));
    }

    candidates.push(PathBuf::from("/usr/bin").join(VMRUN_BINARY));
    candidates.push(PathBuf::from("/usr/local/bin").join(VMRUN_BINARY));
    candidates
}

/// Locate `vmrun` in well-known install locations, then in `$PATH`.
pub fn find_vmrun() -> Option<PathBuf> {
    vmrun_candidates()
        .into_iter()
        .find(|p| p.is_file())
        .or_else(|| search_path(VMRUN_BINARY))
}

fn search_path(binary: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).map(|dir| dir.join(binary)).find(|p| p.is_file())
}

/// Directory holding `vmrun` and its companion binaries.
pub fn install_dir(vmrun: &Path) -> PathBuf {
    vmrun.parent().map(Path::to_path_buf).unwrap_or_default()
}
