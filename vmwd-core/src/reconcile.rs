//! Inventory reconciliation.
//!
//! `vmrun list` is the only source of truth for which VMs are running. Each
//! listed VMX file is parsed, registered, and annotated with its GUI mode and
//! the VMX process pid taken from `vmware.log`.
//!
//! A pass is all-or-nothing towards the caller: the first bad VM aborts it.
//! Domains registered earlier in the same pass stay in the registry. Two
//! listed VMX files that define the same domain name abort the pass too.

use crate::driver::Driver;
use crate::error::{Result, VmwdError};
use crate::observability::metrics;
use crate::pid;
use crate::types::{DomainPrivate, DomainState, StateReason};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument, warn};

/// Report of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Names of the domains registered, in `vmrun list` order
    pub domains: Vec<String>,
}

impl ReconcileReport {
    pub fn running(&self) -> usize {
        self.domains.len()
    }
}

/// Run one reconciliation pass against `driver`.
///
/// Callers serialize passes; [`Driver::reconcile`] does so with its guard.
#[instrument(skip(driver), fields(flavor = %driver.flavor()))]
pub async fn reconcile(driver: &Driver) -> Result<ReconcileReport> {
    info!("Reconciling VMware domains...");
    metrics::record_reconcile();

    match reconcile_inner(driver).await {
        Ok(report) => {
            info!("Reconciliation complete: {} running", report.running());
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, "Reconciliation aborted");
            metrics::record_reconcile_failure(e.kind());
            Err(e)
        }
    }
}

async fn reconcile_inner(driver: &Driver) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    // Domain name -> VMX file it was loaded from in this pass
    let mut seen = HashMap::new();

    for vmx_path in driver.tool().list().await? {
        let name = load_running_domain(driver, &vmx_path, &mut seen).await?;
        metrics::record_domain_discovered();
        report.domains.push(name);
    }

    Ok(report)
}

/// Register the running VM whose configuration is at `vmx_path`.
#[instrument(skip(driver, seen))]
async fn load_running_domain(
    driver: &Driver,
    vmx_path: &Path,
    seen: &mut HashMap<String, PathBuf>,
) -> Result<String> {
    let config = driver.config();

    let vmx = read_bounded(vmx_path, config.max_vmx_bytes).await?;
    let def = driver.translator().parse(&vmx).map_err(|e| VmwdError::ConfigParse {
        path: vmx_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match seen.get(&def.name) {
        Some(existing) if existing != vmx_path => {
            return Err(VmwdError::DomainExists {
                name: def.name,
                existing: existing.clone(),
                path: vmx_path.to_path_buf(),
            });
        }
        Some(_) => {}
        None => {
            seen.insert(def.name.clone(), vmx_path.to_path_buf());
        }
    }

    let handle = driver.registry().add(def).await;
    let name = {
        let mut obj = handle.lock().await;
        let gui = DomainPrivate::gui_from_graphics(&obj.def.graphics);
        // The listing already names the VMX file; no need to deduce it.
        obj.private = DomainPrivate { vmx_path: Some(vmx_path.to_path_buf()), gui };
        obj.def.name.clone()
    };

    // Only running VMs are listed, so a missing log is an error here too.
    let pid = pid::extract_pid(vmx_path, &config.log_file_name).await?;

    {
        let mut obj = handle.lock().await;
        obj.def.id = Some(pid);
        obj.set_state(DomainState::Running, StateReason::Unknown);
        obj.persistent = true;
    }

    info!(domain = %name, pid, "Domain {} is running", name);
    Ok(name)
}

/// Read all of `path`, refusing files larger than `limit` bytes.
pub async fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let io_err = |e: std::io::Error| VmwdError::Io { path: PathBuf::from(path), source: e };

    let file = File::open(path).await.map_err(io_err)?;

    let mut buf = Vec::new();
    file.take(limit + 1).read_to_end(&mut buf).await.map_err(io_err)?;

    if buf.len() as u64 > limit {
        return Err(VmwdError::SizeExceeded { path: path.to_path_buf(), limit });
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_bounded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.vmx");
        std::fs::write(&path, "x".repeat(100)).unwrap();

        assert_eq!(read_bounded(&path, 100).await.unwrap().len(), 100);

        let err = read_bounded(&path, 99).await.unwrap_err();
        assert!(matches!(err, VmwdError::SizeExceeded { limit: 99, .. }));
    }

    #[tokio::test]
    async fn test_read_bounded_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_bounded(&dir.path().join("missing.vmx"), 100).await.unwrap_err();
        assert!(matches!(err, VmwdError::Io { .. }));
    }
}
