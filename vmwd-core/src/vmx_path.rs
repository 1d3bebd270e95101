//! VMX path deduction.
//!
//! When a domain is defined from a normalized record rather than discovered
//! through `vmrun list`, the location of its VMX file is unknown. We assume it
//! sits next to the first file-backed hard disk and is named after the domain.
//! This is a heuristic: it holds for VMs created by the VMware products, but
//! nothing guarantees it.

use crate::error::{Result, VmwdError};
use crate::types::{DiskDevice, DomainDef, StorageType};
use std::path::PathBuf;
use tracing::debug;

/// Native disk image suffix, compared case-insensitively.
pub const VMDK_SUFFIX: &str = ".vmdk";

/// Native configuration file extension.
pub const VMX_EXTENSION: &str = "vmx";

/// Deduce the VMX path of `def` from its first file-backed hard disk.
///
/// CD-ROMs are skipped on purpose: ISO images usually live outside the VM
/// directory.
pub fn vmx_path(def: &DomainDef) -> Result<PathBuf> {
    let disk = def
        .disks
        .iter()
        .find(|d| d.device == DiskDevice::Disk && d.source_type == StorageType::File)
        .ok_or_else(|| VmwdError::MissingDisk { domain: def.name.clone() })?;

    let source = disk
        .source
        .as_deref()
        .ok_or_else(|| VmwdError::MissingSource { domain: def.name.clone() })?;

    let (directory, file_name) = split_path(source)?;

    if !has_case_suffix(file_name, VMDK_SUFFIX) {
        return Err(VmwdError::UnexpectedFormat {
            path: source.to_string(),
            reason: "expecting source of first file-based harddisk to be a VMDK image".to_string(),
        });
    }

    let path = construct_vmx_path(directory, &def.name);
    debug!(domain = %def.name, disk = source, vmx = %path.display(), "Deduced VMX path");
    Ok(path)
}

/// Build `{directory}/{name}.vmx`, or `{name}.vmx` without a directory.
pub fn construct_vmx_path(directory: Option<&str>, name: &str) -> PathBuf {
    match directory {
        Some(dir) => PathBuf::from(format!("{}/{}.{}", dir, name, VMX_EXTENSION)),
        None => PathBuf::from(format!("{}.{}", name, VMX_EXTENSION)),
    }
}

/// Split `path` at its last `/` into `(directory, file name)`.
///
/// - `"/vms/a.vmdk"` → `(Some("/vms"), "a.vmdk")`
/// - `"/a.vmdk"` → `(Some(""), "a.vmdk")`
/// - `"a.vmdk"` → `(None, "a.vmdk")`
/// - `"/vms/"` → `UnexpectedFormat`, the path names a directory
fn split_path(path: &str) -> Result<(Option<&str>, &str)> {
    match path.rsplit_once('/') {
        Some((_, "")) => Err(VmwdError::UnexpectedFormat {
            path: path.to_string(),
            reason: "path doesn't reference a file".to_string(),
        }),
        Some((dir, file)) => Ok((Some(dir), file)),
        None => Ok((None, path)),
    }
}

fn has_case_suffix(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.get(s.len() - suffix.len()..).is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}
