//! `vmwd vmx-path` command

use anyhow::Result;
use vmwd_core::vmx_path::vmx_path as deduce;
use vmwd_core::{DiskDef, DomainDef};

/// Print the VMX path deduced for a domain named `name` with the given disks.
///
/// `disks` are file-backed hard disks, `cdroms` file-backed CD-ROMs; CD-ROMs
/// come first so the deduction has to skip them.
pub fn vmx_path(name: &str, disks: &[String], cdroms: &[String]) -> Result<()> {
    let def = DomainDef {
        disks: cdroms
            .iter()
            .map(|p| DiskDef::cdrom(p.as_str()))
            .chain(disks.iter().map(|p| DiskDef::file(p.as_str())))
            .collect(),
        ..DomainDef::new(name)
    };

    println!("{}", deduce(&def)?.display());
    Ok(())
}
