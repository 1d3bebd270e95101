//! `vmwd pid` command

use anyhow::Result;
use std::path::Path;
use vmwd_core::pid::extract_pid;
use vmwd_core::DriverConfig;

/// Print the VMX process id of the VM configured at `vmx`.
pub async fn pid(config: &DriverConfig, vmx: &Path) -> Result<()> {
    let pid = extract_pid(vmx, &config.log_file_name).await?;
    println!("{}", pid);
    Ok(())
}
