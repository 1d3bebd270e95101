//! `vmwd version` command

use anyhow::Result;
use vmwd_core::{DriverConfig, VmrunTool};

/// Print the installed VMware product version.
pub async fn version(config: &DriverConfig, numeric: bool) -> Result<()> {
    let tool = VmrunTool::new(&config.vmrun_path, config.flavor, config.command_timeout());
    let version = tool.version().await?;

    if numeric {
        println!("{}", version.as_number());
    } else {
        println!("VMware {} {}", config.flavor, version);
    }

    Ok(())
}
