//! `vmwd list` command

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use vmwd_core::pid::extract_pid;
use vmwd_core::{DriverConfig, VmrunTool};

#[derive(Tabled)]
struct VmRow {
    #[tabled(rename = "VMX")]
    vmx: String,
    #[tabled(rename = "PID")]
    pid: String,
    #[tabled(rename = "LOG")]
    log: String,
}

/// List running VMs with the pid recovered from each `vmware.log`.
///
/// Unlike driver reconciliation, a VM whose log can't be read is still shown.
pub async fn list(config: &DriverConfig) -> Result<()> {
    let tool = VmrunTool::new(&config.vmrun_path, config.flavor, config.command_timeout());
    let vmx_paths = tool.list().await?;

    if vmx_paths.is_empty() {
        println!("No VMs running");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(vmx_paths.len());
    for vmx in vmx_paths {
        let (pid, log) = match extract_pid(&vmx, &config.log_file_name).await {
            Ok(pid) => (pid.to_string(), "ok".green().to_string()),
            Err(e) => ("-".to_string(), e.to_string().red().to_string()),
        };
        rows.push(VmRow { vmx: vmx.display().to_string(), pid, log });
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{}", table);

    Ok(())
}
