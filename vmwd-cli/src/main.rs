use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vmwd_core::{DriverConfig, Flavor};

mod commands;

#[derive(Parser)]
#[command(name = "vmwd")]
#[command(about = "VMware Player/Workstation/Fusion driver diagnostics", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $VMWD_CONFIG or ~/.config/vmwd/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to vmrun (overrides the configuration)
    #[arg(long, global = true)]
    vmrun: Option<PathBuf>,

    /// Product flavor: player, ws or fusion (overrides the configuration)
    #[arg(short = 'T', long, global = true)]
    flavor: Option<Flavor>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installed VMware product version
    Version {
        /// Print the packed numeric form (major * 1000000 + minor * 1000 + micro)
        #[arg(long)]
        numeric: bool,
    },

    /// List running VMs and their VMX process ids
    List,

    /// Show the VMX process id recorded in a VM's vmware.log
    Pid {
        /// Path to the VM's .vmx file
        vmx: PathBuf,
    },

    /// Deduce the VMX path of a domain from its disks
    VmxPath {
        /// Domain name
        #[arg(short, long)]
        name: String,

        /// File-backed hard disk source (repeatable, in order)
        #[arg(short, long = "disk", required = true)]
        disks: Vec<String>,

        /// File-backed CD-ROM source (repeatable)
        #[arg(long = "cdrom")]
        cdroms: Vec<String>,
    },

    /// Move a VM file
    Mv {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Show guest capabilities of this host
    Capabilities {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    fn driver_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::load_from(path),
            None => DriverConfig::load(),
        }
        .context("Failed to load configuration")?;

        if let Some(vmrun) = &self.vmrun {
            config.vmrun_path = vmrun.clone();
        }
        if let Some(flavor) = self.flavor {
            config.flavor = flavor;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    vmwd_core::init_observability(level)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match &cli.command {
        Commands::Version { numeric } => {
            let config = cli.driver_config()?;
            config.validate()?;
            commands::version(&config, *numeric).await?;
        }

        Commands::List => {
            let config = cli.driver_config()?;
            config.validate()?;
            commands::list(&config).await?;
        }

        Commands::Pid { vmx } => {
            let config = cli.driver_config()?;
            commands::pid::pid(&config, vmx).await?;
        }

        Commands::VmxPath { name, disks, cdroms } => {
            commands::vmx_path::vmx_path(name, disks, cdroms)?;
        }

        Commands::Mv { src, dst } => {
            commands::mv::mv(src, dst).await?;
        }

        Commands::Capabilities { json } => {
            commands::caps::capabilities(*json)?;
        }

        Commands::Config => {
            let config = cli.driver_config()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
