//! `vmrun` and companion binary invocations.

use crate::error::Result;
use crate::paths;
use crate::process;
use crate::types::Flavor;
use crate::version::{parse_version_banner, Version};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Handle on the VMware control tool for one product flavor.
#[derive(Debug, Clone)]
pub struct VmrunTool {
    path: PathBuf,
    flavor: Flavor,
    timeout: Duration,
}

impl VmrunTool {
    pub fn new(path: impl Into<PathBuf>, flavor: Flavor, timeout: Duration) -> Self {
        Self { path: path.into(), flavor, timeout }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// List the VMX files of running VMs (`vmrun -T <flavor> list`).
    ///
    /// `vmrun` prefixes the paths with a "Total running VMs: N" banner; only
    /// absolute paths are returned.
    #[instrument(skip(self), fields(flavor = %self.flavor))]
    pub async fn list(&self) -> Result<Vec<PathBuf>> {
        let output =
            process::run(&self.path, &["-T", self.flavor.as_str(), "list"], self.timeout).await?;

        let paths = parse_list_output(&output.stdout);
        debug!(count = paths.len(), "vmrun list returned running VMs");
        Ok(paths)
    }

    /// Companion binary that prints the product version.
    pub fn companion_binary(&self) -> PathBuf {
        paths::install_dir(&self.path).join(self.flavor.companion_binary())
    }

    /// Run `<companion> -v` and parse the product version from its output.
    ///
    /// Some products print the banner on stderr, so both streams are scanned.
    #[instrument(skip(self), fields(flavor = %self.flavor))]
    pub async fn version(&self) -> Result<Version> {
        let binary = self.companion_binary();
        let output = process::run(&binary, &["-v"], self.timeout).await?;

        let version = parse_version_banner(self.flavor, &output.combined())?;
        info!(%version, "Detected VMware {} version", self.flavor);
        Ok(version)
    }
}

/// Keep the absolute paths from `vmrun list` output, skipping banner and noise lines.
pub fn parse_list_output(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| {
            let path = Path::new(line);
            if path.is_absolute() {
                Some(path.to_path_buf())
            } else {
                if !line.trim().is_empty() {
                    debug!(line, "Skipping non-path vmrun output");
                }
                None
            }
        })
        .collect()
}
