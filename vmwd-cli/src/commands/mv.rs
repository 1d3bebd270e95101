//! `vmwd mv` command

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use vmwd_core::fileops::move_file;

/// Move a VM file, e.g. a VMX file after a rename.
pub async fn mv(src: &Path, dst: &Path) -> Result<()> {
    move_file(src, dst).await?;
    println!("{} {} -> {}", "✓".green().bold(), src.display(), dst.display());
    Ok(())
}
