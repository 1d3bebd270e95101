//! Small file helpers used when defining and renaming domains.

use crate::error::{Result, VmwdError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Build `{dir}/{name}.{ext}`.
pub fn make_path(dir: &str, name: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!("{}/{}.{}", dir, name, ext))
}

/// Move `src` to `dst`.
///
/// Moving a file onto itself succeeds without touching the filesystem. A
/// rename that fails (for example across filesystems) falls back to copy and
/// remove.
#[instrument]
pub async fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if src == dst {
        return Ok(());
    }

    if !fs::try_exists(src).await.unwrap_or(false) {
        return Err(VmwdError::FileNotFound { path: src.to_path_buf() });
    }

    if let Err(rename_err) = fs::rename(src, dst).await {
        debug!(error = %rename_err, "Rename failed, copying instead");
        let dst_existed = fs::try_exists(dst).await.unwrap_or(true);
        if let Err(copy_err) = fs::copy(src, dst).await {
            // Don't leave a partial copy behind.
            if !dst_existed {
                let _ = fs::remove_file(dst).await;
            }
            return Err(VmwdError::Io { path: dst.to_path_buf(), source: copy_err });
        }
        fs::remove_file(src)
            .await
            .map_err(|e| VmwdError::Io { path: src.to_path_buf(), source: e })?;
    }

    Ok(())
}
