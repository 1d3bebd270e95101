//! VMX process id recovery from `vmware.log`.
//!
//! The first line VMware writes to a VM's log names the VMX process:
//!
//! ```text
//! 2020-05-26T10:12:36.384+02:00| vmx| I125: Log for VMware Workstation pid=4321 version=15.5.6 build=build-16341506 option=Release
//! ```

use crate::error::{Result, VmwdError};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, instrument};

/// Log file VMware keeps next to each VMX file.
pub const LOG_FILE_NAME: &str = "vmware.log";

const PID_MARKER: &str = " pid=";

/// Longest first line we look at, matching the line buffer VMware tooling uses.
const MAX_LINE_BYTES: u64 = 1023;

/// Path of the log file that belongs to `vmx_path`.
pub fn log_path(vmx_path: &Path, log_file_name: &str) -> PathBuf {
    vmx_path.parent().unwrap_or_else(|| Path::new("")).join(log_file_name)
}

/// Recover the VMX pid of the VM whose configuration lives at `vmx_path`,
/// using the log named `log_file_name` in the same directory.
pub async fn extract_pid(vmx_path: &Path, log_file_name: &str) -> Result<i32> {
    read_pid(&log_path(vmx_path, log_file_name)).await
}

/// Read the first line of the log at `log_path` and parse its pid.
///
/// Returns `LogNotFound` when the log can't be opened, which callers may treat
/// as "VM not started yet", and `MalformedLog` for anything wrong with its
/// contents.
#[instrument]
pub async fn read_pid(log_path: &Path) -> Result<i32> {
    let file = File::open(log_path)
        .await
        .map_err(|e| VmwdError::LogNotFound { path: log_path.to_path_buf(), source: e })?;

    let mut line = Vec::new();
    let read = BufReader::new(file)
        .take(MAX_LINE_BYTES)
        .read_until(b'\n', &mut line)
        .await
        .map_err(|e| malformed(log_path, format!("unable to read log file: {}", e)))?;

    if read == 0 {
        return Err(malformed(log_path, "unable to read log file: empty".to_string()));
    }

    let pid = parse_pid_line(&String::from_utf8_lossy(&line))
        .map_err(|reason| malformed(log_path, reason))?;

    debug!(pid, "Recovered VMX pid");
    Ok(pid)
}

/// Extract the integer between `" pid="` and the next space.
///
/// The value must be plain decimal digits, must be followed by a space, and
/// must fit in an `i32` (domain ids are 32-bit).
pub fn parse_pid_line(line: &str) -> std::result::Result<i32, String> {
    let (_, rest) =
        line.split_once(PID_MARKER).ok_or_else(|| "cannot find pid in log file".to_string())?;

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let (digits, tail) = rest.split_at(digits_end);

    if digits.is_empty() || !tail.starts_with(' ') {
        return Err(format!("cannot parse pid in log file: {:?}", truncate(rest)));
    }

    digits.parse::<i32>().map_err(|e| format!("cannot parse pid {:?} in log file: {}", digits, e))
}

fn truncate(s: &str) -> &str {
    let end = s.char_indices().nth(32).map(|(i, _)| i).unwrap_or(s.len());
    s[..end].trim_end()
}

fn malformed(path: &Path, reason: String) -> VmwdError {
    VmwdError::MalformedLog { path: path.to_path_buf(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WS_LINE: &str = "2020-05-26T10:12:36.384+02:00| vmx| I125: Log for VMware Workstation pid=4321 version=15.5.6 build=build-16341506 option=Release\n";

    #[test]
    fn test_parse_pid_line() {
        assert_eq!(parse_pid_line(WS_LINE), Ok(4321));
        assert_eq!(parse_pid_line("... pid=4321 ..."), Ok(4321));
    }

    #[test]
    fn test_parse_pid_without_marker() {
        assert!(parse_pid_line("Log for VMware Workstation version=15.5.6\n").is_err());
        // The marker needs its leading space.
        assert!(parse_pid_line("ppid=12 x").is_err());
    }

    #[test]
    fn test_parse_pid_requires_trailing_space() {
        assert!(parse_pid_line("Log pid=4321").is_err());
        assert!(parse_pid_line("Log pid=4321\n").is_err());
        assert!(parse_pid_line("Log pid=4321, x").is_err());
    }

    #[test]
    fn test_parse_pid_rejects_non_numeric() {
        assert!(parse_pid_line("Log pid= 4321 ").is_err());
        assert!(parse_pid_line("Log pid=abc ").is_err());
        assert!(parse_pid_line("Log pid=-1 ").is_err());
    }

    #[test]
    fn test_parse_pid_rejects_overflow() {
        assert_eq!(parse_pid_line("Log pid=2147483647 x"), Ok(i32::MAX));
        assert!(parse_pid_line("Log pid=2147483648 x").is_err());
    }

    #[test]
    fn test_log_path_is_sibling_of_vmx() {
        assert_eq!(
            log_path(Path::new("/vms/win10/win10.vmx"), LOG_FILE_NAME),
            PathBuf::from("/vms/win10/vmware.log")
        );
    }

    #[tokio::test]
    async fn test_extract_pid_from_log() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("vmware.log"), format!("{}second line pid=1 \n", WS_LINE))
            .unwrap();

        let pid = extract_pid(&dir.path().join("win10.vmx"), LOG_FILE_NAME).await.unwrap();
        assert_eq!(pid, 4321);
    }

    #[tokio::test]
    async fn test_extract_pid_from_custom_log_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("vmware-0.log"), WS_LINE).unwrap();

        let vmx = dir.path().join("win10.vmx");
        assert_eq!(extract_pid(&vmx, "vmware-0.log").await.unwrap(), 4321);

        let err = extract_pid(&vmx, LOG_FILE_NAME).await.unwrap_err();
        assert!(matches!(err, VmwdError::LogNotFound { .. }));
    }

    #[tokio::test]
    async fn test_only_first_line_is_read() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("vmware.log"), "no marker here\n pid=99 \n").unwrap();

        let err = extract_pid(&dir.path().join("vm.vmx"), LOG_FILE_NAME).await.unwrap_err();
        assert!(matches!(err, VmwdError::MalformedLog { .. }));
    }

    #[tokio::test]
    async fn test_missing_log() {
        let dir = TempDir::new().unwrap();
        let err = extract_pid(&dir.path().join("vm.vmx"), LOG_FILE_NAME).await.unwrap_err();
        assert!(matches!(err, VmwdError::LogNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_log() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("vmware.log"), "").unwrap();

        let err = extract_pid(&dir.path().join("vm.vmx"), LOG_FILE_NAME).await.unwrap_err();
        assert!(matches!(err, VmwdError::MalformedLog { .. }));
    }

    #[tokio::test]
    async fn test_marker_beyond_line_limit_is_ignored() {
        let dir = TempDir::new().unwrap();
        let line = format!("{} pid=77 \n", "x".repeat(1100));
        std::fs::write(dir.path().join("vmware.log"), line).unwrap();

        let err = extract_pid(&dir.path().join("vm.vmx"), LOG_FILE_NAME).await.unwrap_err();
        assert!(matches!(err, VmwdError::MalformedLog { .. }));
    }
}
