//! Product version detection from `-v` banners.

use crate::error::{Result, VmwdError};
use crate::types::Flavor;
use serde::{Deserialize, Serialize};

/// Dotted `major.minor.micro` product version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self { major, minor, micro }
    }

    /// Packed `major * 1_000_000 + minor * 1_000 + micro` form used by the
    /// management daemon's version fields.
    pub fn as_number(&self) -> u64 {
        u64::from(self.major) * 1_000_000 + u64::from(self.minor) * 1_000 + u64::from(self.micro)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Find the flavor's marker in `text` and parse the version that follows it.
///
/// Parsing stops at the first character that is neither a digit nor a dot.
/// Up to three components are read, missing ones are zero and any further
/// ones are ignored. Minor and
/// micro must stay below 1000 so the packed form is unambiguous.
pub fn parse_version_banner(flavor: Flavor, text: &str) -> Result<Version> {
    let pattern = flavor.version_pattern();

    let start = text
        .find(pattern)
        .ok_or_else(|| VmwdError::PatternNotFound { pattern: pattern.to_string() })?;
    let rest = &text[start + pattern.len()..];

    let end = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());

    parse_dotted(&rest[..end])
        .map_err(|reason| VmwdError::VersionParse { pattern: pattern.to_string(), reason })
}

fn parse_dotted(s: &str) -> std::result::Result<Version, String> {
    if s.is_empty() {
        return Err("no version number follows the pattern".to_string());
    }

    let mut parts = [0u32; 3];

    // Anything after the micro component is ignored.
    for (part, component) in parts.iter_mut().zip(s.split('.')) {
        if component.is_empty() {
            return Err(format!("empty component in {:?}", s));
        }
        *part = component
            .parse()
            .map_err(|e| format!("invalid component {:?} in {:?}: {}", component, s, e))?;
    }

    let [major, minor, micro] = parts;
    if minor > 999 || micro > 999 || u64::from(major) > u64::from(u32::MAX) / 1_000_000 {
        return Err(format!("version {:?} out of range", s));
    }

    Ok(Version::new(major, minor, micro))
}
