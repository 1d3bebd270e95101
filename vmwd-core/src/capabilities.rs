//! Guest capabilities of the VMware host.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Guest OS type. VMware desktop products only run fully virtualized guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Hvm,
}

/// One supported guest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCaps {
    pub os_type: OsType,
    pub arch: String,
    pub domain_type: String,
}

impl GuestCaps {
    fn hvm(arch: &str) -> Self {
        Self { os_type: OsType::Hvm, arch: arch.to_string(), domain_type: "vmware".to_string() }
    }
}

/// What guests this host can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub host_arch: String,
    pub guests: Vec<GuestCaps>,
}

impl Capabilities {
    /// Probe the running host.
    ///
    /// Missing CPU information only narrows the result to i686 guests.
    pub fn probe() -> Self {
        let flags = match std::fs::read_to_string(CPUINFO_PATH) {
            Ok(cpuinfo) => cpu_flags(&cpuinfo),
            Err(e) => {
                warn!("Failed to read {}: {}", CPUINFO_PATH, e);
                HashSet::new()
            }
        };
        Self::for_host(host_arch(), &flags)
    }

    /// Build capabilities for a host of `arch` whose CPU reports `flags`.
    ///
    /// i686 guests are always supported. x86_64 guests need an x86_64 host,
    /// or a 64-bit capable CPU (`lm`) with hardware virtualization
    /// (`vmx` or `svm`).
    pub fn for_host(arch: &str, flags: &HashSet<String>) -> Self {
        let mut guests = vec![GuestCaps::hvm("i686")];

        let has = |f: &str| flags.contains(f);
        if arch == "x86_64" || (has("lm") && (has("vmx") || has("svm"))) {
            guests.push(GuestCaps::hvm("x86_64"));
        }

        debug!(host_arch = arch, guests = guests.len(), "Built capabilities");
        Self { host_arch: arch.to_string(), guests }
    }

    /// Whether guests of `arch` can run on this host.
    pub fn supports(&self, arch: &str) -> bool {
        self.guests.iter().any(|g| g.arch == arch)
    }
}

/// Host architecture, in the `i686`/`x86_64` naming guests use.
fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "i686",
        other => other,
    }
}

/// Collect the `flags` of the first processor in `/proc/cpuinfo` contents.
fn cpu_flags(cpuinfo: &str) -> HashSet<String> {
    cpuinfo
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "flags").then_some(value)
        })
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(list: &[&str]) -> HashSet<String> {
        list.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_x86_64_host() {
        let caps = Capabilities::for_host("x86_64", &HashSet::new());
        assert!(caps.supports("i686"));
        assert!(caps.supports("x86_64"));
    }

    #[test]
    fn test_i686_host_without_virtualization() {
        let caps = Capabilities::for_host("i686", &flags(&["lm", "fpu"]));
        assert!(caps.supports("i686"));
        assert!(!caps.supports("x86_64"));
    }

    #[test]
    fn test_i686_host_with_64bit_vt_cpu() {
        assert!(Capabilities::for_host("i686", &flags(&["lm", "vmx"])).supports("x86_64"));
        assert!(Capabilities::for_host("i686", &flags(&["lm", "svm"])).supports("x86_64"));
    }

    #[test]
    fn test_cpu_flags_parsing() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\nflags\t\t: fpu vme lm vmx\n\nprocessor\t: 1\nflags\t\t: fpu\n";
        assert_eq!(cpu_flags(cpuinfo), flags(&["fpu", "vme", "lm", "vmx"]));
        assert!(cpu_flags("processor\t: 0\n").is_empty());
    }

    #[test]
    fn test_guests_are_vmware_hvm() {
        let caps = Capabilities::for_host("x86_64", &HashSet::new());
        assert!(caps.guests.iter().all(|g| g.os_type == OsType::Hvm && g.domain_type == "vmware"));
    }
}
