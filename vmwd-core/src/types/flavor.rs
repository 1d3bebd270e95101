//! VMware product flavors.

use crate::error::VmwdError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The desktop virtualization product `vmrun` drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Player,
    #[serde(rename = "ws")]
    Workstation,
    Fusion,
}

impl Flavor {
    /// Host type passed to `vmrun -T`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Workstation => "ws",
            Self::Fusion => "fusion",
        }
    }

    /// Marker preceding the version number in the companion binary's `-v` output.
    pub fn version_pattern(self) -> &'static str {
        match self {
            Self::Player => "VMware Player ",
            Self::Workstation => "VMware Workstation ",
            Self::Fusion => "\nVMware Fusion Information:\nVMware Fusion ",
        }
    }

    /// Binary installed next to `vmrun` that reports the product version.
    pub fn companion_binary(self) -> &'static str {
        match self {
            Self::Player => "vmplayer",
            Self::Workstation => "vmware",
            Self::Fusion => "vmware-vmx",
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = VmwdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Self::Player),
            "ws" => Ok(Self::Workstation),
            "fusion" => Ok(Self::Fusion),
            other => Err(VmwdError::UnsupportedFlavor { flavor: other.to_string() }),
        }
    }
}
