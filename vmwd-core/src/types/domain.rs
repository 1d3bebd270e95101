//! Normalized domain types.
//!
//! These mirror the management daemon's domain-definition model, reduced to the
//! fields the VMware driver reads or fills in.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Normalized domain definition, as produced by a [`ConfigTranslator`].
///
/// [`ConfigTranslator`]: crate::translator::ConfigTranslator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDef {
    /// Domain name (VMX `displayName`)
    pub name: String,

    /// Disks, in declaration order
    #[serde(default)]
    pub disks: Vec<DiskDef>,

    /// Graphics devices, in declaration order
    #[serde(default)]
    pub graphics: Vec<GraphicsDef>,

    /// Runtime id; the VMX process pid while the domain is running
    pub id: Option<i32>,
}

impl DomainDef {
    /// Create a definition with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

/// Disk device reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDef {
    /// Device kind
    pub device: DiskDevice,

    /// Backing storage kind
    pub source_type: StorageType,

    /// Backing path, if any
    pub source: Option<String>,
}

impl DiskDef {
    /// A file-backed hard disk.
    pub fn file(source: impl Into<String>) -> Self {
        Self { device: DiskDevice::Disk, source_type: StorageType::File, source: Some(source.into()) }
    }

    /// A file-backed CD-ROM.
    pub fn cdrom(source: impl Into<String>) -> Self {
        Self {
            device: DiskDevice::Cdrom,
            source_type: StorageType::File,
            source: Some(source.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskDevice {
    Disk,
    Cdrom,
    Floppy,
    Lun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    File,
    Block,
    Dir,
    Network,
    Volume,
}

/// Graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsDef {
    #[serde(rename = "type")]
    pub kind: GraphicsType,
}

impl GraphicsDef {
    pub fn new(kind: GraphicsType) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsType {
    Sdl,
    Vnc,
    Rdp,
    Desktop,
    Spice,
}

/// Domain runtime state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainState {
    #[default]
    NoState,
    Running,
    Paused,
    Shutdown,
    Shutoff,
    Crashed,
}

impl std::fmt::Display for DomainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoState => write!(f, "nostate"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Shutdown => write!(f, "shutdown"),
            Self::Shutoff => write!(f, "shutoff"),
            Self::Crashed => write!(f, "crashed"),
        }
    }
}

/// Why a domain is in its current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateReason {
    #[default]
    Unknown,
    Booted,
    Migrated,
    Restored,
    Unpaused,
}

/// Driver-private data attached to each registered domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPrivate {
    /// Path of the domain's VMX file
    pub vmx_path: Option<PathBuf>,

    /// Whether the domain is run with a GUI window
    pub gui: bool,
}

impl DomainPrivate {
    /// A domain runs with a GUI when it declares no graphics at all, or any
    /// desktop graphics device.
    pub fn gui_from_graphics(graphics: &[GraphicsDef]) -> bool {
        graphics.is_empty() || graphics.iter().any(|g| g.kind == GraphicsType::Desktop)
    }
}

/// A domain as held by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainObject {
    pub def: DomainDef,
    pub private: DomainPrivate,
    pub state: DomainState,
    pub reason: StateReason,
    pub persistent: bool,
}

impl DomainObject {
    /// Wrap a freshly parsed definition with empty private data.
    pub fn new(def: DomainDef) -> Self {
        Self {
            def,
            private: DomainPrivate::default(),
            state: DomainState::NoState,
            reason: StateReason::Unknown,
            persistent: false,
        }
    }

    pub fn set_state(&mut self, state: DomainState, reason: StateReason) {
        self.state = state;
        self.reason = reason;
    }

    pub fn is_active(&self) -> bool {
        self.def.id.is_some()
    }
}
