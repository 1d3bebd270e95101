//! vmwd core library
//!
//! Driver core for VMware Player, Workstation and Fusion: discovers running
//! VMs through `vmrun`, resolves their VMX files and VMX process ids, and keeps
//! an in-memory domain registry in sync.

pub mod capabilities;
pub mod config;
pub mod driver;
pub mod error;
pub mod fileops;
pub mod observability;
pub mod paths;
pub mod pid;
pub mod process;
pub mod reconcile;
pub mod registry;
pub mod translator;
pub mod types;
pub mod version;
pub mod vmrun;
pub mod vmx_path;

// Re-export commonly used items
pub use capabilities::Capabilities;
pub use config::DriverConfig;
pub use driver::Driver;
pub use error::{Result, VmwdError};
pub use observability::init as init_observability;
pub use reconcile::ReconcileReport;
pub use registry::{DomainHandle, DomainRegistry};
pub use translator::ConfigTranslator;
pub use types::{
    DiskDef, DiskDevice, DomainDef, DomainObject, DomainPrivate, DomainState, Flavor, GraphicsDef,
    GraphicsType, StateReason, StorageType,
};
pub use version::Version;
pub use vmrun::VmrunTool;
