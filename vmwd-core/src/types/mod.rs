//! Core domain types for vmwd.

pub mod domain;
pub mod flavor;

// Re-exports
pub use domain::{
    DiskDef, DiskDevice, DomainDef, DomainObject, DomainPrivate, DomainState, GraphicsDef,
    GraphicsType, StateReason, StorageType,
};
pub use flavor::Flavor;
