//! Seam to the VMX configuration parser/formatter.
//!
//! The VMX grammar itself lives outside this crate; the driver only needs to
//! turn file contents into a [`DomainDef`] and back.

use crate::error::Result;
use crate::types::DomainDef;

/// Converts between VMX file contents and normalized domain definitions.
pub trait ConfigTranslator: Send + Sync {
    /// Parse the raw contents of a VMX file.
    fn parse(&self, vmx: &[u8]) -> Result<DomainDef>;

    /// Render a definition as VMX file contents.
    fn format(&self, def: &DomainDef) -> Result<Vec<u8>>;

    /// Translator name (for logging).
    fn name(&self) -> &str;
}
