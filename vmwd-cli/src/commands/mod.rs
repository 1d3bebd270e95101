//! CLI command implementations

pub mod caps;
pub mod list;
pub mod mv;
pub mod pid;
pub mod version;
pub mod vmx_path;

pub use list::list;
pub use version::version;
