//! Request handler module
//!
//! Responsible for request routing dispatch and static file resolution.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
pub use static_files::{ResolveError, ServedFile, StaticResolver};
