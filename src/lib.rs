//! Local development tooling for a storefront widget.
//!
//! - [`handler`] and [`server`]: the dev HTTP static-file server
//! - [`tunnel`]: the public tunnel launcher
//! - [`scaffold`]: output directory pages

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod scaffold;
pub mod server;
pub mod tunnel;
