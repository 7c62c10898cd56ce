//! Portfolio Backend Library
//!
//! User accounts, JWT authentication and self-introduction documents served
//! over a hypermedia JSON API. The binary in `main.rs` only wires these up.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod introductions;
pub mod middleware;
pub mod validation;

pub use api::{build_router, AppState};
pub use config::Config;
pub use db::Database;
