//! Types shared across the Tally crates.
//!
//! Holds the pagination option and page types used by the query engine, the
//! access-token service backing the auth middleware, and the layered
//! application configuration.

pub mod config;
pub mod token;
pub mod types;

pub use config::AppConfig;
pub use token::{Claims, TokenConfig, TokenError, TokenService};
