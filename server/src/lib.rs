//! JSON API over a [`salreg_linear::RegressionEngine`].
//!
//! The engine is fitted once at startup and then shared read-only between
//! connection tasks.

pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod schema;
pub mod server;

pub use config::Config;
pub use error::{Result, ServerError};
