//! Green Plate client core.
//!
//! The pieces of the surplus-food app that are not screens: the persisted
//! session, the shared query cache, backend access and the helpers that
//! shape data for views.
//!
//! This library exposes modules for use in integration tests and the CLI.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod session;
pub mod traits;
pub mod view;

pub use context::AppContext;
pub use error::{GreenPlateError, GreenPlateResult};
