//! # Daybell Core
//! Core traits, types, configuration and errors shared by every Daybell crate.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::DaybellConfig;
pub use error::{DaybellError, Result};
