//! Error types for oscilla-core.
//!
//! Failure in the steady-state path is modeled as dropped work (a `None`
//! write claim, a `false` push), never as an error. These types cover
//! construction and configuration only.

use thiserror::Error;

/// Error type for oscilla-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid trigger level: {0}. Must be finite and within [-1.0, 1.0]")]
    InvalidTriggerLevel(f32),

    #[error("Invalid minimum trigger span: {0}. Must be within (0.0, 1.0]")]
    InvalidTriggerSpan(f32),

    #[error("Invalid time constant: {name} = {value_ms} ms. Must be finite")]
    InvalidTimeConstant { name: &'static str, value_ms: f32 },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
