//! Stateful DSP building blocks for the oscilla visualization pipeline.
//!
//! Everything here is per-instance mutable state with a fixed per-sample
//! or per-frame cost and an explicit `reset` that restores the state of a
//! freshly constructed instance without touching coefficients. No
//! allocation, no external dependencies.

pub mod biquad;
pub mod envelope;
pub mod smoother;

pub use biquad::{Biquad, BiquadCascade};
pub use envelope::EnvelopeFollower;
pub use smoother::FrameSmoother;
