//! Fixed-size payload types exchanged between the render, analysis, and
//! display threads.
//!
//! Every type here is plain data with a compile-time size, so a payload can
//! be copied into an exchange slot without touching the allocator. That is
//! a hard requirement on the render path, not a style preference.

use crate::config::{BLOCK_SIZE, SPECTRUM_BANDS, VISUAL_POINTS};

/// One analysis block of mono audio samples, produced once per render
/// cycle. Immutable after production; ownership moves by copy into the
/// audio tap exchange.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioBlock {
    /// Samples in the range [-1, 1].
    #[cfg_attr(feature = "serialization", serde(with = "serde_big_array::BigArray"))]
    pub samples: [f32; BLOCK_SIZE],
}

impl AudioBlock {
    /// A silent block.
    pub const fn silence() -> Self {
        Self {
            samples: [0.0; BLOCK_SIZE],
        }
    }
}

impl Default for AudioBlock {
    fn default() -> Self {
        Self::silence()
    }
}

/// One complete spectrum display update: per-band magnitudes in dB.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumFrame {
    #[cfg_attr(feature = "serialization", serde(with = "serde_big_array::BigArray"))]
    pub bands: [f32; SPECTRUM_BANDS],
}

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self {
            bands: [0.0; SPECTRUM_BANDS],
        }
    }
}

/// One complete waveform display update: a downsampled, trigger-aligned
/// view of the most recent audio block.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveformFrame {
    #[cfg_attr(feature = "serialization", serde(with = "serde_big_array::BigArray"))]
    pub points: [f32; VISUAL_POINTS],
}

impl Default for WaveformFrame {
    fn default() -> Self {
        Self {
            points: [0.0; VISUAL_POINTS],
        }
    }
}

/// Display floor for VU levels in dBFS. Levels are clamped here rather
/// than running off toward -infinity near silence.
pub const VU_DB_FLOOR: f32 = -50.0;

/// One complete VU display update.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct VuLevel {
    /// Smoothed RMS level in dBFS.
    pub rms_db: f32,
    /// Smoothed instantaneous peak level in dBFS.
    pub peak_db: f32,
    /// Held peak level in dBFS (hold-then-decay).
    pub peak_hold_db: f32,
}

impl VuLevel {
    /// Level with every field at the display floor.
    pub const fn silence() -> Self {
        Self {
            rms_db: VU_DB_FLOOR,
            peak_db: VU_DB_FLOOR,
            peak_hold_db: VU_DB_FLOOR,
        }
    }
}

impl Default for VuLevel {
    fn default() -> Self {
        Self::silence()
    }
}
