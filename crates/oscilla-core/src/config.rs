//! Compile-time pipeline configuration.
//!
//! The pipeline runs at fixed sizes: changing sample rate or block size at
//! runtime is out of scope, and several components rely on these values
//! being constants (bitmask index wraparound, stack-allocated frames,
//! divisibility between block and display sizes).

/// Audio sample rate in Hz.
pub const SAMPLE_RATE: u32 = 32_000;

/// Samples per analysis block. Also the FFT length, so it must be a
/// power of two.
pub const BLOCK_SIZE: usize = 1024;

/// Number of spectrum display bands.
pub const SPECTRUM_BANDS: usize = 128;

/// Number of waveform display points.
pub const VISUAL_POINTS: usize = 256;

/// Interval between visual frames in milliseconds. The visual worker polls
/// at this period and all frame-domain smoothers derive their coefficients
/// from it.
pub const FRAME_INTERVAL_MS: f32 = 20.0;

const _: () = assert!(BLOCK_SIZE.is_power_of_two());
const _: () = assert!(BLOCK_SIZE % VISUAL_POINTS == 0);
const _: () = assert!(SPECTRUM_BANDS >= 2);
