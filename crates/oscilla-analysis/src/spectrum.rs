//! Spectrum estimation contract shared by the filterbank and transform
//! variants.
//!
//! Both estimators consume whole audio blocks, smooth per-band magnitudes
//! in the linear domain, convert to dB last, and publish complete
//! [`SpectrumFrame`]s through their own snapshot exchange. Smoothing
//! before the log conversion avoids the asymmetric visual jumps that
//! log-domain smoothing produces near silence.

use std::sync::Arc;

use oscilla_core::frame::{AudioBlock, SpectrumFrame};
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::SPECTRUM_BANDS;

use crate::fft::FftSpectrum;
use crate::filterbank::FilterbankSpectrum;

/// Low edge of the analyzed range in Hz.
pub const MIN_FREQ: f32 = 50.0;

/// High edge of the analyzed range in Hz.
pub const MAX_FREQ: f32 = 12_000.0;

/// Frame-smoother attack time for spectrum bands, ms.
pub const BAND_ATTACK_MS: f32 = 30.0;

/// Frame-smoother release time for spectrum bands, ms.
pub const BAND_RELEASE_MS: f32 = 120.0;

/// Additive floor inside the log so silence maps to a finite dB value.
pub const DB_EPSILON: f32 = 1e-6;

/// Linear magnitude to dB with the silence floor folded in.
#[inline]
pub fn db_from_linear(v: f32) -> f32 {
    20.0 * (v + DB_EPSILON).log10()
}

/// Which spectrum estimator to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum SpectrumMode {
    /// Bank of fourth-order bandpass filters, log-spaced centers.
    #[default]
    Filterbank,
    /// Hann window + FFT, bins mapped linearly up to Nyquist.
    Fft,
}

/// Common contract for the two spectrum estimators. The variant is picked
/// at construction via [`SpectrumMode`]; callers only ever see this trait.
pub trait SpectrumEstimator: Send {
    /// Analyze one block and publish a frame. Runs on the visual worker.
    fn process_block(&mut self, block: &AudioBlock);

    /// Clear all filter and smoother state and publish an all-zero frame
    /// so the display has no stale residue.
    fn reset(&mut self);

    /// Center (filterbank) or bin (transform) frequency of each band, Hz.
    fn frequencies(&self) -> &[f32; SPECTRUM_BANDS];

    /// The exchange this estimator publishes frames to.
    fn output(&self) -> Arc<SnapshotExchange<SpectrumFrame>>;
}

/// Construct the estimator for `mode`, publishing under `policy`.
pub fn build_estimator(mode: SpectrumMode, policy: WritePolicy) -> Box<dyn SpectrumEstimator> {
    match mode {
        SpectrumMode::Filterbank => Box::new(FilterbankSpectrum::new(policy)),
        SpectrumMode::Fft => Box::new(FftSpectrum::new(policy)),
    }
}
