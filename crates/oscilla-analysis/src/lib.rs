//! Visual analysis for the oscilla pipeline.
//!
//! Everything here consumes whole [`AudioBlock`]s and publishes fixed-size
//! display frames through snapshot exchanges:
//!
//! - **Spectrum**: filterbank or FFT estimator behind one trait
//! - **Waveform**: trigger-synchronized capture of display points
//! - **VU**: RMS and peak metering with peak hold
//! - **Worker**: the background thread that drives all of the above
//!
//! [`AudioBlock`]: oscilla_core::frame::AudioBlock

pub mod fft;
pub mod filterbank;
pub mod live;
pub mod spectrum;
pub mod vu;
pub mod waveform;

pub use fft::FftSpectrum;
pub use filterbank::FilterbankSpectrum;
pub use live::{run_visual_worker, VisualAnalyzers, WorkerState};
pub use spectrum::{build_estimator, SpectrumEstimator, SpectrumMode};
pub use vu::VuMeter;
pub use waveform::WaveformCapture;
