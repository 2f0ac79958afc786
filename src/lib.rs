//! # Oscilla - Real-time Audio Visualization Pipeline
//!
//! Lock-free plumbing between a real-time render thread and the visual
//! surfaces of a software music instrument.
//!
//! ## Architecture
//!
//! Oscilla is an umbrella crate that coordinates:
//! - **oscilla-core** - Lock-free primitives (snapshot exchange, bounded
//!   SPSC queue), fixed-size frame types, block assembly
//! - **oscilla-dsp** - Stateful DSP building blocks (biquads, envelope
//!   follower, frame smoother)
//! - **oscilla-analysis** - Spectrum estimators, waveform capture, VU
//!   metering, and the visual worker thread
//!
//! ## Quick Start
//!
//! ```no_run
//! use oscilla::{SpectrumMode, VisualizerEngine};
//!
//! let (engine, mut audio) = VisualizerEngine::builder()
//!     .spectrum_mode(SpectrumMode::Filterbank)
//!     .build()?;
//!
//! // Render thread, once per callback:
//! audio.drain_notes(|note| {
//!     // hand the note to the synthesizer
//!     let _ = note.pitch;
//! });
//! audio.push_samples(&[0.0; 128]);
//!
//! // UI thread, once per display frame:
//! let visuals = engine.visuals();
//! if let Some(spectrum) = visuals.spectrum() {
//!     let _ = spectrum.bands[0];
//! }
//! # Ok::<(), oscilla::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serialization` - serde derives on frame and config types

/// Re-export of oscilla-core for direct access
pub use oscilla_core as core;

/// Re-export of oscilla-dsp for direct access
pub use oscilla_dsp as dsp;

/// Re-export of oscilla-analysis for direct access
pub use oscilla_analysis as analysis;

// Core types
pub use oscilla_core::{
    note_queue,
    AtomicFlag,
    // Lock-free primitives
    AtomicFloat,
    AudioBlock,
    BlockAssembler,
    DropCounter,
    NoteConsumer,

    // Note queue
    NoteEvent,
    NoteProducer,
    ReadGuard,

    // Snapshot exchange
    SnapshotExchange,
    // Frames
    SpectrumFrame,
    VuLevel,
    WaveformFrame,
    WriteGuard,
    WritePolicy,
    BLOCK_SIZE,
    FRAME_INTERVAL_MS,
    NOTE_QUEUE_CAPACITY,

    // Compile-time configuration
    SAMPLE_RATE,
    SPECTRUM_BANDS,
    VISUAL_POINTS,
    VU_DB_FLOOR,
};

// Analysis types
pub use oscilla_analysis::{SpectrumEstimator, SpectrumMode};

mod builder;
mod engine;
mod error;

pub use builder::VisualizerEngineBuilder;
pub use engine::{AudioInput, Visuals, VisualizerEngine};
pub use error::{Error, Result};

/// Common imports for typical use.
pub mod prelude {
    pub use crate::{
        AudioInput, Error, NoteEvent, Result, SpectrumFrame, SpectrumMode, Visuals,
        VisualizerEngine, VisualizerEngineBuilder, VuLevel, WaveformFrame, WritePolicy,
    };
}
