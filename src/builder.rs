//! Builder for configuring and constructing a `VisualizerEngine`.

use std::sync::Arc;

use oscilla_analysis::live::{run_visual_worker, VisualAnalyzers, WorkerState};
use oscilla_analysis::spectrum::{build_estimator, SpectrumMode};
use oscilla_analysis::waveform::{WaveformCapture, DEFAULT_MIN_SPAN};
use oscilla_analysis::vu::VuMeter;
use oscilla_core::lockfree::AtomicFloat;
use oscilla_core::note::note_queue;
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::BlockAssembler;

use crate::engine::{AudioInput, Visuals};
use crate::{Result, VisualizerEngine};

/// Construction-time knobs for the pipeline. Everything else (sample
/// rate, block size, band count, frame cadence) is fixed at compile time.
///
/// # Example
///
/// ```no_run
/// use oscilla::{SpectrumMode, VisualizerEngine, WritePolicy};
///
/// let (engine, audio) = VisualizerEngine::builder()
///     .spectrum_mode(SpectrumMode::Fft)
///     .write_policy(WritePolicy::DropIfBusy)
///     .trigger_level(0.1)
///     .build()?;
/// # let _ = (engine, audio);
/// # Ok::<(), oscilla::Error>(())
/// ```
pub struct VisualizerEngineBuilder {
    spectrum_mode: SpectrumMode,
    write_policy: WritePolicy,
    trigger_level: f32,
    min_trigger_span: f32,
}

impl Default for VisualizerEngineBuilder {
    fn default() -> Self {
        Self {
            spectrum_mode: SpectrumMode::default(),
            write_policy: WritePolicy::default(),
            trigger_level: 0.0,
            min_trigger_span: DEFAULT_MIN_SPAN,
        }
    }
}

impl VisualizerEngineBuilder {
    /// Default: [`SpectrumMode::Filterbank`]
    pub fn spectrum_mode(mut self, mode: SpectrumMode) -> Self {
        self.spectrum_mode = mode;
        self
    }

    /// Write policy applied to every exchange in the pipeline.
    /// Default: [`WritePolicy::OverwriteLatest`]
    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Initial waveform trigger level, in [-1, 1]. Default: 0.0
    pub fn trigger_level(mut self, level: f32) -> Self {
        self.trigger_level = level;
        self
    }

    /// Fraction of a block that must remain after the trigger point for
    /// the block to be displayed, in (0, 1]. Default: 0.5
    pub fn min_trigger_span(mut self, span: f32) -> Self {
        self.min_trigger_span = span;
        self
    }

    /// Validate the configuration, spawn the visual worker, and hand back
    /// the engine plus the render-side input.
    pub fn build(self) -> Result<(VisualizerEngine, AudioInput)> {
        if !self.trigger_level.is_finite() || !(-1.0..=1.0).contains(&self.trigger_level) {
            return Err(oscilla_core::Error::InvalidTriggerLevel(self.trigger_level).into());
        }
        if !self.min_trigger_span.is_finite()
            || self.min_trigger_span <= 0.0
            || self.min_trigger_span > 1.0
        {
            return Err(oscilla_core::Error::InvalidTriggerSpan(self.min_trigger_span).into());
        }

        let tap = Arc::new(SnapshotExchange::new(self.write_policy));
        let assembler = BlockAssembler::new(Arc::clone(&tap));
        let (note_producer, note_consumer) = note_queue();
        let trigger_level = Arc::new(AtomicFloat::new(self.trigger_level));

        let analyzers = VisualAnalyzers {
            spectrum: build_estimator(self.spectrum_mode, self.write_policy),
            waveform: WaveformCapture::new(
                Arc::clone(&trigger_level),
                self.min_trigger_span,
                self.write_policy,
            ),
            vu: VuMeter::new(self.write_policy),
        };
        let visuals = Visuals::new(
            analyzers.spectrum.output(),
            analyzers.waveform.output(),
            analyzers.vu.output(),
            *analyzers.spectrum.frequencies(),
        );

        let worker_state = Arc::new(WorkerState::new());
        let state = Arc::clone(&worker_state);
        let worker_tap = Arc::clone(&tap);
        let worker = std::thread::Builder::new()
            .name("oscilla-visual".into())
            .spawn(move || run_visual_worker(worker_tap, analyzers, state))?;

        tracing::debug!(
            mode = ?self.spectrum_mode,
            policy = ?self.write_policy,
            trigger = self.trigger_level,
            "visualizer engine built"
        );

        Ok((
            VisualizerEngine::from_parts(
                worker_state,
                worker,
                note_producer,
                trigger_level,
                tap,
                visuals,
            ),
            AudioInput::new(assembler, note_consumer),
        ))
    }
}
