//! VisualizerEngine that coordinates the render input, note queue, and
//! visual worker.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use oscilla_analysis::live::WorkerState;
use oscilla_core::frame::{AudioBlock, SpectrumFrame, VuLevel, WaveformFrame};
use oscilla_core::lockfree::AtomicFloat;
use oscilla_core::snapshot::SnapshotExchange;
use oscilla_core::{BlockAssembler, NoteConsumer, NoteEvent, NoteProducer, SPECTRUM_BANDS};

use crate::Result;

/// Render-thread handle: feeds audio into the pipeline and drains posted
/// note events.
///
/// Not a handle in the shared sense; this is the single owner of the
/// render side. It is handed out separately from [`VisualizerEngine`] so
/// the audio callback can own it outright while the UI thread keeps the
/// engine.
pub struct AudioInput {
    assembler: BlockAssembler,
    notes: NoteConsumer,
}

impl AudioInput {
    pub(crate) fn new(assembler: BlockAssembler, notes: NoteConsumer) -> Self {
        Self { assembler, notes }
    }

    /// Append one callback's worth of mono samples. Completed blocks are
    /// published to the visual worker; nothing blocks or allocates.
    pub fn push_samples(&mut self, samples: &[f32]) {
        self.assembler.push_samples(samples);
    }

    /// Drain note events posted since the last render cycle, applying
    /// each in posting order. Returns how many were drained.
    pub fn drain_notes(&mut self, mut apply: impl FnMut(NoteEvent)) -> usize {
        let mut drained = 0;
        while let Some(note) = self.notes.pop() {
            apply(note);
            drained += 1;
        }
        drained
    }

    /// Samples accumulated toward the next analysis block.
    pub fn pending_samples(&self) -> usize {
        self.assembler.pending()
    }
}

/// Display-thread handle: reads the latest published frame of each visual
/// surface. Cheap to clone; reads are wait-free copies.
#[derive(Clone)]
pub struct Visuals {
    spectrum: Arc<SnapshotExchange<SpectrumFrame>>,
    waveform: Arc<SnapshotExchange<WaveformFrame>>,
    vu: Arc<SnapshotExchange<VuLevel>>,
    band_frequencies: [f32; SPECTRUM_BANDS],
}

impl Visuals {
    pub(crate) fn new(
        spectrum: Arc<SnapshotExchange<SpectrumFrame>>,
        waveform: Arc<SnapshotExchange<WaveformFrame>>,
        vu: Arc<SnapshotExchange<VuLevel>>,
        band_frequencies: [f32; SPECTRUM_BANDS],
    ) -> Self {
        Self {
            spectrum,
            waveform,
            vu,
            band_frequencies,
        }
    }

    /// Latest spectrum frame, or `None` before the first publish.
    pub fn spectrum(&self) -> Option<SpectrumFrame> {
        self.spectrum.read_latest()
    }

    /// Latest waveform frame, or `None` before the first publish.
    pub fn waveform(&self) -> Option<WaveformFrame> {
        self.waveform.read_latest()
    }

    /// Latest VU level, or `None` before the first publish.
    pub fn vu(&self) -> Option<VuLevel> {
        self.vu.read_latest()
    }

    /// Center (or bin) frequency of each spectrum band, Hz.
    pub fn band_frequencies(&self) -> &[f32; SPECTRUM_BANDS] {
        &self.band_frequencies
    }
}

/// Main engine facade.
///
/// Built by [`VisualizerEngineBuilder`], which also hands out the
/// [`AudioInput`] for the render side. The engine owns the visual worker
/// thread and the posting half of the note queue.
///
/// # Example
///
/// ```no_run
/// use oscilla::VisualizerEngine;
///
/// let (engine, mut audio) = VisualizerEngine::builder().build()?;
///
/// // Render side, once per callback:
/// audio.drain_notes(|note| { let _ = note.pitch; });
/// audio.push_samples(&[0.0; 128]);
///
/// // UI side:
/// engine.post_note_on(60);
/// let visuals = engine.visuals();
/// if let Some(vu) = visuals.vu() {
///     println!("rms {} dBFS", vu.rms_db);
/// }
/// # Ok::<(), oscilla::Error>(())
/// ```
///
/// [`VisualizerEngineBuilder`]: crate::VisualizerEngineBuilder
pub struct VisualizerEngine {
    worker_state: Arc<WorkerState>,
    worker: Mutex<Option<JoinHandle<()>>>,

    /// Posting half of the note queue. The queue itself is SPSC, so
    /// concurrent UI-side posters serialize through this lock; the render
    /// side stays lock-free.
    notes: Mutex<NoteProducer>,

    trigger_level: Arc<AtomicFloat>,
    tap: Arc<SnapshotExchange<AudioBlock>>,
    visuals: Visuals,
}

impl VisualizerEngine {
    /// Create a new engine builder.
    pub fn builder() -> crate::VisualizerEngineBuilder {
        crate::VisualizerEngineBuilder::default()
    }

    /// Get a display-side handle for reading the latest visual frames.
    pub fn visuals(&self) -> Visuals {
        self.visuals.clone()
    }

    /// Post a note-on for the render side to pick up on its next cycle.
    ///
    /// Returns `false` if the note queue is full; the event is dropped
    /// rather than blocking.
    pub fn post_note_on(&self, pitch: u8) -> bool {
        match self.notes.lock() {
            Ok(mut producer) => producer.push(NoteEvent::new(pitch)),
            Err(_) => false,
        }
    }

    /// Set the waveform trigger level. Takes effect on the next block the
    /// worker processes.
    pub fn set_trigger_level(&self, level: f32) -> Result<()> {
        if !level.is_finite() || !(-1.0..=1.0).contains(&level) {
            return Err(oscilla_core::Error::InvalidTriggerLevel(level).into());
        }
        self.trigger_level.set(level);
        Ok(())
    }

    /// Current waveform trigger level.
    pub fn trigger_level(&self) -> f32 {
        self.trigger_level.get()
    }

    /// Ask the worker to clear all analyzer state and publish cleared
    /// frames. Asynchronous; applied before the worker's next block.
    pub fn reset(&self) {
        self.worker_state.request_reset();
    }

    /// Number of completed audio blocks the render side failed to publish
    /// because no exchange slot could be claimed.
    pub fn dropped_blocks(&self) -> u64 {
        self.tap.dropped_writes()
    }

    /// Stop the visual worker and wait for it to exit. Idempotent; also
    /// runs on drop.
    pub fn shutdown(&self) {
        self.worker_state.stop();
        let handle = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    /// Internal: create engine from builder.
    pub(crate) fn from_parts(
        worker_state: Arc<WorkerState>,
        worker: JoinHandle<()>,
        notes: NoteProducer,
        trigger_level: Arc<AtomicFloat>,
        tap: Arc<SnapshotExchange<AudioBlock>>,
        visuals: Visuals,
    ) -> Self {
        Self {
            worker_state,
            worker: Mutex::new(Some(worker)),
            notes: Mutex::new(notes),
            trigger_level,
            tap,
            visuals,
        }
    }
}

impl Drop for VisualizerEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
