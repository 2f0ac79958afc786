//! Visual worker thread.
//!
//! Runs all visual analysis on a background thread, polling the audio tap
//! exchange on a fixed cadence. Results are published through each
//! analyzer's own snapshot exchange for wait-free reads from the UI
//! thread.

use std::sync::Arc;
use std::time::Duration;

use oscilla_core::frame::AudioBlock;
use oscilla_core::lockfree::AtomicFlag;
use oscilla_core::snapshot::SnapshotExchange;
use oscilla_core::FRAME_INTERVAL_MS;

use crate::spectrum::SpectrumEstimator;
use crate::vu::VuMeter;
use crate::waveform::WaveformCapture;

/// Shared state between the visual worker and the engine handle.
pub struct WorkerState {
    /// Cleared to signal the worker to exit after its current iteration.
    running: AtomicFlag,
    /// Set to request that all analyzers clear their state before the
    /// next block is processed.
    reset_requested: AtomicFlag,
}

impl WorkerState {
    pub fn new() -> Self {
        Self {
            running: AtomicFlag::new(true),
            reset_requested: AtomicFlag::new(false),
        }
    }

    /// Signal the worker to stop.
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Ask the worker to reset all analyzers on its next iteration.
    pub fn request_reset(&self) {
        self.reset_requested.set(true);
    }
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::new()
    }
}

/// The full analysis chain the worker steps each frame.
pub struct VisualAnalyzers {
    pub spectrum: Box<dyn SpectrumEstimator>,
    pub waveform: WaveformCapture,
    pub vu: VuMeter,
}

impl VisualAnalyzers {
    fn process_block(&mut self, block: &AudioBlock) {
        self.spectrum.process_block(block);
        self.waveform.process_block(block);
        self.vu.process_block(block);
    }

    fn reset(&mut self) {
        self.spectrum.reset();
        self.waveform.reset();
        self.vu.reset();
    }
}

/// Run the visual worker loop.
///
/// Each iteration takes the latest published audio block, steps every
/// analyzer with it, then sleeps for one frame interval. When the render
/// side stalls the same block is re-read and the smoothers simply keep
/// converging on it, which is the intended idle behavior.
///
/// This function blocks until `state.stop()` is called.
pub fn run_visual_worker(
    tap: Arc<SnapshotExchange<AudioBlock>>,
    mut analyzers: VisualAnalyzers,
    state: Arc<WorkerState>,
) {
    tracing::info!("visual worker started");

    let interval = Duration::from_micros((FRAME_INTERVAL_MS * 1000.0) as u64);

    while state.is_running() {
        if state.reset_requested.swap(false) {
            tracing::debug!("resetting visual analyzers");
            analyzers.reset();
        }

        if let Some(block) = tap.read_latest() {
            analyzers.process_block(&block);
        }

        std::thread::sleep(interval);
    }

    tracing::info!("visual worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{build_estimator, SpectrumMode};
    use core::f32::consts::PI;
    use oscilla_core::frame::VU_DB_FLOOR;
    use oscilla_core::lockfree::AtomicFloat;
    use oscilla_core::snapshot::WritePolicy;
    use oscilla_core::{BLOCK_SIZE, SAMPLE_RATE};

    fn analyzers() -> VisualAnalyzers {
        VisualAnalyzers {
            spectrum: build_estimator(SpectrumMode::Filterbank, WritePolicy::OverwriteLatest),
            waveform: WaveformCapture::new(
                Arc::new(AtomicFloat::new(0.0)),
                0.5,
                WritePolicy::OverwriteLatest,
            ),
            vu: VuMeter::new(WritePolicy::OverwriteLatest),
        }
    }

    fn sine_block(freq: f32) -> AudioBlock {
        let mut block = AudioBlock::silence();
        for (i, s) in block.samples.iter_mut().enumerate() {
            *s = (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin();
        }
        block
    }

    #[test]
    fn test_worker_stops_on_request() {
        let tap = Arc::new(SnapshotExchange::new(WritePolicy::OverwriteLatest));
        let state = Arc::new(WorkerState::new());

        let worker_tap = Arc::clone(&tap);
        let worker_state = Arc::clone(&state);
        let analyzers = analyzers();
        let handle = std::thread::spawn(move || {
            run_visual_worker(worker_tap, analyzers, worker_state);
        });

        tap.write(|block: &mut AudioBlock| *block = sine_block(440.0));
        std::thread::sleep(Duration::from_millis(100));
        state.stop();
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_publishes_all_three_surfaces() {
        let tap = Arc::new(SnapshotExchange::new(WritePolicy::OverwriteLatest));
        let state = Arc::new(WorkerState::new());

        let analyzers = analyzers();
        let spectrum_out = analyzers.spectrum.output();
        let waveform_out = analyzers.waveform.output();
        let vu_out = analyzers.vu.output();

        let worker_tap = Arc::clone(&tap);
        let worker_state = Arc::clone(&state);
        let handle = std::thread::spawn(move || {
            run_visual_worker(worker_tap, analyzers, worker_state);
        });

        tap.write(|block: &mut AudioBlock| *block = sine_block(440.0));
        std::thread::sleep(Duration::from_millis(200));
        state.stop();
        handle.join().unwrap();

        let spectrum = spectrum_out.read_latest().expect("spectrum published");
        assert!(spectrum.bands.iter().any(|&b| b > -120.0 + 1.0));

        let waveform = waveform_out.read_latest().expect("waveform published");
        assert!(waveform.points.iter().any(|&p| p != 0.0));

        let vu = vu_out.read_latest().expect("vu published");
        assert!(vu.rms_db > VU_DB_FLOOR);
    }

    #[test]
    fn test_reset_request_clears_published_frames() {
        let tap = Arc::new(SnapshotExchange::new(WritePolicy::OverwriteLatest));
        let state = Arc::new(WorkerState::new());

        let analyzers = analyzers();
        let vu_out = analyzers.vu.output();

        let worker_tap = Arc::clone(&tap);
        let worker_state = Arc::clone(&state);
        let handle = std::thread::spawn(move || {
            run_visual_worker(worker_tap, analyzers, worker_state);
        });

        tap.write(|block: &mut AudioBlock| *block = sine_block(440.0));
        std::thread::sleep(Duration::from_millis(100));

        // Replace the signal with silence, then reset. The meters converge
        // back toward the floor instead of holding the old peak.
        tap.write(|block: &mut AudioBlock| *block = AudioBlock::silence());
        state.request_reset();
        std::thread::sleep(Duration::from_millis(100));
        state.stop();
        handle.join().unwrap();

        let vu = vu_out.read_latest().unwrap();
        assert!(vu.peak_hold_db < -20.0, "hold at {} dB", vu.peak_hold_db);
    }

    #[test]
    fn test_worker_idles_without_published_block() {
        let tap: Arc<SnapshotExchange<AudioBlock>> =
            Arc::new(SnapshotExchange::new(WritePolicy::OverwriteLatest));
        let state = Arc::new(WorkerState::new());

        let analyzers = analyzers();
        let vu_out = analyzers.vu.output();

        let worker_tap = Arc::clone(&tap);
        let worker_state = Arc::clone(&state);
        let handle = std::thread::spawn(move || {
            run_visual_worker(worker_tap, analyzers, worker_state);
        });

        std::thread::sleep(Duration::from_millis(60));
        state.stop();
        handle.join().unwrap();

        // Nothing was ever published on the tap, so nothing came out.
        assert!(vu_out.read_latest().is_none());
    }

    #[test]
    fn test_block_size_is_one_frame_of_audio() {
        // 1024 samples at 32 kHz is 32 ms, longer than the 20 ms frame
        // interval, so re-reading the latest block between render cycles
        // is the common case, not a corner.
        let block_ms = BLOCK_SIZE as f32 / SAMPLE_RATE as f32 * 1000.0;
        assert!(block_ms > FRAME_INTERVAL_MS);
    }
}
