//! Trigger-synchronized waveform capture.
//!
//! Searches each block for a rising crossing of the trigger level, then
//! resamples the remainder of the block down to [`VISUAL_POINTS`] display
//! points starting at the crossing. Aligning successive frames on the
//! same waveform phase keeps a periodic signal visually stationary
//! instead of scrolling.

use std::sync::Arc;

use oscilla_core::frame::{AudioBlock, WaveformFrame};
use oscilla_core::lockfree::AtomicFloat;
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::{BLOCK_SIZE, VISUAL_POINTS};

/// Default fraction of the block that must remain after the trigger
/// point for the block to be displayed.
pub const DEFAULT_MIN_SPAN: f32 = 0.5;

pub struct WaveformCapture {
    /// Shared with the UI thread; read once per block.
    trigger_level: Arc<AtomicFloat>,
    min_span: f32,
    output: Arc<SnapshotExchange<WaveformFrame>>,
}

impl WaveformCapture {
    /// `trigger_level` may be adjusted concurrently while blocks are being
    /// processed. `min_span` is clamped to [0, 1].
    pub fn new(trigger_level: Arc<AtomicFloat>, min_span: f32, policy: WritePolicy) -> Self {
        Self {
            trigger_level,
            min_span: min_span.clamp(0.0, 1.0),
            output: Arc::new(SnapshotExchange::new(policy)),
        }
    }

    /// Index of the first rising crossing of `level`, or 0 when the block
    /// never crosses it. Falling back to 0 shows an unsynchronized view
    /// rather than freezing the display.
    fn find_trigger(samples: &[f32; BLOCK_SIZE], level: f32) -> usize {
        for i in 1..BLOCK_SIZE {
            if samples[i - 1] < level && samples[i] >= level {
                return i;
            }
        }
        0
    }

    /// Capture one block. Publishes a frame unless too few samples remain
    /// after the trigger point, in which case the previous frame stays up.
    pub fn process_block(&mut self, block: &AudioBlock) {
        let level = self.trigger_level.get();
        let trig = Self::find_trigger(&block.samples, level);

        let available = BLOCK_SIZE - trig;
        if (available as f32) < self.min_span * BLOCK_SIZE as f32 {
            return;
        }

        let Some(mut frame) = self.output.begin_write() else {
            return;
        };
        let step = available as f32 / VISUAL_POINTS as f32;
        for (j, point) in frame.points.iter_mut().enumerate() {
            let idx = (trig + (j as f32 * step) as usize).min(BLOCK_SIZE - 1);
            *point = block.samples[idx];
        }
    }

    /// Publish a flat-line frame.
    pub fn reset(&mut self) {
        self.output.write(|frame| *frame = WaveformFrame::default());
    }

    pub fn output(&self) -> Arc<SnapshotExchange<WaveformFrame>> {
        Arc::clone(&self.output)
    }
}
