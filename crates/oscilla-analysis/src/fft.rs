//! Transform spectrum estimator.
//!
//! Hann window over the block, forward FFT of length [`BLOCK_SIZE`]
//! (power of two by construction), then one bin per display band read
//! from the first half of the transform, magnitude normalized by N. The
//! plan, window, and work buffers are built once at construction; the
//! per-block path allocates nothing.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use oscilla_core::frame::{AudioBlock, SpectrumFrame};
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::{BLOCK_SIZE, FRAME_INTERVAL_MS, SAMPLE_RATE, SPECTRUM_BANDS};
use oscilla_dsp::FrameSmoother;

use crate::spectrum::{db_from_linear, SpectrumEstimator, BAND_ATTACK_MS, BAND_RELEASE_MS};

pub struct FftSpectrum {
    fft: Arc<dyn Fft<f32>>,
    window: [f32; BLOCK_SIZE],
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    band_bins: [usize; SPECTRUM_BANDS],
    smoothers: [FrameSmoother; SPECTRUM_BANDS],
    freqs: [f32; SPECTRUM_BANDS],
    output: Arc<SnapshotExchange<SpectrumFrame>>,
}

impl FftSpectrum {
    pub fn new(policy: WritePolicy) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(BLOCK_SIZE);
        let scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];

        // Bands are spread evenly across the first half of the transform,
        // i.e. up to Nyquist.
        let band_bins: [usize; SPECTRUM_BANDS] = core::array::from_fn(|i| {
            (i * (BLOCK_SIZE / 2) / SPECTRUM_BANDS).min(BLOCK_SIZE / 2 - 1)
        });

        Self {
            fft,
            window: core::array::from_fn(|i| {
                let phase = 2.0 * core::f32::consts::PI * i as f32 / (BLOCK_SIZE - 1) as f32;
                0.5 * (1.0 - phase.cos())
            }),
            buffer: vec![Complex::default(); BLOCK_SIZE],
            scratch,
            band_bins,
            smoothers: core::array::from_fn(|_| {
                FrameSmoother::new(FRAME_INTERVAL_MS, BAND_ATTACK_MS, BAND_RELEASE_MS)
            }),
            freqs: core::array::from_fn(|i| {
                band_bins[i] as f32 * SAMPLE_RATE as f32 / BLOCK_SIZE as f32
            }),
            output: Arc::new(SnapshotExchange::new(policy)),
        }
    }
}

impl SpectrumEstimator for FftSpectrum {
    fn process_block(&mut self, block: &AudioBlock) {
        for (slot, (&s, &w)) in self
            .buffer
            .iter_mut()
            .zip(block.samples.iter().zip(self.window.iter()))
        {
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let Some(mut frame) = self.output.begin_write() else {
            return;
        };
        for b in 0..SPECTRUM_BANDS {
            let mag = self.buffer[self.band_bins[b]].norm() / BLOCK_SIZE as f32;
            let lin = self.smoothers[b].process(mag);
            frame.bands[b] = db_from_linear(lin);
        }
    }

    fn reset(&mut self) {
        for smoother in &mut self.smoothers {
            smoother.reset(0.0);
        }
        self.output.write(|frame| *frame = SpectrumFrame::default());
    }

    fn frequencies(&self) -> &[f32; SPECTRUM_BANDS] {
        &self.freqs
    }

    fn output(&self) -> Arc<SnapshotExchange<SpectrumFrame>> {
        Arc::clone(&self.output)
    }
}
