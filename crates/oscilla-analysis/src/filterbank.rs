//! Filterbank spectrum estimator.
//!
//! One fourth-order bandpass cascade per band, centers spaced
//! geometrically between [`MIN_FREQ`] and [`MAX_FREQ`]. The Q factor is
//! derived from the implied bands-per-octave so adjacent bands keep a
//! roughly constant relative bandwidth. Per block: accumulate squared
//! output energy per band, take the RMS, smooth it in the linear domain,
//! convert to dB, publish.

use std::sync::Arc;

use oscilla_core::frame::{AudioBlock, SpectrumFrame};
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::{BLOCK_SIZE, FRAME_INTERVAL_MS, SAMPLE_RATE, SPECTRUM_BANDS};
use oscilla_dsp::{BiquadCascade, FrameSmoother};

use crate::spectrum::{
    db_from_linear, SpectrumEstimator, BAND_ATTACK_MS, BAND_RELEASE_MS, MAX_FREQ, MIN_FREQ,
};

pub struct FilterbankSpectrum {
    filters: [BiquadCascade; SPECTRUM_BANDS],
    smoothers: [FrameSmoother; SPECTRUM_BANDS],
    freqs: [f32; SPECTRUM_BANDS],
    output: Arc<SnapshotExchange<SpectrumFrame>>,
}

impl FilterbankSpectrum {
    pub fn new(policy: WritePolicy) -> Self {
        let octaves = (MAX_FREQ / MIN_FREQ).log2();
        let bands_per_octave = SPECTRUM_BANDS as f32 / octaves;
        let q = 1.0 / (2.0f32.powf(1.0 / bands_per_octave) - 1.0);

        let freqs: [f32; SPECTRUM_BANDS] = core::array::from_fn(|i| {
            let t = i as f32 / (SPECTRUM_BANDS - 1) as f32;
            MIN_FREQ * (MAX_FREQ / MIN_FREQ).powf(t)
        });

        Self {
            filters: core::array::from_fn(|i| {
                BiquadCascade::bandpass(SAMPLE_RATE as f32, freqs[i], q)
            }),
            smoothers: core::array::from_fn(|_| {
                FrameSmoother::new(FRAME_INTERVAL_MS, BAND_ATTACK_MS, BAND_RELEASE_MS)
            }),
            freqs,
            output: Arc::new(SnapshotExchange::new(policy)),
        }
    }

    /// Raw per-band RMS of one block, without smoothing or publishing.
    /// Filter state advances as usual.
    fn band_rms(&mut self, block: &AudioBlock) -> [f32; SPECTRUM_BANDS] {
        let mut energy = [0.0f32; SPECTRUM_BANDS];
        for &x in &block.samples {
            for (filter, acc) in self.filters.iter_mut().zip(energy.iter_mut()) {
                let y = filter.process(x);
                *acc += y * y;
            }
        }
        energy.map(|e| (e / BLOCK_SIZE as f32).sqrt())
    }
}

impl SpectrumEstimator for FilterbankSpectrum {
    fn process_block(&mut self, block: &AudioBlock) {
        let rms = self.band_rms(block);

        let Some(mut frame) = self.output.begin_write() else {
            return;
        };
        for b in 0..SPECTRUM_BANDS {
            let lin = self.smoothers[b].process(rms[b]);
            frame.bands[b] = db_from_linear(lin);
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
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
