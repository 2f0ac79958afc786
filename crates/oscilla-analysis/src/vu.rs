//! VU metering with peak hold.
//!
//! Per block: RMS and rectified peak, smoothed in the linear domain,
//! converted to dBFS and clamped at [`VU_DB_FLOOR`]. The hold indicator
//! latches onto the smoothed peak, stays put for [`HOLD_MS`], then falls
//! a fixed number of dB per update. The decay floor is the block's raw
//! peak, not the smoothed one, so the hold never lags above a signal
//! that has genuinely dropped.

use std::sync::Arc;

use oscilla_core::error::{Error, Result};
use oscilla_core::frame::{AudioBlock, VuLevel, VU_DB_FLOOR};
use oscilla_core::snapshot::{SnapshotExchange, WritePolicy};
use oscilla_core::{BLOCK_SIZE, FRAME_INTERVAL_MS};
use oscilla_dsp::FrameSmoother;

use crate::spectrum::db_from_linear;

/// How long the hold indicator stays at a latched peak, ms.
pub const HOLD_MS: f32 = 600.0;

/// Fall rate of the hold indicator once the hold time expires, dB per
/// update.
pub const FALL_DB: f32 = 1.2;

/// Default RMS smoothing attack, ms.
pub const RMS_ATTACK_MS: f32 = 30.0;

/// Default RMS smoothing release, ms.
pub const RMS_RELEASE_MS: f32 = 300.0;

/// Default peak smoothing attack, ms.
pub const PEAK_ATTACK_MS: f32 = 5.0;

/// Default peak smoothing release, ms.
pub const PEAK_RELEASE_MS: f32 = 150.0;

pub struct VuMeter {
    rms_smoother: FrameSmoother,
    peak_smoother: FrameSmoother,
    hold_db: f32,
    hold_elapsed_ms: f32,
    output: Arc<SnapshotExchange<VuLevel>>,
}

impl VuMeter {
    pub fn new(policy: WritePolicy) -> Self {
        Self::build(
            policy,
            RMS_ATTACK_MS,
            RMS_RELEASE_MS,
            PEAK_ATTACK_MS,
            PEAK_RELEASE_MS,
        )
    }

    /// Construct with custom smoothing time constants. Non-positive values
    /// degenerate to instant tracking; non-finite values are rejected.
    pub fn with_time_constants(
        policy: WritePolicy,
        rms_attack_ms: f32,
        rms_release_ms: f32,
        peak_attack_ms: f32,
        peak_release_ms: f32,
    ) -> Result<Self> {
        let constants = [
            ("rms_attack", rms_attack_ms),
            ("rms_release", rms_release_ms),
            ("peak_attack", peak_attack_ms),
            ("peak_release", peak_release_ms),
        ];
        for (name, value_ms) in constants {
            if !value_ms.is_finite() {
                return Err(Error::InvalidTimeConstant { name, value_ms });
            }
        }
        Ok(Self::build(
            policy,
            rms_attack_ms,
            rms_release_ms,
            peak_attack_ms,
            peak_release_ms,
        ))
    }

    fn build(
        policy: WritePolicy,
        rms_attack_ms: f32,
        rms_release_ms: f32,
        peak_attack_ms: f32,
        peak_release_ms: f32,
    ) -> Self {
        Self {
            rms_smoother: FrameSmoother::new(FRAME_INTERVAL_MS, rms_attack_ms, rms_release_ms),
            peak_smoother: FrameSmoother::new(FRAME_INTERVAL_MS, peak_attack_ms, peak_release_ms),
            hold_db: VU_DB_FLOOR,
            hold_elapsed_ms: 0.0,
            output: Arc::new(SnapshotExchange::new(policy)),
        }
    }

    /// Meter one block and publish the resulting level.
    pub fn process_block(&mut self, block: &AudioBlock) {
        let mut sum_sq = 0.0f32;
        let mut peak = 0.0f32;
        for &s in &block.samples {
            sum_sq += s * s;
            peak = peak.max(s.abs());
        }
        let rms = (sum_sq / BLOCK_SIZE as f32).sqrt();

        let raw_peak_db = floored_db(peak);
        let rms_db = floored_db(self.rms_smoother.process(rms));
        let peak_db = floored_db(self.peak_smoother.process(peak));

        if peak_db >= self.hold_db {
            self.hold_db = peak_db;
            self.hold_elapsed_ms = 0.0;
        } else {
            self.hold_elapsed_ms += FRAME_INTERVAL_MS;
            if self.hold_elapsed_ms > HOLD_MS {
                // Decay stops at the unsmoothed block peak: the smoothed
                // peak's release tail can sit above the true live level.
                self.hold_db = (self.hold_db - FALL_DB).max(raw_peak_db);
            }
        }

        self.output.write(|level| {
            *level = VuLevel {
                rms_db,
                peak_db,
                peak_hold_db: self.hold_db,
            }
        });
    }

    /// Drop all meter state to the display floor and publish silence.
    pub fn reset(&mut self) {
        self.rms_smoother.reset(0.0);
        self.peak_smoother.reset(0.0);
        self.hold_db = VU_DB_FLOOR;
        self.hold_elapsed_ms = 0.0;
        self.output.write(|level| *level = VuLevel::silence());
    }

    pub fn output(&self) -> Arc<SnapshotExchange<VuLevel>> {
        Arc::clone(&self.output)
    }
}

#[inline]
fn floored_db(v: f32) -> f32 {
    db_from_linear(v).max(VU_DB_FLOOR)
}
