//! Second-order IIR sections and the fourth-order cascade built from them.

use core::f32::consts::PI;

/// Direct Form I biquad.
///
/// `y = b0*x + z1`, then `z1 = b1*x - a1*y + z2`, `z2 = b2*x - a2*y`.
/// Coefficients are fixed at construction; only the two delay registers
/// mutate per sample.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// Bandpass section (RBJ cookbook, 0 dB peak gain) at center
    /// frequency `fc` Hz with quality factor `q`.
    pub fn bandpass(sample_rate: f32, fc: f32, q: f32) -> Self {
        let w0 = 2.0 * PI * fc / sample_rate;
        let alpha = w0.sin() / (2.0 * q);

        let b0 = alpha;
        let b1 = 0.0;
        let b2 = -alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * w0.cos();
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Zero the delay registers. Coefficients are untouched.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Two biquads in series: a fourth-order response with steeper skirts
/// than a single section, used per filterbank band.
#[derive(Debug, Clone, Copy)]
pub struct BiquadCascade {
    stages: [Biquad; 2],
}

impl BiquadCascade {
    /// Fourth-order bandpass: two identical second-order sections.
    pub fn bandpass(sample_rate: f32, fc: f32, q: f32) -> Self {
        let stage = Biquad::bandpass(sample_rate, fc, q);
        Self {
            stages: [stage, stage],
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.stages[0].process(x);
        self.stages[1].process(y)
    }

    pub fn reset(&mut self) {
        self.stages[0].reset();
        self.stages[1].reset();
    }
}
