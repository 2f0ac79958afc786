//! Frame-domain asymmetric smoother.

/// One-pole smoother stepped once per visual frame rather than per
/// sample. The frame interval is fixed at construction, so both alphas
/// are precomputed as `1 - exp(-dt/T)` and the per-frame cost is one
/// multiply-add. A non-positive time constant degenerates to an alpha of
/// 1 (instant tracking) instead of dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct FrameSmoother {
    value: f32,
    attack_alpha: f32,
    release_alpha: f32,
}

impl FrameSmoother {
    /// `interval_ms` is the fixed spacing between frames; `attack_ms` and
    /// `release_ms` are the rise and fall time constants.
    pub fn new(interval_ms: f32, attack_ms: f32, release_ms: f32) -> Self {
        let dt = interval_ms * 0.001;
        Self {
            value: 0.0,
            attack_alpha: alpha(dt, attack_ms),
            release_alpha: alpha(dt, release_ms),
        }
    }

    /// Track `x`, rising with the attack alpha and falling with the
    /// release alpha. Returns the smoothed value.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let alpha = if x > self.value {
            self.attack_alpha
        } else {
            self.release_alpha
        };
        self.value += alpha * (x - self.value);
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the tracked value directly (default zero). Alphas untouched.
    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}

fn alpha(dt: f32, time_ms: f32) -> f32 {
    if time_ms <= 0.0 {
        1.0
    } else {
        1.0 - (-dt / (time_ms * 0.001)).exp()
    }
}
