//! Sample-domain envelope follower.

/// Asymmetric one-pole smoother over the rectified input: fast attack,
/// slow release. Coefficients are derived once at construction from
/// millisecond time constants and the sample rate as `exp(-1/(T*fs))`.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFollower {
    value: f32,
    attack: f32,
    release: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        Self {
            value: 0.0,
            attack: coeff(attack_ms, sample_rate),
            release: coeff(release_ms, sample_rate),
        }
    }

    /// Feed one sample; returns the updated envelope.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let v = x.abs();
        let coeff = if v > self.value {
            self.attack
        } else {
            self.release
        };
        self.value = coeff * self.value + (1.0 - coeff) * v;
        self.value
    }

    /// Current envelope without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Return to silence. Coefficients are untouched.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// One-pole coefficient for a millisecond time constant. Non-positive
/// time constants collapse to zero (instant tracking) rather than
/// dividing by zero.
fn coeff(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 {
        0.0
    } else {
        (-1.0 / (time_ms * 0.001 * sample_rate)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 32_000.0;

    #[test]
    fn test_envelope_rises_on_signal() {
        let mut env = EnvelopeFollower::new(1.0, 100.0, SAMPLE_RATE);
        for _ in 0..1000 {
            env.process(0.5);
        }
        assert!(env.value() > 0.45, "envelope should approach the input");
    }

    #[test]
    fn test_envelope_falls_on_silence() {
        let mut env = EnvelopeFollower::new(1.0, 10.0, SAMPLE_RATE);
        for _ in 0..1000 {
            env.process(0.8);
        }
        let peak = env.value();
        for _ in 0..4000 {
            env.process(0.0);
        }
        assert!(env.value() < peak * 0.1, "envelope should decay");
    }

    #[test]
    fn test_release_slower_than_attack() {
        let mut env = EnvelopeFollower::new(1.0, 200.0, SAMPLE_RATE);
        for _ in 0..2000 {
            env.process(0.5);
        }
        let held = env.value();
        // A short gap barely dents the envelope with a 200 ms release.
        for _ in 0..32 {
            env.process(0.0);
        }
        assert!(env.value() > held * 0.9);
    }

    #[test]
    fn test_non_positive_time_constant_tracks_instantly() {
        let mut env = EnvelopeFollower::new(0.0, -5.0, SAMPLE_RATE);
        assert_eq!(env.process(0.7), 0.7);
        assert_eq!(env.process(0.1), 0.1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut env = EnvelopeFollower::new(2.0, 50.0, SAMPLE_RATE);
        env.process(1.0);
        env.reset();
        let after_one = env;
        env.reset();
        assert_eq!(env.value(), after_one.value());
        assert_eq!(env.value(), 0.0);
    }
}
