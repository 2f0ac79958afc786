//! Lock-free parameter cells shared between the UI and worker threads.

use atomic_float::AtomicF32;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Cache-line aligned atomic f32.
///
/// Used for display parameters a UI thread adjusts while the visual worker
/// reads them every frame (e.g. the waveform trigger level).
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
///
/// Worker run/reset flags. A worker observes the flag once per iteration
/// and finishes its current block before reacting, so flipping it never
/// interrupts in-flight processing.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned monotonic counter for dropped-work accounting.
///
/// Incremented from the producing thread, read from anywhere. Relaxed on
/// both sides: the count is diagnostic, not a synchronization point.
#[derive(Debug, Default)]
#[repr(align(64))]
pub struct DropCounter {
    value: AtomicU64,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_float() {
        let val = AtomicFloat::new(0.25);
        assert_eq!(val.get(), 0.25);
        val.set(-0.5);
        assert_eq!(val.get(), -0.5);
    }

    #[test]
    fn test_atomic_flag_swap() {
        let flag = AtomicFlag::new(false);
        assert!(!flag.swap(true));
        assert!(flag.get());
    }

    #[test]
    fn test_drop_counter() {
        let counter = DropCounter::new();
        assert_eq!(counter.get(), 0);
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);
    }
}
