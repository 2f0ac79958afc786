//! Bounded single-producer/single-consumer event queue.
//!
//! Fixed power-of-two capacity so index wraparound is a bitmask, not a
//! modulo. Both ends fail fast: `push` returns false on a full queue,
//! `pop` returns `None` on an empty one, and neither ever blocks or
//! allocates. The producer and consumer roles are separate handles, so
//! the single-producer/single-consumer discipline the algorithm requires
//! is enforced by ownership rather than by documentation.
//!
//! One slot is sacrificed to distinguish full from empty: a queue created
//! with capacity `N` holds at most `N - 1` events.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Shared<T, const N: usize> {
    buffer: [UnsafeCell<T>; N],
    /// Next index to pop. Owned by the consumer, observed by the producer.
    head: AtomicUsize,
    /// Next index to push. Owned by the producer, observed by the consumer.
    tail: AtomicUsize,
}

// Exclusive slot access is guaranteed by the head/tail protocol: the
// producer only writes slots the consumer cannot yet see, and vice versa.
unsafe impl<T: Send, const N: usize> Send for Shared<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for Shared<T, N> {}

/// Create a bounded SPSC queue, returning the two role handles.
///
/// `N` must be a power of two; this is checked at compile time.
pub fn bounded<T: Copy + Default, const N: usize>() -> (Producer<T, N>, Consumer<T, N>) {
    const {
        assert!(N.is_power_of_two() && N > 1);
    }

    let shared = Arc::new(Shared {
        buffer: core::array::from_fn(|_| UnsafeCell::new(T::default())),
        head: AtomicUsize::new(0),
        tail: AtomicUsize::new(0),
    });

    (
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    )
}

/// Producing half of a bounded SPSC queue.
pub struct Producer<T, const N: usize> {
    shared: Arc<Shared<T, N>>,
}

impl<T: Copy, const N: usize> Producer<T, N> {
    /// Append an event. Returns false, leaving the queue untouched, when
    /// the queue is full.
    #[inline]
    pub fn push(&mut self, item: T) -> bool {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & (N - 1);

        if next == shared.head.load(Ordering::Acquire) {
            return false;
        }

        // Safety: slot `tail` is invisible to the consumer until the
        // release store below.
        unsafe {
            *shared.buffer[tail].get() = item;
        }
        shared.tail.store(next, Ordering::Release);
        true
    }
}

/// Consuming half of a bounded SPSC queue.
pub struct Consumer<T, const N: usize> {
    shared: Arc<Shared<T, N>>,
}

impl<T: Copy, const N: usize> Consumer<T, N> {
    /// Remove the oldest event, or `None` if the queue is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let shared = &*self.shared;
        let head = shared.head.load(Ordering::Relaxed);

        if head == shared.tail.load(Ordering::Acquire) {
            return None;
        }

        // Safety: the acquire load above pairs with the producer's
        // release store, so slot `head` is fully written.
        let item = unsafe { *shared.buffer[head].get() };
        shared.head.store((head + 1) & (N - 1), Ordering::Release);
        Some(item)
    }

    /// True if no events are waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.head.load(Ordering::Relaxed) == self.shared.tail.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let (mut tx, mut rx) = bounded::<u32, 8>();
        for n in 0..5 {
            assert!(tx.push(n));
        }
        for n in 0..5 {
            assert_eq!(rx.pop(), Some(n));
        }
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn test_full_push_fails_without_modifying() {
        let (mut tx, mut rx) = bounded::<u32, 4>();
        // Capacity 4 holds 3 events.
        assert!(tx.push(1));
        assert!(tx.push(2));
        assert!(tx.push(3));
        assert!(!tx.push(4));
        assert!(!tx.push(5));

        assert_eq!(rx.pop(), Some(1));
        assert_eq!(rx.pop(), Some(2));
        assert_eq!(rx.pop(), Some(3));
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn test_empty_pop_fails_without_modifying() {
        let (mut tx, mut rx) = bounded::<u32, 4>();
        assert!(rx.is_empty());
        assert_eq!(rx.pop(), None);

        assert!(tx.push(9));
        assert!(!rx.is_empty());
        assert_eq!(rx.pop(), Some(9));
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn test_wraparound() {
        let (mut tx, mut rx) = bounded::<u32, 4>();
        for round in 0..20 {
            assert!(tx.push(round));
            assert!(tx.push(round + 100));
            assert_eq!(rx.pop(), Some(round));
            assert_eq!(rx.pop(), Some(round + 100));
        }
    }

    #[test]
    fn test_cross_thread_transfer() {
        let (mut tx, mut rx) = bounded::<u64, 64>();

        let producer = std::thread::spawn(move || {
            let mut sent = 0u64;
            while sent < 1000 {
                if tx.push(sent) {
                    sent += 1;
                }
            }
        });

        let mut expected = 0u64;
        while expected < 1000 {
            if let Some(value) = rx.pop() {
                assert_eq!(value, expected);
                expected += 1;
            }
        }
        producer.join().unwrap();
    }
}
