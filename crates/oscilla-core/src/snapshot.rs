//! Wait-free triple-slot snapshot exchange.
//!
//! Single high-frequency producer, single low-frequency consumer. The
//! producer must never block: `begin_write` either claims a free slot or
//! returns `None`, and the caller drops that cycle's output. The consumer
//! pins the most recently published slot for the duration of a read; a
//! pinned slot is never handed back to the producer, so an in-progress
//! read cannot be torn.
//!
//! Per-slot state:
//!
//! - `writing`: the producer holds a claim on the slot. Claimed via CAS so
//!   a slot is only ever filled by one writer at a time.
//! - `pinned`: the consumer is reading the slot. The producer skips it.
//! - `published` (exchange-wide): index of the most recently completed
//!   write, or -1 before the first publish.
//!
//! Three slots suffice for one producer and one consumer: one may be
//! pinned, one freshly published, one spare. If all three are unavailable
//! (pathological under the intended discipline) the write is dropped;
//! that is the designed backpressure valve, not an error.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

use crate::lockfree::DropCounter;

/// Producer behavior when no obviously free slot exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum WritePolicy {
    /// Skip only pinned slots. The published slot is just a freshness
    /// pointer and may be overwritten, bounding staleness at the cost of
    /// occasionally recycling the newest frame before anyone read it.
    #[default]
    OverwriteLatest,
    /// Treat the published slot as busy too. The newest complete frame is
    /// never reclaimed until another slot frees up, trading frame drops
    /// for a guaranteed-intact latest snapshot.
    DropIfBusy,
}

const SLOT_COUNT: usize = 3;

#[repr(align(64))]
struct Slot<T> {
    payload: UnsafeCell<T>,
    writing: AtomicBool,
    pinned: AtomicBool,
}

impl<T: Default> Slot<T> {
    fn new() -> Self {
        Self {
            payload: UnsafeCell::new(T::default()),
            writing: AtomicBool::new(false),
            pinned: AtomicBool::new(false),
        }
    }
}

/// Triple-buffered single-producer/single-consumer snapshot exchange.
///
/// Each analyzer owns one exchange per output (spectrum, waveform, VU),
/// and the render thread owns one for the raw audio tap. All slots are
/// allocated at construction; the write and read paths never allocate.
pub struct SnapshotExchange<T> {
    slots: [Slot<T>; SLOT_COUNT],
    /// Index of the newest fully written slot, -1 before the first publish.
    published: AtomicIsize,
    policy: WritePolicy,
    dropped: DropCounter,
}

// The atomic claim/pin protocol guarantees exclusive access to a slot's
// payload between claim and release, so sharing the exchange only needs
// the payload itself to be Send.
unsafe impl<T: Send> Send for SnapshotExchange<T> {}
unsafe impl<T: Send> Sync for SnapshotExchange<T> {}

impl<T: Default> SnapshotExchange<T> {
    pub fn new(policy: WritePolicy) -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot::new()),
            published: AtomicIsize::new(-1),
            policy,
            dropped: DropCounter::new(),
        }
    }
}

impl<T: Default> Default for SnapshotExchange<T> {
    fn default() -> Self {
        Self::new(WritePolicy::default())
    }
}

impl<T> SnapshotExchange<T> {
    /// Claim a slot for writing. Never blocks.
    ///
    /// Returns `None` when every candidate slot is pinned or already
    /// claimed; the caller must drop this cycle's output. Dropping the
    /// returned guard publishes the slot as the newest snapshot.
    pub fn begin_write(&self) -> Option<WriteGuard<'_, T>> {
        let published = self.published.load(Ordering::Acquire);

        for (i, slot) in self.slots.iter().enumerate() {
            // A pinned slot is being read; it is off limits.
            if slot.pinned.load(Ordering::Acquire) {
                continue;
            }

            // DropIfBusy also protects the newest complete frame.
            if self.policy == WritePolicy::DropIfBusy && i as isize == published {
                continue;
            }

            if slot
                .writing
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                // The consumer may have pinned this slot between the check
                // above and the claim. The SeqCst claim/pin handshake
                // ensures that either this load sees the pin or the
                // reader's validation sees the claim; back off here so
                // both sides never proceed on the same slot.
                if slot.pinned.load(Ordering::SeqCst) {
                    slot.writing.store(false, Ordering::Release);
                    continue;
                }
                return Some(WriteGuard {
                    exchange: self,
                    idx: i,
                });
            }
        }

        self.dropped.increment();
        None
    }

    /// Claim, fill, and publish in one call. Returns false if the write
    /// had to be dropped.
    pub fn write(&self, fill: impl FnOnce(&mut T)) -> bool {
        match self.begin_write() {
            Some(mut guard) => {
                fill(&mut guard);
                true
            }
            None => false,
        }
    }

    /// Pin and return the newest published snapshot, or `None` if nothing
    /// has ever been published.
    ///
    /// The returned guard keeps the slot pinned; a writer cannot reclaim
    /// it until the guard drops. Release it promptly to bound staleness.
    pub fn begin_read(&self) -> Option<ReadGuard<'_, T>> {
        loop {
            let published = self.published.load(Ordering::Acquire);
            if published < 0 {
                return None;
            }
            let idx = published as usize;
            let slot = &self.slots[idx];

            slot.pinned.store(true, Ordering::SeqCst);

            // Validate after pinning: a writer that claimed this slot
            // before the pin landed is still filling it. Unpin and retry;
            // the writer's publish is imminent, so the loop is short.
            if slot.writing.load(Ordering::SeqCst)
                || self.published.load(Ordering::Acquire) != published
            {
                slot.pinned.store(false, Ordering::Release);
                core::hint::spin_loop();
                continue;
            }

            return Some(ReadGuard {
                exchange: self,
                idx,
            });
        }
    }

    /// Read the newest snapshot by copy, releasing the pin immediately.
    pub fn read_latest(&self) -> Option<T>
    where
        T: Copy,
    {
        self.begin_read().map(|guard| *guard)
    }

    /// Number of write cycles dropped because no slot was claimable.
    pub fn dropped_writes(&self) -> u64 {
        self.dropped.get()
    }
}

/// Exclusive claim on one exchange slot. Dropping the guard releases the
/// claim and publishes the slot, in that order, so a reader that acquires
/// the published index always observes the completed payload.
pub struct WriteGuard<'a, T> {
    exchange: &'a SnapshotExchange<T>,
    idx: usize,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the writing claim grants exclusive payload access.
        unsafe { &*self.exchange.slots[self.idx].payload.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: as above.
        unsafe { &mut *self.exchange.slots[self.idx].payload.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        let slot = &self.exchange.slots[self.idx];
        // Release the claim before publishing: the release store on
        // `writing` orders all payload writes before the release store on
        // `published`, so an acquiring reader sees a complete payload.
        slot.writing.store(false, Ordering::Release);
        self.exchange
            .published
            .store(self.idx as isize, Ordering::Release);
    }
}

/// Pinned read of the newest published snapshot. The slot stays protected
/// from writers until the guard drops.
pub struct ReadGuard<'a, T> {
    exchange: &'a SnapshotExchange<T>,
    idx: usize,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the pin excludes writers for the guard's lifetime.
        unsafe { &*self.exchange.slots[self.idx].payload.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.exchange.slots[self.idx]
            .pinned
            .store(false, Ordering::Release);
    }
}
