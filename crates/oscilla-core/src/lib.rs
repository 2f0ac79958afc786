//! Lock-free plumbing and fixed-size data model for the oscilla
//! real-time audio visualization pipeline.
//!
//! The render thread must never block or allocate; everything here is
//! built around that constraint:
//!
//! - [`SnapshotExchange`]: wait-free triple-slot publish/subscribe between
//!   one producer and one consumer, with pinned (tear-free) reads.
//! - [`queue`]: bounded fail-fast SPSC event queue (note-on injection).
//! - [`frame`]: fixed-size audio and visual payload types.
//! - [`BlockAssembler`]: render-callback burst accumulation into blocks.
//! - [`lockfree`]: cache-line aligned atomic parameter cells.

pub mod assembler;
pub mod config;
pub mod error;
pub mod frame;
pub mod lockfree;
pub mod note;
pub mod queue;
pub mod snapshot;

pub use assembler::BlockAssembler;
pub use config::{BLOCK_SIZE, FRAME_INTERVAL_MS, SAMPLE_RATE, SPECTRUM_BANDS, VISUAL_POINTS};
pub use error::{Error, Result};
pub use frame::{AudioBlock, SpectrumFrame, VuLevel, WaveformFrame, VU_DB_FLOOR};
pub use lockfree::{AtomicFlag, AtomicFloat, DropCounter};
pub use note::{note_queue, NoteConsumer, NoteEvent, NoteProducer, NOTE_QUEUE_CAPACITY};
pub use snapshot::{ReadGuard, SnapshotExchange, WriteGuard, WritePolicy};
