//! Note events posted from the input layer into the render thread.

use crate::queue;

/// Depth of the note queue. Bursts beyond this between two render cycles
/// are dropped by the non-blocking post.
pub const NOTE_QUEUE_CAPACITY: usize = 64;

/// A note-on request, queued for application on the next render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// MIDI-style pitch number.
    pub pitch: u8,
}

impl NoteEvent {
    pub const fn new(pitch: u8) -> Self {
        Self { pitch }
    }
}

/// Posting half of the note queue (input/MIDI side).
pub type NoteProducer = queue::Producer<NoteEvent, NOTE_QUEUE_CAPACITY>;

/// Draining half of the note queue (render side).
pub type NoteConsumer = queue::Consumer<NoteEvent, NOTE_QUEUE_CAPACITY>;

/// Create the note queue pair.
pub fn note_queue() -> (NoteProducer, NoteConsumer) {
    queue::bounded()
}
