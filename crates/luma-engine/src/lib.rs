//! Playback engine for the luma sequencer.
//!
//! Steps pattern tracks through elapsed time and reports timestamped
//! note-on/note-off events for a downstream instrument. `advance` is
//! meant to be driven from a realtime callback, so it never blocks and
//! does not allocate when given an output buffer with spare capacity.

mod active_notes;
mod cursor;
pub mod sequencer;
mod timed_event;

/// Index of a registered track, in registration order.
pub type TrackId = usize;

pub use active_notes::{ActiveNote, ActiveNotes, PITCH_SLOTS};
pub use cursor::PlaybackCursor;
pub use sequencer::{Sequencer, SequencerConfig, Track, DEFAULT_COLLISION_LEAD_MS};
pub use timed_event::TimedEvent;
