//! Core IR types for the luma sequencer.
//!
//! This crate defines the musical data the sequencer consumes: scales,
//! notes, events and patterns. Pattern sources are built elsewhere and
//! handed over as IR; the engine crate plays IR back.

mod event;
mod note;
mod pattern;
mod scale;
mod tempo;

pub use event::{Disposition, Event, NoteEvent};
pub use note::{Note, PitchClass, DEFAULT_VELOCITY};
pub use pattern::{Pattern, RepeatCount};
pub use scale::{resolve_pitch, Scale, DEGREES_PER_SCALE, MAX_PITCH};
pub use tempo::{Tempo, TempoError, DEFAULT_BPM};
