//! Sequencer output: events positioned within a time slice.

use core::fmt;

use luma_ir::{Disposition, Event};

use crate::TrackId;

/// An event and its offset from the start of the slice that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEvent {
    /// Milliseconds from the start of the slice, within `[0, elapsed)`
    pub offset_ms: f64,
    /// Track whose note this event starts or stops
    pub track: TrackId,
    pub event: Event,
}

impl TimedEvent {
    pub fn new(offset_ms: f64, track: TrackId, event: Event) -> Self {
        Self { offset_ms, track, event }
    }

    /// Offset in sample frames from the start of the audio block.
    pub fn frame_offset(&self, sample_rate: u32) -> u32 {
        (self.offset_ms / 1000.0 * sample_rate as f64) as u32
    }

    pub fn pitch(&self) -> Option<u8> {
        self.event.pitch()
    }

    pub fn is_note_on(&self) -> bool {
        self.event.disposition() == Some(Disposition::On)
    }

    pub fn is_note_off(&self) -> bool {
        self.event.disposition() == Some(Disposition::Off)
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8.2} ms  track {}  {}", self.offset_ms, self.track, self.event)
    }
}
