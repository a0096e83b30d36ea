//! Tempo: the beat-to-milliseconds conversion factor.
//!
//! Tempo is fixed for the lifetime of a sequencer and passed in
//! explicitly wherever a beat duration has to become real time.

use thiserror::Error;

/// Default tempo in beats per minute.
pub const DEFAULT_BPM: f64 = 120.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Error raised when constructing an invalid tempo.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TempoError {
    #[error("tempo must be a finite, positive BPM (got {0})")]
    InvalidBpm(f64),
}

/// A fixed tempo in beats per minute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Create a tempo. `bpm` must be finite and greater than zero.
    pub fn new(bpm: f64) -> Result<Self, TempoError> {
        if bpm.is_finite() && bpm > 0.0 {
            Ok(Self { bpm })
        } else {
            Err(TempoError::InvalidBpm(bpm))
        }
    }

    pub fn bpm(self) -> f64 {
        self.bpm
    }

    /// Length of one beat in milliseconds.
    pub fn ms_per_beat(self) -> f64 {
        MS_PER_MINUTE / self.bpm
    }

    /// Convert a duration in beats to milliseconds.
    pub fn beats_to_ms(self, beats: f64) -> f64 {
        beats * self.ms_per_beat()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: DEFAULT_BPM }
    }
}
