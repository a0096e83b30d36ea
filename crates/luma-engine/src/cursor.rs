//! Per-track playback position.

use luma_ir::{Pattern, RepeatCount};

use crate::active_notes::TIME_EPSILON_MS;

/// Where a track is within its pattern.
///
/// `leftover_ms` is the unconsumed part of the step at `position`. A
/// cursor with a non-zero leftover is waiting; a cursor with zero
/// leftover reads its next event at the current instant.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackCursor {
    position: usize,
    remaining: RepeatCount,
    leftover_ms: f64,
    /// Whether the current pass has consumed any time yet
    consumed_this_pass: bool,
}

impl PlaybackCursor {
    /// A cursor at the start of `pattern` with the pattern's repeat count.
    pub fn new(pattern: &Pattern) -> Self {
        let remaining = if pattern.is_empty() {
            RepeatCount::Finite(0)
        } else {
            pattern.repeat_count()
        };
        Self {
            position: 0,
            remaining,
            leftover_ms: 0.0,
            consumed_this_pass: false,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining_repeats(&self) -> RepeatCount {
        self.remaining
    }

    pub fn leftover_ms(&self) -> f64 {
        self.leftover_ms
    }

    /// True once the track has played every repeat.
    pub fn is_idle(&self) -> bool {
        self.remaining.is_exhausted()
    }

    /// True while the cursor is inside a step and has nothing to read.
    pub fn is_waiting(&self) -> bool {
        self.leftover_ms > 0.0
    }

    /// Start waiting out a step of `duration_ms`; zero-length steps are
    /// passed over immediately.
    pub(crate) fn begin_step(&mut self, duration_ms: f64) {
        if duration_ms > TIME_EPSILON_MS {
            self.leftover_ms = duration_ms;
        } else {
            self.position += 1;
        }
    }

    /// Consume up to `elapsed_ms` of the current step.
    pub(crate) fn consume(&mut self, elapsed_ms: f64) {
        if self.is_idle() || !self.is_waiting() || elapsed_ms <= 0.0 {
            return;
        }
        self.consumed_this_pass = true;
        self.leftover_ms -= elapsed_ms;
        if self.leftover_ms <= TIME_EPSILON_MS {
            self.leftover_ms = 0.0;
            self.position += 1;
        }
    }

    /// Wrap back to the start after the last event of a pass.
    ///
    /// Returns false when the track has just gone idle. An infinite
    /// pattern whose pass took no time would never let the slice end,
    /// so it goes idle as well.
    pub(crate) fn finish_pass(&mut self) -> bool {
        self.position = 0;
        let consumed = core::mem::replace(&mut self.consumed_this_pass, false);
        match self.remaining {
            RepeatCount::Finite(n) => {
                let n = n.saturating_sub(1);
                self.remaining = RepeatCount::Finite(n);
                n > 0
            }
            RepeatCount::Infinite if consumed => true,
            RepeatCount::Infinite => {
                log::warn!("infinitely repeating pattern has zero length, stopping it");
                self.remaining = RepeatCount::Finite(0);
                false
            }
        }
    }
}
