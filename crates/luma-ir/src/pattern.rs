//! Patterns: repeatable sequences of note and rest events.

use core::fmt;

use crate::event::Event;
use crate::note::Note;
use crate::tempo::Tempo;

/// How many times a pattern body plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RepeatCount {
    /// Play the body this many times; 0 = already exhausted
    Finite(u32),
    /// Loop forever
    Infinite,
}

impl RepeatCount {
    pub fn is_exhausted(self) -> bool {
        self == RepeatCount::Finite(0)
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::Finite(1)
    }
}

impl From<u32> for RepeatCount {
    fn from(count: u32) -> Self {
        RepeatCount::Finite(count)
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCount::Finite(n) => write!(f, "{}", n),
            RepeatCount::Infinite => f.write_str("inf"),
        }
    }
}

/// An ordered sequence of events played `repeat_count` times.
///
/// Insertion order is playback order. Sub-patterns are expanded when
/// they are added, so a built pattern is always flat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    events: Vec<Event>,
    repeat: RepeatCount,
}

impl Pattern {
    /// Create an empty pattern that plays once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_repeat_count`](Self::set_repeat_count).
    pub fn with_repeat(mut self, repeat: impl Into<RepeatCount>) -> Self {
        self.repeat = repeat.into();
        self
    }

    /// Append a note or rest.
    pub fn add_note(&mut self, note: Note) {
        self.events.push(Event::note_on(note));
    }

    /// Append `sub`'s body once per repeat of `sub`.
    ///
    /// An infinite sub-pattern cannot be expanded statically and is
    /// appended once.
    pub fn add_pattern(&mut self, sub: &Pattern) {
        let copies = match sub.repeat {
            RepeatCount::Finite(n) => n as usize,
            RepeatCount::Infinite => {
                log::warn!("expanding an infinitely repeating sub-pattern once");
                1
            }
        };
        self.events.reserve(sub.events.len() * copies);
        for _ in 0..copies {
            self.events.extend_from_slice(&sub.events);
        }
    }

    pub fn set_repeat_count(&mut self, repeat: impl Into<RepeatCount>) {
        self.repeat = repeat.into();
    }

    pub fn repeat_count(&self) -> RepeatCount {
        self.repeat
    }

    /// Number of events in one pass of the body.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Length of one pass of the body in beats.
    pub fn duration_beats(&self) -> f64 {
        self.events
            .iter()
            .filter_map(Event::note)
            .map(Note::duration_beats)
            .sum()
    }

    /// Length of one pass of the body in milliseconds.
    pub fn duration_ms(&self, tempo: Tempo) -> f64 {
        tempo.beats_to_ms(self.duration_beats())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, event) in self.events.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", event)?;
        }
        f.write_str("]")?;
        if self.repeat != RepeatCount::Finite(1) {
            write!(f, " # {}", self.repeat)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Disposition;

    fn c(beats: f64) -> Note {
        Note::from_pitch(60, 100, beats)
    }

    #[test]
    fn new_pattern_plays_once() {
        let pattern = Pattern::new();
        assert_eq!(pattern.repeat_count(), RepeatCount::Finite(1));
        assert!(pattern.is_empty());
    }

    #[test]
    fn add_note_preserves_order() {
        let mut pattern = Pattern::new();
        pattern.add_note(c(1.0));
        pattern.add_note(Note::rest(0.5));
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.event(0).and_then(Event::pitch), Some(60));
        assert!(pattern.event(1).is_some_and(Event::is_rest));
        assert_eq!(pattern.event(2), None);
    }

    #[test]
    fn add_pattern_expands_repeats() {
        let mut sub = Pattern::new().with_repeat(3);
        sub.add_note(c(1.0));
        sub.add_note(Note::rest(1.0));

        let mut parent = Pattern::new();
        parent.add_note(Note::rest(2.0));
        parent.add_pattern(&sub);

        assert_eq!(parent.len(), 7);
        assert_eq!(parent.duration_beats(), 8.0);
        // sub keeps its own count; expansion does not consume it
        assert_eq!(sub.repeat_count(), RepeatCount::Finite(3));
    }

    #[test]
    fn add_exhausted_pattern_adds_nothing() {
        let mut sub = Pattern::new().with_repeat(0);
        sub.add_note(c(1.0));
        let mut parent = Pattern::new();
        parent.add_pattern(&sub);
        assert!(parent.is_empty());
    }

    #[test]
    fn add_infinite_pattern_adds_one_copy() {
        let mut sub = Pattern::new().with_repeat(RepeatCount::Infinite);
        sub.add_note(c(1.0));
        let mut parent = Pattern::new();
        parent.add_pattern(&sub);
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn expanded_copies_do_not_alias() {
        let mut sub = Pattern::new().with_repeat(2);
        sub.add_note(c(1.0));
        let mut parent = Pattern::new();
        parent.add_pattern(&sub);

        let mut first = *parent.event(0).unwrap();
        let Event::Note(e) = &mut first;
        e.disposition = Disposition::Off;
        assert_eq!(parent.event(1).and_then(Event::disposition), Some(Disposition::On));
    }

    #[test]
    fn duration_ms_uses_tempo() {
        let mut pattern = Pattern::new();
        pattern.add_note(c(1.0));
        pattern.add_note(Note::rest(1.0));
        assert_eq!(pattern.duration_ms(Tempo::new(120.0).unwrap()), 1000.0);
    }

    #[test]
    fn display_matches_source_form() {
        let mut pattern = Pattern::new();
        pattern.add_note(c(1.0));
        pattern.add_note(Note::rest(1.0));
        assert_eq!(pattern.to_string(), "[on pitch 60 100 1, rest 1]");
        pattern.set_repeat_count(4);
        assert_eq!(pattern.to_string(), "[on pitch 60 100 1, rest 1] # 4");
    }
}
