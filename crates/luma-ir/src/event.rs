//! Event types shared by patterns and the sequencer output.

use core::fmt;

use crate::note::Note;

/// Whether a note event starts or stops a sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
    On,
    Off,
}

/// A note (or rest) with its on/off disposition.
///
/// The note is an owned snapshot: an Off always carries a copy of the
/// note its On carried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    pub note: Note,
    pub disposition: Disposition,
}

/// Something that happens in a pattern or in sequencer output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Start or stop a note; rests are note events without a pitch
    Note(NoteEvent),
}

impl Event {
    /// A note-on (or a rest step) for `note`.
    pub fn note_on(note: Note) -> Self {
        Event::Note(NoteEvent { note, disposition: Disposition::On })
    }

    /// A note-off carrying a copy of `note`.
    pub fn note_off(note: Note) -> Self {
        Event::Note(NoteEvent { note, disposition: Disposition::Off })
    }

    /// The note this event carries, if any.
    pub fn note(&self) -> Option<&Note> {
        match self {
            Event::Note(e) => Some(&e.note),
        }
    }

    pub fn disposition(&self) -> Option<Disposition> {
        match self {
            Event::Note(e) => Some(e.disposition),
        }
    }

    /// Absolute pitch of a sounding note event.
    pub fn pitch(&self) -> Option<u8> {
        self.note().and_then(Note::pitch)
    }

    pub fn is_rest(&self) -> bool {
        self.note().is_some_and(Note::is_rest)
    }

    /// Three-byte channel voice message for this event.
    ///
    /// Returns `None` for rests. `channel` is masked to 0-15.
    pub fn midi_message(&self, channel: u8) -> Option<[u8; 3]> {
        let channel = channel & 0x0F;
        match self {
            Event::Note(e) => {
                let pitch = e.note.pitch()?;
                Some(match e.disposition {
                    Disposition::On => [0x90 | channel, pitch, e.note.velocity()],
                    Disposition::Off => [0x80 | channel, pitch, 0],
                })
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Note(e) if e.note.is_rest() => write!(f, "{}", e.note),
            Event::Note(e) => match e.disposition {
                Disposition::On => write!(f, "on {}", e.note),
                Disposition::Off => write!(f, "off {}", e.note),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_keeps_note_snapshot() {
        let note = Note::from_pitch(62, 80, 1.0);
        let on = Event::note_on(note);
        let off = Event::note_off(note);
        assert_eq!(on.note(), off.note());
        assert_eq!(on.disposition(), Some(Disposition::On));
        assert_eq!(off.disposition(), Some(Disposition::Off));
    }

    #[test]
    fn copies_are_independent() {
        let original = Event::note_on(Note::from_pitch(60, 100, 1.0));
        let mut copy = original;
        let Event::Note(e) = &mut copy;
        e.disposition = Disposition::Off;
        assert_eq!(original.disposition(), Some(Disposition::On));
        assert_eq!(copy.disposition(), Some(Disposition::Off));
    }

    #[test]
    fn midi_messages() {
        let note = Note::from_pitch(60, 100, 1.0);
        assert_eq!(Event::note_on(note).midi_message(0), Some([0x90, 60, 100]));
        assert_eq!(Event::note_off(note).midi_message(3), Some([0x83, 60, 0]));
        assert_eq!(Event::note_on(Note::rest(1.0)).midi_message(0), None);
    }

    #[test]
    fn display_marks_disposition() {
        let note = Note::from_pitch(60, 100, 1.0);
        assert_eq!(Event::note_on(note).to_string(), "on pitch 60 100 1");
        assert_eq!(Event::note_off(note).to_string(), "off pitch 60 100 1");
        assert_eq!(Event::note_on(Note::rest(2.0)).to_string(), "rest 2");
    }
}
