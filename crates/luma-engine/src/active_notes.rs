//! ActiveNotes: which note is sounding at each pitch.

use luma_ir::{Note, MAX_PITCH};

use crate::TrackId;

/// Number of pitch slots (one per MIDI pitch).
pub const PITCH_SLOTS: usize = MAX_PITCH as usize + 1;

/// Lifetimes at or below this many milliseconds count as elapsed.
pub(crate) const TIME_EPSILON_MS: f64 = 1e-9;

/// A sounding note and its remaining lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveNote {
    /// Owned copy of the note that was started
    pub note: Note,
    /// Track that started the note
    pub track: TrackId,
    /// Milliseconds until the note expires
    pub time_left_ms: f64,
    /// Milliseconds since the note started
    pub age_ms: f64,
}

impl ActiveNote {
    pub fn new(note: Note, track: TrackId, duration_ms: f64) -> Self {
        Self {
            note,
            track,
            time_left_ms: duration_ms.max(0.0),
            age_ms: 0.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.time_left_ms <= TIME_EPSILON_MS
    }
}

/// Pitch-indexed table of sounding notes. At most one entry per pitch.
#[derive(Clone, Debug)]
pub struct ActiveNotes {
    slots: Vec<Option<ActiveNote>>,
    count: usize,
}

impl ActiveNotes {
    /// Create an empty registry. Allocates all slots up front.
    pub fn new() -> Self {
        Self {
            slots: vec![None; PITCH_SLOTS],
            count: 0,
        }
    }

    pub fn get(&self, pitch: u8) -> Option<&ActiveNote> {
        self.slots.get(pitch as usize).and_then(|s| s.as_ref())
    }

    pub fn is_sounding(&self, pitch: u8) -> bool {
        self.get(pitch).is_some()
    }

    /// Install `entry` at `pitch`, returning the note it displaced.
    pub fn insert(&mut self, pitch: u8, entry: ActiveNote) -> Option<ActiveNote> {
        let slot = &mut self.slots[pitch.min(MAX_PITCH) as usize];
        let displaced = slot.replace(entry);
        if displaced.is_none() {
            self.count += 1;
        }
        displaced
    }

    pub fn remove(&mut self, pitch: u8) -> Option<ActiveNote> {
        let removed = self.slots.get_mut(pitch as usize).and_then(Option::take);
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    /// Smallest remaining lifetime among sounding notes.
    pub fn next_expiry(&self) -> Option<f64> {
        self.iter()
            .map(|(_, entry)| entry.time_left_ms)
            .min_by(f64::total_cmp)
    }

    /// Age every sounding note by `elapsed_ms`.
    pub fn age(&mut self, elapsed_ms: f64) {
        if self.count == 0 {
            return;
        }
        for entry in self.slots.iter_mut().flatten() {
            entry.time_left_ms = (entry.time_left_ms - elapsed_ms).max(0.0);
            entry.age_ms += elapsed_ms;
        }
    }

    /// Remove every expired note, lowest pitch first, passing each to `on_expire`.
    pub fn expire(&mut self, mut on_expire: impl FnMut(u8, ActiveNote)) {
        if self.count == 0 {
            return;
        }
        for (pitch, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some_and(|entry| entry.is_expired()) {
                if let Some(entry) = slot.take() {
                    self.count -= 1;
                    on_expire(pitch as u8, entry);
                }
            }
        }
    }

    /// Remove every note, lowest pitch first, passing each to `on_release`.
    pub fn drain(&mut self, mut on_release: impl FnMut(u8, ActiveNote)) {
        for (pitch, slot) in self.slots.iter_mut().enumerate() {
            if let Some(entry) = slot.take() {
                on_release(pitch as u8, entry);
            }
        }
        self.count = 0;
    }

    /// Iterate sounding notes in ascending pitch order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &ActiveNote)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(pitch, slot)| slot.as_ref().map(|entry| (pitch as u8, entry)))
    }

    /// Number of sounding notes.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for ActiveNotes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pitch: u8, duration_ms: f64) -> ActiveNote {
        ActiveNote::new(Note::from_pitch(pitch, 100, 1.0), 0, duration_ms)
    }

    #[test]
    fn insert_into_free_slot() {
        let mut notes = ActiveNotes::new();
        assert!(notes.insert(60, entry(60, 500.0)).is_none());
        assert!(notes.is_sounding(60));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn insert_displaces_existing() {
        let mut notes = ActiveNotes::new();
        notes.insert(60, ActiveNote::new(Note::from_pitch(60, 10, 1.0), 0, 500.0));
        let displaced = notes.insert(60, ActiveNote::new(Note::from_pitch(60, 90, 1.0), 1, 500.0));

        assert_eq!(displaced.map(|d| d.note.velocity()), Some(10));
        assert_eq!(notes.get(60).map(|e| e.track), Some(1));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn age_then_expire_in_pitch_order() {
        let mut notes = ActiveNotes::new();
        notes.insert(64, entry(64, 200.0));
        notes.insert(60, entry(60, 200.0));
        notes.insert(67, entry(67, 800.0));

        notes.age(200.0);
        let mut expired = Vec::new();
        notes.expire(|pitch, _| expired.push(pitch));

        assert_eq!(expired, vec![60, 64]);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.get(67).map(|e| e.time_left_ms), Some(600.0));
        assert_eq!(notes.get(67).map(|e| e.age_ms), Some(200.0));
    }

    #[test]
    fn aging_never_goes_negative() {
        let mut notes = ActiveNotes::new();
        notes.insert(60, entry(60, 100.0));
        notes.age(250.0);
        assert_eq!(notes.get(60).map(|e| e.time_left_ms), Some(0.0));
    }

    #[test]
    fn next_expiry_is_minimum() {
        let mut notes = ActiveNotes::new();
        assert_eq!(notes.next_expiry(), None);
        notes.insert(60, entry(60, 300.0));
        notes.insert(72, entry(72, 100.0));
        assert_eq!(notes.next_expiry(), Some(100.0));
    }

    #[test]
    fn drain_empties_registry() {
        let mut notes = ActiveNotes::new();
        notes.insert(72, entry(72, 300.0));
        notes.insert(48, entry(48, 300.0));
        let mut released = Vec::new();
        notes.drain(|pitch, _| released.push(pitch));
        assert_eq!(released, vec![48, 72]);
        assert!(notes.is_empty());
    }

    #[test]
    fn remove_missing_pitch_is_none() {
        let mut notes = ActiveNotes::new();
        assert!(notes.remove(60).is_none());
        notes.insert(60, entry(60, 1.0));
        assert!(notes.remove(60).is_some());
        assert!(notes.is_empty());
    }
}
