//! The sequencer: steps every track and the shared active-note registry
//! through elapsed time, producing timestamped note events.
//!
//! All tracks run on one slice-local clock. At each instant the
//! sequencer first expires notes whose lifetime has run out, then lets
//! each track (in registration order) read every event that starts at
//! that instant, then jumps to the next instant at which a step ends or
//! a note expires. Because the order of work at an instant never depends
//! on where a slice boundary falls, splitting the same elapsed time into
//! different slices yields the same sequence of note transitions.

use arrayvec::ArrayString;
use luma_ir::{Event, Note, Pattern, Tempo};

use crate::active_notes::{ActiveNote, ActiveNotes, TIME_EPSILON_MS};
use crate::cursor::PlaybackCursor;
use crate::timed_event::TimedEvent;
use crate::TrackId;

/// Default distance between a displaced note's off and the new note's on.
pub const DEFAULT_COLLISION_LEAD_MS: f64 = 1.0;

/// Fixed playback parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequencerConfig {
    /// Tempo used to turn beat durations into milliseconds
    pub tempo: Tempo,
    /// How far before a new note-on the displaced note's note-off is placed
    pub collision_lead_ms: f64,
}

impl SequencerConfig {
    pub fn with_tempo(mut self, tempo: Tempo) -> Self {
        self.tempo = tempo;
        self
    }

    /// Negative or non-finite leads are treated as zero.
    pub fn with_collision_lead_ms(mut self, lead_ms: f64) -> Self {
        self.collision_lead_ms = if lead_ms.is_finite() { lead_ms.max(0.0) } else { 0.0 };
        self
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            tempo: Tempo::default(),
            collision_lead_ms: DEFAULT_COLLISION_LEAD_MS,
        }
    }
}

/// A registered pattern and its playback cursor.
#[derive(Clone, Debug)]
pub struct Track {
    /// Name of the track
    pub name: ArrayString<32>,
    pattern: Pattern,
    cursor: PlaybackCursor,
}

impl Track {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn is_idle(&self) -> bool {
        self.cursor.is_idle()
    }
}

/// Output of one `advance` call while it is being built.
struct Slice<'a> {
    out: &'a mut Vec<TimedEvent>,
    /// Index of the first event emitted by this call
    start: usize,
    /// Current position within the slice
    now: f64,
}

impl Slice<'_> {
    /// Offset of the latest event emitted in this slice.
    fn floor(&self) -> f64 {
        self.out[self.start..].last().map_or(0.0, |e| e.offset_ms)
    }

    fn push(&mut self, offset_ms: f64, track: TrackId, event: Event) {
        self.out.push(TimedEvent::new(offset_ms, track, event));
    }
}

/// Plays a set of pattern tracks against elapsed time.
#[derive(Clone, Debug)]
pub struct Sequencer {
    config: SequencerConfig,
    tracks: Vec<Track>,
    active: ActiveNotes,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            active: ActiveNotes::new(),
        }
    }

    /// A sequencer with default settings at the given tempo.
    pub fn with_tempo(tempo: Tempo) -> Self {
        Self::new(SequencerConfig::default().with_tempo(tempo))
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn tempo(&self) -> Tempo {
        self.config.tempo
    }

    /// Register an unnamed track. Tracks should be added before playback.
    pub fn add_track(&mut self, pattern: Pattern) -> TrackId {
        self.add_named_track("", pattern)
    }

    /// Register a track; names longer than 32 bytes are truncated.
    pub fn add_named_track(&mut self, name: &str, pattern: Pattern) -> TrackId {
        let mut track_name = ArrayString::new();
        for c in name.chars() {
            if track_name.try_push(c).is_err() {
                break;
            }
        }
        let id = self.tracks.len();
        log::debug!(
            "track {} \"{}\": {} events, repeat {}",
            id,
            track_name,
            pattern.len(),
            pattern.repeat_count()
        );
        let cursor = PlaybackCursor::new(&pattern);
        self.tracks.push(Track {
            name: track_name,
            pattern,
            cursor,
        });
        id
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn active_notes(&self) -> &ActiveNotes {
        &self.active
    }

    /// True when every track is idle and nothing is sounding.
    pub fn is_finished(&self) -> bool {
        self.active.is_empty() && self.tracks.iter().all(Track::is_idle)
    }

    /// Advance playback by `elapsed_ms`, appending the slice's events to `out`.
    ///
    /// Appended events are ordered by `offset_ms`, each within
    /// `[0, elapsed_ms)`. Zero, negative and non-finite durations are
    /// ignored. Nothing is allocated as long as `out` has spare capacity.
    pub fn advance(&mut self, elapsed_ms: f64, out: &mut Vec<TimedEvent>) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.advance_slice(elapsed_ms, out));
        #[cfg(not(feature = "alloc_check"))]
        self.advance_slice(elapsed_ms, out);
    }

    /// Advance playback and return the slice's events (allocates).
    pub fn advance_collect(&mut self, elapsed_ms: f64) -> Vec<TimedEvent> {
        let mut out = Vec::new();
        self.advance_slice(elapsed_ms, &mut out);
        out
    }

    /// Stop every sounding note, emitting its note-off at offset 0.
    pub fn all_notes_off(&mut self, out: &mut Vec<TimedEvent>) {
        self.active.drain(|_, entry| {
            out.push(TimedEvent::new(0.0, entry.track, Event::note_off(entry.note)));
        });
    }

    /// Stop every sounding note and restart all tracks from the top.
    pub fn rewind(&mut self, out: &mut Vec<TimedEvent>) {
        self.all_notes_off(out);
        for track in &mut self.tracks {
            track.cursor = PlaybackCursor::new(&track.pattern);
        }
    }

    fn advance_slice(&mut self, elapsed_ms: f64, out: &mut Vec<TimedEvent>) {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return;
        }
        let mut slice = Slice { start: out.len(), out, now: 0.0 };

        loop {
            self.expire_notes(&mut slice);
            for id in 0..self.tracks.len() {
                self.run_track(id, &mut slice);
            }

            let remaining = elapsed_ms - slice.now;
            match self.next_boundary() {
                Some(step) if step < remaining - TIME_EPSILON_MS => {
                    self.elapse(step);
                    slice.now += step;
                }
                _ => {
                    // Anything ending exactly at the slice end is handled
                    // at offset 0 of the next slice.
                    self.elapse(remaining);
                    break;
                }
            }
        }
    }

    /// Emit offs for every note whose lifetime has run out.
    fn expire_notes(&mut self, slice: &mut Slice<'_>) {
        let now = slice.now;
        self.active.expire(|_, entry| {
            slice.push(now, entry.track, Event::note_off(entry.note));
        });
    }

    /// Read every event of track `id` that starts at the current instant.
    fn run_track(&mut self, id: TrackId, slice: &mut Slice<'_>) {
        loop {
            let tempo = self.config.tempo;
            let track = &mut self.tracks[id];
            if track.cursor.is_idle() || track.cursor.is_waiting() {
                return;
            }

            let Some(event) = track.pattern.event(track.cursor.position()).copied() else {
                if !track.cursor.finish_pass() {
                    log::debug!("track {} finished", id);
                    return;
                }
                continue;
            };

            match event {
                Event::Note(step) => {
                    let duration_ms = step.note.duration_ms(tempo);
                    track.cursor.begin_step(duration_ms);
                    if let Some(pitch) = step.note.pitch() {
                        self.start_note(id, pitch, step.note, duration_ms, slice);
                    }
                }
            }
        }
    }

    /// Install `note` in the registry and emit its on, displacing any
    /// note already sounding at the same pitch.
    fn start_note(
        &mut self,
        track: TrackId,
        pitch: u8,
        note: Note,
        duration_ms: f64,
        slice: &mut Slice<'_>,
    ) {
        let entry = ActiveNote::new(note, track, duration_ms);
        if let Some(displaced) = self.active.insert(pitch, entry) {
            // Off strictly ahead of the new on, but never before the
            // displaced note's own on or an already emitted event.
            let lead = self.config.collision_lead_ms.min(displaced.age_ms);
            let offset = (slice.now - lead).max(slice.floor());
            log::trace!(
                "pitch {} on track {} displaces track {} at {:.3} ms",
                pitch,
                track,
                displaced.track,
                offset
            );
            slice.push(offset, displaced.track, Event::note_off(displaced.note));
        }
        slice.push(slice.now, track, Event::note_on(note));
    }

    /// Time until the next step ends or note expires.
    fn next_boundary(&self) -> Option<f64> {
        self.tracks
            .iter()
            .filter(|t| !t.cursor.is_idle() && t.cursor.is_waiting())
            .map(|t| t.cursor.leftover_ms())
            .chain(self.active.next_expiry())
            .min_by(f64::total_cmp)
    }

    fn elapse(&mut self, elapsed_ms: f64) {
        for track in &mut self.tracks {
            track.cursor.consume(elapsed_ms);
        }
        self.active.age(elapsed_ms);
    }
}
