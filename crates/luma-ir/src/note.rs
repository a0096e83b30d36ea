//! Notes and rests.

use core::fmt;

use crate::scale::{resolve_pitch, Scale, MAX_PITCH};
use crate::tempo::Tempo;

/// Default velocity for notes built without an explicit one.
pub const DEFAULT_VELOCITY: u8 = 100;

/// A position in a scale: which table, which octave, which degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PitchClass {
    pub scale: Scale,
    /// Octave in scientific pitch notation (4 = middle C octave)
    pub octave: i8,
    /// Zero-based index into the scale table
    pub degree: i32,
}

impl PitchClass {
    pub const fn new(scale: Scale, octave: i8, degree: i32) -> Self {
        Self { scale, octave, degree }
    }

    /// Absolute pitch number (C4 = 60).
    pub fn pitch(self) -> u8 {
        resolve_pitch(self.scale, self.octave, self.degree)
    }
}

/// A pitched note or a rest, with a duration in beats.
///
/// Notes are immutable values; the absolute pitch is resolved once at
/// construction so playback never touches the scale tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pitch_class: Option<PitchClass>,
    pitch: Option<u8>,
    velocity: u8,
    duration_beats: f64,
}

impl Note {
    /// A note at a scale position.
    pub fn new(pitch_class: PitchClass, velocity: u8, duration_beats: f64) -> Self {
        Self {
            pitch_class: Some(pitch_class),
            pitch: Some(pitch_class.pitch()),
            velocity: velocity.min(MAX_PITCH),
            duration_beats: sanitize_beats(duration_beats),
        }
    }

    /// A note at an absolute pitch number, bypassing the scale tables.
    pub fn from_pitch(pitch: u8, velocity: u8, duration_beats: f64) -> Self {
        Self {
            pitch_class: None,
            pitch: Some(pitch.min(MAX_PITCH)),
            velocity: velocity.min(MAX_PITCH),
            duration_beats: sanitize_beats(duration_beats),
        }
    }

    /// Silence for `duration_beats`.
    pub fn rest(duration_beats: f64) -> Self {
        Self {
            pitch_class: None,
            pitch: None,
            velocity: 0,
            duration_beats: sanitize_beats(duration_beats),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    /// Absolute pitch, `None` for rests.
    pub fn pitch(&self) -> Option<u8> {
        self.pitch
    }

    pub fn pitch_class(&self) -> Option<PitchClass> {
        self.pitch_class
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn duration_beats(&self) -> f64 {
        self.duration_beats
    }

    /// Duration in milliseconds at the given tempo.
    pub fn duration_ms(&self, tempo: Tempo) -> f64 {
        tempo.beats_to_ms(self.duration_beats)
    }

    /// Duration in sample frames at the given tempo and sample rate.
    pub fn length_frames(&self, tempo: Tempo, sample_rate: u32) -> u32 {
        (self.duration_ms(tempo) / 1000.0 * sample_rate as f64) as u32
    }
}

fn sanitize_beats(beats: f64) -> f64 {
    if beats.is_finite() && beats >= 0.0 {
        beats
    } else {
        log::warn!("invalid note duration {} beats, using 0", beats);
        0.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.pitch_class, self.pitch) {
            (_, None) => write!(f, "rest {}", self.duration_beats),
            (Some(pc), Some(_)) => write!(
                f,
                "{} {} {} {} {}",
                pc.scale, pc.octave, pc.degree, self.velocity, self.duration_beats
            ),
            (None, Some(pitch)) => {
                write!(f, "pitch {} {} {}", pitch, self.velocity, self.duration_beats)
            }
        }
    }
}
