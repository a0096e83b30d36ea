//! Scale tables and pitch resolution.

use core::fmt;

/// Highest MIDI pitch number.
pub const MAX_PITCH: u8 = 127;

/// Degrees per scale table.
pub const DEGREES_PER_SCALE: usize = 7;

const C_MAJOR: [u8; DEGREES_PER_SCALE] = [0, 2, 4, 5, 7, 9, 11];
const C_MINOR: [u8; DEGREES_PER_SCALE] = [0, 2, 3, 5, 7, 8, 10];

/// A named scale table mapping degrees to semitone offsets from C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scale {
    /// C major (ionian)
    CMajor,
    /// C natural minor (aeolian)
    CMinor,
}

impl Scale {
    /// Every scale, in table order.
    pub const ALL: [Scale; 2] = [Scale::CMajor, Scale::CMinor];

    /// Short name, as written in pattern sources (`cmaj`, `cmin`).
    pub const fn name(self) -> &'static str {
        match self {
            Scale::CMajor => "cmaj",
            Scale::CMinor => "cmin",
        }
    }

    /// Look a scale up by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Semitone offsets for each degree.
    pub const fn intervals(self) -> &'static [u8; DEGREES_PER_SCALE] {
        match self {
            Scale::CMajor => &C_MAJOR,
            Scale::CMinor => &C_MINOR,
        }
    }

    /// Semitone offset of a zero-based degree, or `None` if it is outside the table.
    pub fn semitone(self, degree: i32) -> Option<u8> {
        usize::try_from(degree)
            .ok()
            .and_then(|d| self.intervals().get(d).copied())
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a scale position to an absolute pitch (C4 = 60).
///
/// Degrees outside the scale table fall back to the octave root; the
/// result is clamped into `0..=MAX_PITCH`.
pub fn resolve_pitch(scale: Scale, octave: i8, degree: i32) -> u8 {
    let offset = match scale.semitone(degree) {
        Some(offset) => offset,
        None => {
            log::debug!("degree {} out of range for {}, using octave root", degree, scale);
            0
        }
    };
    let pitch = (octave as i32 + 1) * 12 + offset as i32;
    pitch.clamp(0, MAX_PITCH as i32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for scale in Scale::ALL {
            assert_eq!(Scale::from_name(scale.name()), Some(scale));
        }
        assert_eq!(Scale::from_name("dorian"), None);
    }

    #[test]
    fn c4_is_sixty() {
        assert_eq!(resolve_pitch(Scale::CMajor, 4, 0), 60);
        assert_eq!(resolve_pitch(Scale::CMinor, 4, 0), 60);
    }

    #[test]
    fn minor_third_differs_from_major() {
        assert_eq!(resolve_pitch(Scale::CMajor, 4, 2), 64);
        assert_eq!(resolve_pitch(Scale::CMinor, 4, 2), 63);
    }

    #[test]
    fn out_of_range_degree_falls_back_to_root() {
        assert_eq!(resolve_pitch(Scale::CMajor, 3, 7), 48);
        assert_eq!(resolve_pitch(Scale::CMajor, 3, -1), 48);
        assert_eq!(resolve_pitch(Scale::CMinor, 3, i32::MAX), 48);
    }

    #[test]
    fn extreme_octaves_clamp() {
        assert_eq!(resolve_pitch(Scale::CMajor, -5, 0), 0);
        assert_eq!(resolve_pitch(Scale::CMajor, 12, 6), MAX_PITCH);
    }
}
