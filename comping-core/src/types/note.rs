use crate::error::{DrillError, Result};
use crate::types::pitch::{Accidental, Letter, PitchClass};
use std::fmt;
use std::str::FromStr;

/// A spelled, octave-agnostic note: a letter plus an accidental.
///
/// The pitch class is always derived from the spelling, so the name and the
/// pitch class can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    letter: Letter,
    accidental: Accidental,
}

impl Note {
    pub fn new(letter: Letter, accidental: Accidental) -> Self {
        Note { letter, accidental }
    }

    pub fn natural(letter: Letter) -> Self {
        Note::new(letter, Accidental::Natural)
    }

    /// Spell `pc` on a given letter, if it is reachable with at most a double accidental.
    pub fn on_letter(letter: Letter, pc: PitchClass) -> Option<Self> {
        let alteration = letter.natural_pitch_class().signed_distance_to(pc);
        // signed_distance_to reports the tritone as -6; neither side is spellable anyway.
        Accidental::from_alteration(alteration).map(|accidental| Note::new(letter, accidental))
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.letter
            .natural_pitch_class()
            .transpose(self.accidental.alteration() as i32)
    }

    pub fn display_name(&self) -> String {
        self.to_string()
    }

    /// Same sounding pitch class, regardless of spelling.
    pub fn is_enharmonic(&self, other: &Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }
}

impl FromStr for Note {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| DrillError::InvalidNoteName(s.to_string()))?;

        let mut alteration: i8 = 0;
        let mut saw_sharp = false;
        let mut saw_flat = false;
        for c in chars {
            match c {
                '#' | '♯' => {
                    alteration += 1;
                    saw_sharp = true;
                }
                'x' | 'X' | '𝄪' => {
                    alteration += 2;
                    saw_sharp = true;
                }
                'b' | '♭' => {
                    alteration -= 1;
                    saw_flat = true;
                }
                '𝄫' => {
                    alteration -= 2;
                    saw_flat = true;
                }
                '♮' => {}
                _ => return Err(DrillError::InvalidNoteName(s.to_string())),
            }
        }

        if saw_sharp && saw_flat {
            return Err(DrillError::InvalidNoteName(s.to_string()));
        }

        let accidental = Accidental::from_alteration(alteration)
            .ok_or_else(|| DrillError::InvalidNoteName(s.to_string()))?;
        Ok(Note::new(letter, accidental))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental.symbol())
    }
}

/// Whether a template describes a major-ish or minor-ish sonority.
///
/// Only used to pick the key signature a natural root is spelled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tonality {
    #[default]
    Major,
    Minor,
}

/// Sharp-vs-flat spelling convention for one root or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TonalContext {
    pub prefer_sharps: bool,
}

/// Conventional major key signatures: positive counts are sharps, negative flats.
const KEY_SIGNATURES: [(Letter, Accidental, i8); 15] = [
    (Letter::C, Accidental::Natural, 0),
    (Letter::G, Accidental::Natural, 1),
    (Letter::D, Accidental::Natural, 2),
    (Letter::A, Accidental::Natural, 3),
    (Letter::E, Accidental::Natural, 4),
    (Letter::B, Accidental::Natural, 5),
    (Letter::F, Accidental::Sharp, 6),
    (Letter::C, Accidental::Sharp, 7),
    (Letter::F, Accidental::Natural, -1),
    (Letter::B, Accidental::Flat, -2),
    (Letter::E, Accidental::Flat, -3),
    (Letter::A, Accidental::Flat, -4),
    (Letter::D, Accidental::Flat, -5),
    (Letter::G, Accidental::Flat, -6),
    (Letter::C, Accidental::Flat, -7),
];

/// Number of sharps (positive) or flats (negative) in the major key on `tonic`.
pub fn key_signature(tonic: &Note) -> Option<i8> {
    KEY_SIGNATURES
        .iter()
        .find(|(letter, accidental, _)| *letter == tonic.letter && *accidental == tonic.accidental)
        .map(|(_, _, count)| *count)
}

impl TonalContext {
    pub fn sharps() -> Self {
        TonalContext {
            prefer_sharps: true,
        }
    }

    pub fn flats() -> Self {
        TonalContext {
            prefer_sharps: false,
        }
    }

    /// Context for a root as seen by a template of the given tonality.
    ///
    /// An accidental on the root decides directly. A natural root looks up the
    /// key signature of its major key, or of its relative major for minor
    /// templates, and defaults to sharps when the table has no entry.
    pub fn for_root(root: &Note, tonality: Tonality) -> Self {
        match root.accidental().alteration().signum() {
            1 => return Self::sharps(),
            -1 => return Self::flats(),
            _ => {}
        }

        let tonic = match tonality {
            Tonality::Major => Some(*root),
            Tonality::Minor => Note::on_letter(root.letter().step(2), root.pitch_class().transpose(3)),
        };

        match tonic.as_ref().and_then(key_signature) {
            Some(count) => TonalContext {
                prefer_sharps: count >= 0,
            },
            None => Self::sharps(),
        }
    }

    /// The single accidental this context spells black keys with.
    pub fn accidental(&self) -> Accidental {
        if self.prefer_sharps {
            Accidental::Sharp
        } else {
            Accidental::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str) -> Note {
        name.parse().unwrap()
    }

    #[test]
    fn test_note_parsing() {
        assert_eq!(note("C").pitch_class().value(), 0);
        assert_eq!(note("c#").pitch_class().value(), 1);
        assert_eq!(note("Db").pitch_class().value(), 1);
        assert_eq!(note("Bb").pitch_class().value(), 10);
        assert_eq!(note("bb").pitch_class().value(), 10);
        assert_eq!(note("Cb").pitch_class().value(), 11);
        assert_eq!(note("E#").pitch_class().value(), 5);
        assert_eq!(note("Bbb").pitch_class().value(), 9);
        assert_eq!(note("Fx").pitch_class().value(), 7);
        assert_eq!(note("F##").pitch_class().value(), 7);
        assert_eq!(note("E♭").pitch_class().value(), 3);
        assert_eq!(note(" G ").pitch_class().value(), 7);
    }

    #[test]
    fn test_invalid_note_names() {
        for bad in ["", "H", "C#b", "Cbbb", "C4", "#"] {
            assert!(
                matches!(bad.parse::<Note>(), Err(DrillError::InvalidNoteName(_))),
                "expected `{}` to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_note_display_round_trip() {
        for name in ["C", "F#", "Bb", "Ebb", "G##", "Cb", "B#"] {
            let parsed = note(name);
            assert_eq!(parsed.to_string(), name);
            assert_eq!(note(&parsed.display_name()).pitch_class(), parsed.pitch_class());
        }
    }

    #[test]
    fn test_on_letter() {
        let pc = PitchClass::wrapping(4);
        assert_eq!(Note::on_letter(Letter::F, pc), Some(note("Fb")));
        assert_eq!(Note::on_letter(Letter::D, pc), Some(note("D##")));
        assert_eq!(Note::on_letter(Letter::A, pc), None);
        assert!(note("Fb").is_enharmonic(&note("E")));
    }

    #[test]
    fn test_key_signatures() {
        assert_eq!(key_signature(&note("C")), Some(0));
        assert_eq!(key_signature(&note("F")), Some(-1));
        assert_eq!(key_signature(&note("Gb")), Some(-6));
        assert_eq!(key_signature(&note("F#")), Some(6));
        assert_eq!(key_signature(&note("D#")), None);
    }

    #[test]
    fn test_tonal_context_for_root() {
        let major = Tonality::Major;
        assert!(TonalContext::for_root(&note("C"), major).prefer_sharps);
        assert!(TonalContext::for_root(&note("G"), major).prefer_sharps);
        assert!(!TonalContext::for_root(&note("F"), major).prefer_sharps);
        assert!(!TonalContext::for_root(&note("Bb"), major).prefer_sharps);
        assert!(TonalContext::for_root(&note("F#"), major).prefer_sharps);
        assert!(!TonalContext::for_root(&note("Gb"), major).prefer_sharps);
        // Enharmonic roots follow the caller's spelling
        assert!(TonalContext::for_root(&note("D#"), major).prefer_sharps);
        assert!(!TonalContext::for_root(&note("Eb"), major).prefer_sharps);
    }

    #[test]
    fn test_tonal_context_minor_uses_relative_major() {
        let minor = Tonality::Minor;
        assert!(!TonalContext::for_root(&note("D"), minor).prefer_sharps); // F major
        assert!(!TonalContext::for_root(&note("G"), minor).prefer_sharps); // Bb major
        assert!(!TonalContext::for_root(&note("C"), minor).prefer_sharps); // Eb major
        assert!(TonalContext::for_root(&note("E"), minor).prefer_sharps); // G major
        assert!(TonalContext::for_root(&note("A"), minor).prefer_sharps); // C major
    }
}
