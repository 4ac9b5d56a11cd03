//! Mod-12 pitch-class arithmetic plus the letter and accidental vocabulary
//! used to spell pitch classes.

use crate::error::{DrillError, Result};
use std::fmt;

/// A chromatic pitch class, 0=C through 11=B. Always reduced mod 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct PitchClass(u8);

impl PitchClass {
    /// Validate a raw integer. Anything outside 0-11 is rejected rather than wrapped.
    pub fn new(value: i32) -> Result<Self> {
        if (0..12).contains(&value) {
            Ok(PitchClass(value as u8))
        } else {
            Err(DrillError::InvalidPitchClass(value))
        }
    }

    /// Reduce any integer into a pitch class.
    pub fn wrapping(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    /// Pitch class of a MIDI note number.
    pub fn from_midi(midi: u8) -> Self {
        PitchClass(midi % 12)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::wrapping(self.0 as i32 + semitones)
    }

    /// Ascending interval from `self` up to `other`, 0-11.
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Nearest signed motion from `self` to `other`, in -6..=5.
    ///
    /// A tritone is reported as -6: when both directions are equally short the
    /// downward one wins.
    pub fn signed_distance_to(self, other: PitchClass) -> i8 {
        let up = self.interval_to(other) as i8;
        if up >= 6 {
            up - 12
        } else {
            up
        }
    }

    /// White-key pitch classes.
    pub fn is_natural(self) -> bool {
        matches!(self.0, 0 | 2 | 4 | 5 | 7 | 9 | 11)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = DrillError;

    fn try_from(value: u8) -> Result<Self> {
        PitchClass::new(value as i32)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

/// The seven letter names, in scale order starting from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

const LETTERS: [Letter; 7] = [
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
    Letter::A,
    Letter::B,
];

impl Letter {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class of the letter without accidental.
    pub fn natural_pitch_class(self) -> PitchClass {
        PitchClass(match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        })
    }

    /// Letter `steps` above this one (negative steps go down).
    pub fn step(self, steps: i32) -> Letter {
        LETTERS[(self.index() as i32 + steps).rem_euclid(7) as usize]
    }

    /// The letter whose natural pitch class is `pc`, if `pc` is a white key.
    pub fn from_natural(pc: PitchClass) -> Option<Letter> {
        LETTERS
            .iter()
            .copied()
            .find(|letter| letter.natural_pitch_class() == pc)
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        };
        f.write_str(name)
    }
}

/// Accidental attached to a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Semitone alteration applied to the letter.
    pub fn alteration(self) -> i8 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn from_alteration(alteration: i8) -> Option<Accidental> {
        match alteration {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// The same direction, doubled. Naturals and doubles stay as they are.
    pub fn doubled(self) -> Accidental {
        match self {
            Accidental::Flat => Accidental::DoubleFlat,
            Accidental::Sharp => Accidental::DoubleSharp,
            other => other,
        }
    }

    /// True when the two accidentals point in opposite directions.
    pub fn opposes(self, other: Accidental) -> bool {
        self.alteration().signum() * other.alteration().signum() < 0
    }

    /// ASCII suffix used in note names.
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_validation() {
        assert_eq!(PitchClass::new(0).unwrap().value(), 0);
        assert_eq!(PitchClass::new(11).unwrap().value(), 11);
        assert_eq!(PitchClass::new(12), Err(DrillError::InvalidPitchClass(12)));
        assert_eq!(PitchClass::new(-1), Err(DrillError::InvalidPitchClass(-1)));
    }

    #[test]
    fn test_wrapping_and_transpose() {
        assert_eq!(PitchClass::wrapping(-1).value(), 11);
        assert_eq!(PitchClass::wrapping(25).value(), 1);
        assert_eq!(PitchClass::wrapping(11).transpose(1).value(), 0);
        assert_eq!(PitchClass::wrapping(0).transpose(-14).value(), 10);
        assert_eq!(PitchClass::from_midi(60).value(), 0);
        assert_eq!(PitchClass::from_midi(71).value(), 11);
    }

    #[test]
    fn test_intervals() {
        let c = PitchClass::wrapping(0);
        let g = PitchClass::wrapping(7);
        assert_eq!(c.interval_to(g), 7);
        assert_eq!(g.interval_to(c), 5);
        assert_eq!(c.signed_distance_to(g), -5);
        assert_eq!(g.signed_distance_to(c), 5);
        assert_eq!(c.signed_distance_to(c), 0);
        // Tritone resolves downward
        assert_eq!(c.signed_distance_to(PitchClass::wrapping(6)), -6);
        assert_eq!(PitchClass::wrapping(6).signed_distance_to(c), -6);
    }

    #[test]
    fn test_letter_steps() {
        assert_eq!(Letter::C.step(2), Letter::E);
        assert_eq!(Letter::A.step(2), Letter::C);
        assert_eq!(Letter::C.step(-1), Letter::B);
        assert_eq!(Letter::D.step(12), Letter::B); // 13th of D
        assert_eq!(Letter::from_natural(PitchClass::wrapping(5)), Some(Letter::F));
        assert_eq!(Letter::from_natural(PitchClass::wrapping(6)), None);
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(Accidental::from_alteration(-2), Some(Accidental::DoubleFlat));
        assert_eq!(Accidental::from_alteration(3), None);
        assert_eq!(Accidental::Flat.doubled(), Accidental::DoubleFlat);
        assert_eq!(Accidental::Natural.doubled(), Accidental::Natural);
        assert!(Accidental::Flat.opposes(Accidental::Sharp));
        assert!(!Accidental::Flat.opposes(Accidental::Natural));
        assert!(!Accidental::Flat.opposes(Accidental::DoubleFlat));
    }
}
