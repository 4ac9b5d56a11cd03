//! Read-only template catalogs.
//!
//! A [`Catalog`] is plain data handed to the question generator. Lookups return
//! results so a missing template is a recoverable condition, never a panic.
//! [`Catalog::jazz_standard`] is the built-in vocabulary; with the `serde`
//! feature a catalog can also be loaded from JSON.

use crate::error::{DrillError, Result};
use crate::types::{
    Accidental, CadenceTemplate, ChordTemplate, Difficulty, IntervalTemplate, Letter, Note, Role,
    ScaleTemplate,
};

/// A root or key offered to drills, tiered like templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootEntry {
    pub note: Note,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub chords: Vec<ChordTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scales: Vec<ScaleTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub intervals: Vec<IntervalTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cadences: Vec<CadenceTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub roots: Vec<RootEntry>,
    /// Chord symbols that may replace the dominant of a cadence.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dominant_variants: Vec<String>,
}

impl Catalog {
    pub fn chord(&self, symbol: &str) -> Result<&ChordTemplate> {
        self.chords
            .iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| DrillError::UnknownTemplate(format!("chord {}", symbol)))
    }

    pub fn scale(&self, symbol: &str) -> Result<&ScaleTemplate> {
        self.scales
            .iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| DrillError::UnknownTemplate(format!("scale {}", symbol)))
    }

    pub fn interval(&self, symbol: &str) -> Result<&IntervalTemplate> {
        self.intervals
            .iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| DrillError::UnknownTemplate(format!("interval {}", symbol)))
    }

    pub fn cadence(&self, symbol: &str) -> Result<&CadenceTemplate> {
        self.cadences
            .iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| DrillError::UnknownTemplate(format!("cadence {}", symbol)))
    }

    /// Dominant variants that resolve to real chord templates.
    pub fn dominant_variant_templates(&self) -> Vec<&ChordTemplate> {
        self.dominant_variants
            .iter()
            .filter_map(|symbol| self.chord(symbol).ok())
            .collect()
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DrillError::CatalogFormat(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DrillError::CatalogFormat(e.to_string()))
    }

    /// The built-in jazz vocabulary.
    pub fn jazz_standard() -> Self {
        let chords = standard_chords();
        let cadences = standard_cadences(&chords);
        Catalog {
            chords,
            scales: standard_scales(),
            intervals: standard_intervals(),
            cadences,
            roots: standard_roots(),
            dominant_variants: ["7", "9", "13", "7b9", "7#9", "7alt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn standard_chords() -> Vec<ChordTemplate> {
    use Difficulty::*;
    use Role::*;

    let triad = |symbol: &str, name: &str, third: u8, fifth: u8, difficulty| {
        ChordTemplate::new(symbol, name, difficulty)
            .tone(Root, 0)
            .tone(Third, third)
            .tone(Fifth, fifth)
    };
    let seventh = |symbol: &str, name: &str, third: u8, fifth: u8, seventh: u8, difficulty| {
        triad(symbol, name, third, fifth, difficulty).tone(Seventh, seventh)
    };

    vec![
        triad("", "major triad", 4, 7, Beginner),
        triad("m", "minor triad", 3, 7, Beginner).minor(),
        triad("dim", "diminished triad", 3, 6, Intermediate).minor(),
        triad("aug", "augmented triad", 4, 8, Intermediate),
        ChordTemplate::new("sus4", "suspended fourth", Intermediate)
            .tone(Root, 0)
            .tone(Fourth, 5)
            .tone(Fifth, 7),
        seventh("maj7", "major seventh", 4, 7, 11, Beginner),
        seventh("m7", "minor seventh", 3, 7, 10, Beginner).minor(),
        seventh("7", "dominant seventh", 4, 7, 10, Beginner),
        seventh("m7b5", "half-diminished seventh", 3, 6, 10, Intermediate).minor(),
        seventh("dim7", "diminished seventh", 3, 6, 9, Intermediate).minor(),
        seventh("mMaj7", "minor-major seventh", 3, 7, 11, Advanced).minor(),
        seventh("maj7#5", "augmented major seventh", 4, 8, 11, Advanced),
        triad("6", "major sixth", 4, 7, Intermediate).tone(Sixth, 9),
        triad("m6", "minor sixth", 3, 7, Intermediate).minor().tone(Sixth, 9),
        ChordTemplate::new("7sus4", "dominant seventh suspended", Intermediate)
            .tone(Root, 0)
            .tone(Fourth, 5)
            .tone(Fifth, 7)
            .tone(Seventh, 10),
        seventh("9", "dominant ninth", 4, 7, 10, Intermediate).tone(Ninth, 14),
        seventh("maj9", "major ninth", 4, 7, 11, Intermediate).tone(Ninth, 14),
        seventh("m9", "minor ninth", 3, 7, 10, Intermediate)
            .minor()
            .tone(Ninth, 14),
        seventh("13", "dominant thirteenth", 4, 7, 10, Advanced)
            .tone(Ninth, 14)
            .tone(Thirteenth, 21),
        seventh("7b9", "dominant flat nine", 4, 7, 10, Advanced).altered_tone(
            Ninth,
            13,
            Accidental::Flat,
        ),
        seventh("7#9", "dominant sharp nine", 4, 7, 10, Advanced).altered_tone(
            Ninth,
            15,
            Accidental::Sharp,
        ),
        seventh("maj7#11", "lydian major seventh", 4, 7, 11, Advanced).altered_tone(
            Eleventh,
            18,
            Accidental::Sharp,
        ),
        seventh("7b13", "dominant flat thirteen", 4, 7, 10, Expert).altered_tone(
            Thirteenth,
            20,
            Accidental::Flat,
        ),
        ChordTemplate::new("7alt", "altered dominant", Expert)
            .tone(Root, 0)
            .tone(Third, 4)
            .tone(Seventh, 10)
            .altered_tone(Ninth, 13, Accidental::Flat)
            .altered_tone(Ninth, 15, Accidental::Sharp)
            .altered_tone(Eleventh, 18, Accidental::Sharp)
            .altered_tone(Thirteenth, 20, Accidental::Flat),
    ]
}

fn standard_scales() -> Vec<ScaleTemplate> {
    use Difficulty::*;

    vec![
        ScaleTemplate::new("ionian", "Ionian (major)", &[0, 2, 4, 5, 7, 9, 11, 12], Beginner),
        ScaleTemplate::new("dorian", "Dorian", &[0, 2, 3, 5, 7, 9, 10, 12], Beginner).minor(),
        ScaleTemplate::new("mixolydian", "Mixolydian", &[0, 2, 4, 5, 7, 9, 10, 12], Beginner),
        ScaleTemplate::new("aeolian", "Aeolian (natural minor)", &[0, 2, 3, 5, 7, 8, 10, 12], Beginner)
            .minor(),
        ScaleTemplate::new("phrygian", "Phrygian", &[0, 1, 3, 5, 7, 8, 10, 12], Intermediate).minor(),
        ScaleTemplate::new("lydian", "Lydian", &[0, 2, 4, 6, 7, 9, 11, 12], Intermediate),
        ScaleTemplate::new("locrian", "Locrian", &[0, 1, 3, 5, 6, 8, 10, 12], Intermediate).minor(),
        ScaleTemplate::new("major-pentatonic", "major pentatonic", &[0, 2, 4, 7, 9], Beginner),
        ScaleTemplate::new("minor-pentatonic", "minor pentatonic", &[0, 3, 5, 7, 10], Beginner).minor(),
        ScaleTemplate::new("blues", "blues", &[0, 3, 5, 6, 7, 10], Intermediate).minor(),
        ScaleTemplate::new("melodic-minor", "melodic minor", &[0, 2, 3, 5, 7, 9, 11], Advanced).minor(),
        ScaleTemplate::new("harmonic-minor", "harmonic minor", &[0, 2, 3, 5, 7, 8, 11], Advanced).minor(),
        ScaleTemplate::new("lydian-dominant", "Lydian dominant", &[0, 2, 4, 6, 7, 9, 10], Advanced),
        ScaleTemplate::new("altered", "altered (super Locrian)", &[0, 1, 3, 4, 6, 8, 10], Expert),
        ScaleTemplate::new("bebop-dominant", "bebop dominant", &[0, 2, 4, 5, 7, 9, 10, 11], Advanced),
        ScaleTemplate::new("whole-tone", "whole tone", &[0, 2, 4, 6, 8, 10], Advanced),
        ScaleTemplate::new("half-whole", "half-whole diminished", &[0, 1, 3, 4, 6, 7, 9, 10], Expert),
        ScaleTemplate::new("whole-half", "whole-half diminished", &[0, 2, 3, 5, 6, 8, 9, 11], Expert),
    ]
}

fn standard_intervals() -> Vec<IntervalTemplate> {
    use Difficulty::*;

    vec![
        IntervalTemplate::new("m2", "minor second", 1, 1, Beginner),
        IntervalTemplate::new("M2", "major second", 2, 1, Beginner),
        IntervalTemplate::new("m3", "minor third", 3, 2, Beginner),
        IntervalTemplate::new("M3", "major third", 4, 2, Beginner),
        IntervalTemplate::new("P4", "perfect fourth", 5, 3, Beginner),
        IntervalTemplate::new("A4", "augmented fourth", 6, 3, Intermediate),
        IntervalTemplate::new("d5", "diminished fifth", 6, 4, Intermediate),
        IntervalTemplate::new("P5", "perfect fifth", 7, 4, Beginner),
        IntervalTemplate::new("A5", "augmented fifth", 8, 4, Advanced),
        IntervalTemplate::new("m6", "minor sixth", 8, 5, Intermediate),
        IntervalTemplate::new("M6", "major sixth", 9, 5, Intermediate),
        IntervalTemplate::new("d7", "diminished seventh", 9, 6, Advanced),
        IntervalTemplate::new("m7", "minor seventh", 10, 6, Intermediate),
        IntervalTemplate::new("M7", "major seventh", 11, 6, Intermediate),
        IntervalTemplate::new("P8", "octave", 12, 7, Beginner),
    ]
}

fn standard_cadences(chords: &[ChordTemplate]) -> Vec<CadenceTemplate> {
    use Difficulty::*;

    let chord = |symbol: &str| {
        chords
            .iter()
            .find(|t| t.symbol == symbol)
            .cloned()
            .unwrap_or_else(|| ChordTemplate::new(symbol, symbol, Expert))
    };

    vec![
        CadenceTemplate::new("V-I", "authentic cadence", Beginner)
            .step("V", chord("7"), 7)
            .step("I", chord("maj7"), 0),
        CadenceTemplate::new("ii-V-I", "major ii-V-I", Beginner)
            .step("ii", chord("m7"), 2)
            .step("V", chord("7"), 7)
            .step("I", chord("maj7"), 0),
        CadenceTemplate::new("iiø-V-i", "minor ii-V-i", Intermediate)
            .step("iiø", chord("m7b5"), 2)
            .step("V", chord("7b9"), 7)
            .step("i", chord("m7"), 0),
        CadenceTemplate::new("V/V-V-I", "secondary dominant", Intermediate)
            .step("V/V", chord("7"), 2)
            .step("V", chord("7"), 7)
            .step("I", chord("maj7"), 0),
        CadenceTemplate::new("I-vi-ii-V", "turnaround", Intermediate)
            .step("I", chord("maj7"), 0)
            .step("vi", chord("m7"), 9)
            .step("ii", chord("m7"), 2)
            .step("V", chord("7"), 7),
        CadenceTemplate::new("iii-VI-ii-V", "extended turnaround", Advanced)
            .step("iii", chord("m7"), 4)
            .step("VI", chord("7"), 9)
            .step("ii", chord("m7"), 2)
            .step("V", chord("7"), 7),
        CadenceTemplate::new("bII7-I", "tritone substitution", Advanced)
            .step("bII7", chord("7"), 1)
            .step("I", chord("maj7"), 0),
        CadenceTemplate::new("ii-bII7-I", "ii with tritone substitute", Advanced)
            .step("ii", chord("m7"), 2)
            .step("bII7", chord("7"), 1)
            .step("I", chord("maj7"), 0),
    ]
}

fn standard_roots() -> Vec<RootEntry> {
    use Accidental::*;
    use Difficulty::*;
    use Letter::*;

    [
        (C, Natural, Beginner),
        (F, Natural, Beginner),
        (G, Natural, Beginner),
        (B, Flat, Beginner),
        (D, Natural, Intermediate),
        (E, Flat, Intermediate),
        (A, Natural, Intermediate),
        (A, Flat, Intermediate),
        (E, Natural, Advanced),
        (D, Flat, Advanced),
        (B, Natural, Expert),
        (F, Sharp, Expert),
        (G, Flat, Expert),
    ]
    .into_iter()
    .map(|(letter, accidental, difficulty)| RootEntry {
        note: Note::new(letter, accidental),
        difficulty,
    })
    .collect()
}
