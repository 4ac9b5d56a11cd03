//! Static template data: the abstract chord, scale, interval and cadence shapes
//! that catalogs supply and resolvers turn into spelled notes.

use crate::types::note::Tonality;
use crate::types::pitch::Accidental;
use std::collections::BTreeSet;
use std::fmt;

/// Difficulty tier of a template, ordered from easiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

/// Function of a tone within a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Root,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
}

impl Role {
    /// Scale degree above the root (Root = 1, Ninth = 9...).
    pub fn degree(self) -> u8 {
        match self {
            Role::Root => 1,
            Role::Second => 2,
            Role::Third => 3,
            Role::Fourth => 4,
            Role::Fifth => 5,
            Role::Sixth => 6,
            Role::Seventh => 7,
            Role::Ninth => 9,
            Role::Eleventh => 11,
            Role::Thirteenth => 13,
        }
    }

    /// Rank used to break ties between equally close resolution targets.
    pub fn resolution_priority(self) -> u8 {
        match self {
            Role::Third => 0,
            Role::Seventh => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Root => "Root",
            Role::Second => "2nd",
            Role::Third => "3rd",
            Role::Fourth => "4th",
            Role::Fifth => "5th",
            Role::Sixth => "6th",
            Role::Seventh => "7th",
            Role::Ninth => "9th",
            Role::Eleventh => "11th",
            Role::Thirteenth => "13th",
        };
        f.write_str(name)
    }
}

/// One tone of a chord template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordToneTemplate {
    pub role: Role,
    pub semitone_offset: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_altered: bool,
    /// Spelling fixed by jazz convention regardless of key (b9 flat, #11 sharp).
    #[cfg_attr(feature = "serde", serde(default))]
    pub forced_accidental: Option<Accidental>,
}

impl ChordToneTemplate {
    pub fn new(role: Role, semitone_offset: u8) -> Self {
        ChordToneTemplate {
            role,
            semitone_offset,
            is_altered: false,
            forced_accidental: None,
        }
    }

    pub fn altered(role: Role, semitone_offset: u8, forced: Accidental) -> Self {
        ChordToneTemplate {
            role,
            semitone_offset,
            is_altered: true,
            forced_accidental: Some(forced),
        }
    }
}

/// An abstract chord quality such as `m7` or `7b9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordTemplate {
    pub symbol: String,
    pub name: String,
    pub tones: Vec<ChordToneTemplate>,
    pub difficulty: Difficulty,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tonality: Tonality,
}

impl ChordTemplate {
    pub fn new(symbol: &str, name: &str, difficulty: Difficulty) -> Self {
        ChordTemplate {
            symbol: symbol.to_string(),
            name: name.to_string(),
            tones: Vec::new(),
            difficulty,
            tonality: Tonality::Major,
        }
    }

    pub fn minor(mut self) -> Self {
        self.tonality = Tonality::Minor;
        self
    }

    pub fn tone(mut self, role: Role, semitone_offset: u8) -> Self {
        self.tones.push(ChordToneTemplate::new(role, semitone_offset));
        self
    }

    pub fn altered_tone(mut self, role: Role, semitone_offset: u8, forced: Accidental) -> Self {
        self.tones
            .push(ChordToneTemplate::altered(role, semitone_offset, forced));
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.tones.iter().any(|t| t.role == role)
    }

    /// Offsets reduced mod 12: the interval profile used to compare qualities.
    pub fn profile(&self) -> BTreeSet<u8> {
        self.tones.iter().map(|t| t.semitone_offset % 12).collect()
    }

    /// Number of offsets present in one profile but not the other.
    pub fn profile_distance(&self, other: &ChordTemplate) -> usize {
        self.profile().symmetric_difference(&other.profile()).count()
    }
}

/// An abstract scale: ascending semitone offsets from the root.
///
/// A trailing offset of 12 marks an included octave degree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleTemplate {
    pub symbol: String,
    pub name: String,
    pub offsets: Vec<u8>,
    pub difficulty: Difficulty,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tonality: Tonality,
}

impl ScaleTemplate {
    pub fn new(symbol: &str, name: &str, offsets: &[u8], difficulty: Difficulty) -> Self {
        ScaleTemplate {
            symbol: symbol.to_string(),
            name: name.to_string(),
            offsets: offsets.to_vec(),
            difficulty,
            tonality: Tonality::Major,
        }
    }

    pub fn minor(mut self) -> Self {
        self.tonality = Tonality::Minor;
        self
    }

    pub fn has_octave(&self) -> bool {
        self.offsets.len() > 1 && self.offsets.last() == Some(&12)
    }
}

/// An interval above a root: semitone size plus letter distance (m3 = 3 semitones, 2 steps).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalTemplate {
    pub symbol: String,
    pub name: String,
    pub semitones: u8,
    pub steps: u8,
    pub difficulty: Difficulty,
}

impl IntervalTemplate {
    pub fn new(symbol: &str, name: &str, semitones: u8, steps: u8, difficulty: Difficulty) -> Self {
        IntervalTemplate {
            symbol: symbol.to_string(),
            name: name.to_string(),
            semitones,
            steps,
            difficulty,
        }
    }
}

/// One position of a cadence: a function label, its chord quality, and the
/// root's distance in semitones above the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceStep {
    pub function_label: String,
    pub chord: ChordTemplate,
    pub offset_from_key: u8,
}

impl CadenceStep {
    pub fn new(function_label: &str, chord: ChordTemplate, offset_from_key: u8) -> Self {
        CadenceStep {
            function_label: function_label.to_string(),
            chord,
            offset_from_key,
        }
    }

    /// Scale degree named by the roman numeral in the label.
    ///
    /// Accidentals and quality marks are ignored (`bII7` is 2, `iiø` is 2) and
    /// secondary functions compound (`V/V` is 9, i.e. the second degree's letter).
    pub fn degree(&self) -> Option<u8> {
        let mut total = 0u8;
        for part in self.function_label.split('/') {
            let degree = roman_degree(part)?;
            total = if total == 0 {
                degree
            } else {
                total.checked_add(degree - 1)?
            };
        }
        Some(total)
    }
}

fn roman_degree(label: &str) -> Option<u8> {
    let numeral: String = label
        .trim_start_matches(['b', '#', '♭', '♯'])
        .chars()
        .take_while(|c| matches!(c, 'I' | 'V' | 'i' | 'v'))
        .collect();
    match numeral.to_uppercase().as_str() {
        "I" => Some(1),
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        "V" => Some(5),
        "VI" => Some(6),
        "VII" => Some(7),
        _ => None,
    }
}

/// An ordered harmonic formula such as ii-V-I.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceTemplate {
    pub symbol: String,
    pub name: String,
    pub steps: Vec<CadenceStep>,
    pub difficulty: Difficulty,
}

impl CadenceTemplate {
    pub fn new(symbol: &str, name: &str, difficulty: Difficulty) -> Self {
        CadenceTemplate {
            symbol: symbol.to_string(),
            name: name.to_string(),
            steps: Vec::new(),
            difficulty,
        }
    }

    pub fn step(mut self, function_label: &str, chord: ChordTemplate, offset_from_key: u8) -> Self {
        self.steps
            .push(CadenceStep::new(function_label, chord, offset_from_key));
        self
    }

    /// Copy with `chord` placed at every position labelled `function_label`.
    ///
    /// This is how extended dominant variants (V7b9, V7alt...) are selected.
    pub fn with_substitution(&self, function_label: &str, chord: &ChordTemplate) -> Self {
        let mut substituted = self.clone();
        for step in substituted
            .steps
            .iter_mut()
            .filter(|s| s.function_label == function_label)
        {
            step.chord = chord.clone();
        }
        substituted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dominant() -> ChordTemplate {
        ChordTemplate::new("7", "dominant seventh", Difficulty::Beginner)
            .tone(Role::Root, 0)
            .tone(Role::Third, 4)
            .tone(Role::Fifth, 7)
            .tone(Role::Seventh, 10)
    }

    #[test]
    fn test_profile_distance() {
        let maj7 = ChordTemplate::new("maj7", "major seventh", Difficulty::Beginner)
            .tone(Role::Root, 0)
            .tone(Role::Third, 4)
            .tone(Role::Fifth, 7)
            .tone(Role::Seventh, 11);
        let b9 = dominant().altered_tone(Role::Ninth, 13, Accidental::Flat);
        assert_eq!(dominant().profile_distance(&maj7), 2);
        assert_eq!(dominant().profile_distance(&b9), 1);
        assert_eq!(b9.profile(), [0, 1, 4, 7, 10].into_iter().collect());
    }

    #[test]
    fn test_roman_degrees() {
        let chord = dominant();
        let degree = |label: &str| CadenceStep::new(label, chord.clone(), 0).degree();
        assert_eq!(degree("I"), Some(1));
        assert_eq!(degree("ii"), Some(2));
        assert_eq!(degree("V7"), Some(5));
        assert_eq!(degree("iiø"), Some(2));
        assert_eq!(degree("bII7"), Some(2));
        assert_eq!(degree("#iv"), Some(4));
        assert_eq!(degree("vii°"), Some(7));
        assert_eq!(degree("V/V"), Some(9));
        assert_eq!(degree("V/ii"), Some(6));
        assert_eq!(degree("tonic"), None);

        // Chained secondaries past u8 range give up rather than wrap.
        let chain = vec!["V"; 64].join("/");
        assert_eq!(degree(&chain), None);
    }

    #[test]
    fn test_substitution_only_touches_matching_label() {
        let b9 = dominant()
            .altered_tone(Role::Ninth, 13, Accidental::Flat);
        let cadence = CadenceTemplate::new("V-I", "authentic", Difficulty::Beginner)
            .step("V", dominant(), 7)
            .step("I", dominant(), 0);
        let substituted = cadence.with_substitution("V", &b9);
        assert_eq!(substituted.steps[0].chord, b9);
        assert_eq!(substituted.steps[1].chord, dominant());
        assert_eq!(cadence.steps[0].chord, dominant());
    }

    #[test]
    fn test_scale_octave_detection() {
        let ionian = ScaleTemplate::new("ionian", "major", &[0, 2, 4, 5, 7, 9, 11, 12], Difficulty::Beginner);
        assert!(ionian.has_octave());
        let pentatonic = ScaleTemplate::new("pent", "major pentatonic", &[0, 2, 4, 7, 9], Difficulty::Beginner);
        assert!(!pentatonic.has_octave());
    }
}
