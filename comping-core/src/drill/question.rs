use crate::error::DrillError;
use crate::types::{
    CadenceProgression, Chord, Identified, Note, PitchClass, ResolutionPair, ResolvedInterval,
    Role, Scale, VoicingConstraint,
};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// What kind of entity a drill is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Topic {
    Chord,
    Scale,
    Interval,
    Cadence,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Chord, Topic::Scale, Topic::Interval, Topic::Cadence];

    /// Variants the generator can build for this topic.
    pub fn variants(self) -> &'static [Variant] {
        use Variant::*;
        match self {
            Topic::Chord => &[SingleTone, AllTones, AuralQuality, GuideTones],
            Topic::Scale => &[SingleTone, AllTones, AuralQuality],
            Topic::Interval => &[SingleTone, AuralQuality],
            Topic::Cadence => &[GuideTones, ResolutionTarget, SmoothVoicing],
        }
    }

    pub fn supports(self, variant: Variant) -> bool {
        self.variants().contains(&variant)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Chord => "chord",
            Topic::Scale => "scale",
            Topic::Interval => "interval",
            Topic::Cadence => "cadence",
        };
        f.write_str(name)
    }
}

impl FromStr for Topic {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chord" | "chords" => Ok(Topic::Chord),
            "scale" | "scales" => Ok(Topic::Scale),
            "interval" | "intervals" => Ok(Topic::Interval),
            "cadence" | "cadences" => Ok(Topic::Cadence),
            other => Err(DrillError::UnknownTopic(other.to_string())),
        }
    }
}

/// Question variant, each with its own correctness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Variant {
    SingleTone,
    AllTones,
    AuralQuality,
    GuideTones,
    ResolutionTarget,
    SmoothVoicing,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::SingleTone => "single-tone",
            Variant::AllTones => "all-tones",
            Variant::AuralQuality => "aural-quality",
            Variant::GuideTones => "guide-tones",
            Variant::ResolutionTarget => "resolution-target",
            Variant::SmoothVoicing => "smooth-voicing",
        };
        f.write_str(name)
    }
}

impl FromStr for Variant {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "single-tone" | "single" | "tone" => Ok(Variant::SingleTone),
            "all-tones" | "all" | "spell" => Ok(Variant::AllTones),
            "aural-quality" | "aural" | "quality" => Ok(Variant::AuralQuality),
            "guide-tones" | "guide" => Ok(Variant::GuideTones),
            "resolution-target" | "resolution" | "resolve" => Ok(Variant::ResolutionTarget),
            "smooth-voicing" | "voicing" | "smooth" => Ok(Variant::SmoothVoicing),
            _ => Err(DrillError::UnknownVariant(s.trim().to_string())),
        }
    }
}

/// How much help was consumed before answering, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HintLevel {
    #[default]
    None,
    Formula,
    Interval,
    FirstNote,
}

impl HintLevel {
    /// The level after this one, saturating at `FirstNote`.
    pub fn next(self) -> HintLevel {
        match self {
            HintLevel::None => HintLevel::Formula,
            HintLevel::Formula => HintLevel::Interval,
            HintLevel::Interval | HintLevel::FirstNote => HintLevel::FirstNote,
        }
    }
}

impl fmt::Display for HintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HintLevel::None => "none",
            HintLevel::Formula => "formula",
            HintLevel::Interval => "interval",
            HintLevel::FirstNote => "first-note",
        };
        f.write_str(name)
    }
}

/// Structured hint content; rendering it is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hint {
    /// Template structure: one label per element with its semitone offset.
    Formula { labels: Vec<String>, offsets: Vec<u8> },
    /// Ascending semitones between consecutive expected notes.
    Intervals(Vec<u8>),
    FirstNote(Note),
}

/// The resolved entity a question is built on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subject {
    Chord(Chord),
    Scale(Scale),
    Interval(ResolvedInterval),
    Cadence(CadenceProgression),
}

impl Subject {
    pub fn topic(&self) -> Topic {
        match self {
            Subject::Chord(_) => Topic::Chord,
            Subject::Scale(_) => Topic::Scale,
            Subject::Interval(_) => Topic::Interval,
            Subject::Cadence(_) => Topic::Cadence,
        }
    }

    /// Ordered pitch classes for playback; a cadence lists its chords in turn.
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        match self {
            Subject::Chord(chord) => chord.pitch_classes(),
            Subject::Scale(scale) => scale.pitch_classes(),
            Subject::Interval(interval) => interval.pitch_classes(),
            Subject::Cadence(progression) => progression
                .chords()
                .iter()
                .flat_map(|c| c.pitch_classes())
                .collect(),
        }
    }

    /// Template structure of the subject.
    pub fn formula(&self) -> Hint {
        let (labels, offsets): (Vec<String>, Vec<u8>) = match self {
            Subject::Chord(chord) => chord
                .template()
                .tones
                .iter()
                .map(|t| (t.role.to_string(), t.semitone_offset))
                .unzip(),
            Subject::Scale(scale) => scale
                .template()
                .offsets
                .iter()
                .enumerate()
                .map(|(i, &offset)| ((i + 1).to_string(), offset))
                .unzip(),
            Subject::Interval(interval) => (
                vec![interval.template().name.clone()],
                vec![interval.template().semitones],
            ),
            Subject::Cadence(progression) => progression
                .template()
                .steps
                .iter()
                .map(|s| (s.function_label.clone(), s.offset_from_key))
                .unzip(),
        };
        Hint::Formula { labels, offsets }
    }
}

impl Identified for Subject {
    fn identity_key(&self) -> String {
        match self {
            Subject::Chord(chord) => chord.identity_key(),
            Subject::Scale(scale) => scale.identity_key(),
            Subject::Interval(interval) => interval.identity_key(),
            Subject::Cadence(progression) => progression.identity_key(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Chord(chord) => write!(f, "{}", chord.symbol()),
            Subject::Scale(scale) => write!(f, "{}", scale.symbol()),
            Subject::Interval(interval) => {
                write!(f, "{} above {}", interval.template().name, interval.root())
            }
            Subject::Cadence(progression) => {
                let symbols: Vec<String> = progression.chords().iter().map(|c| c.symbol()).collect();
                write!(f, "{}", symbols.join(" | "))
            }
        }
    }
}

/// Which part of the subject the question asks about.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Focus {
    Whole,
    Role(Role),
    Degree(u8),
    UpperNote,
    Quality,
    GuideTones,
    Resolution {
        chord_index: usize,
        role: Role,
        note: Note,
    },
    Voicings(Vec<VoicingConstraint>),
}

/// One option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Choice {
    pub symbol: String,
    pub name: String,
}

/// What a correct answer must satisfy, per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnswerExpectation {
    SingleTone {
        target: PitchClass,
    },
    AllTones {
        pitch_classes: BTreeSet<PitchClass>,
    },
    AuralQuality {
        identity: String,
    },
    GuideTones {
        positions: Vec<BTreeSet<PitchClass>>,
    },
    /// `None` when the progression has no adjacent chords to resolve into.
    ResolutionTarget {
        resolution: Option<ResolutionPair>,
    },
    SmoothVoicing {
        chords: Vec<Chord>,
        constraints: Vec<VoicingConstraint>,
    },
}

impl AnswerExpectation {
    pub fn variant(&self) -> Variant {
        match self {
            AnswerExpectation::SingleTone { .. } => Variant::SingleTone,
            AnswerExpectation::AllTones { .. } => Variant::AllTones,
            AnswerExpectation::AuralQuality { .. } => Variant::AuralQuality,
            AnswerExpectation::GuideTones { .. } => Variant::GuideTones,
            AnswerExpectation::ResolutionTarget { .. } => Variant::ResolutionTarget,
            AnswerExpectation::SmoothVoicing { .. } => Variant::SmoothVoicing,
        }
    }
}

/// A submitted answer. Pitch classes and MIDI numbers arrive unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Answer {
    SingleNote(i32),
    PitchSet(Vec<i32>),
    Choice(String),
    PerPosition(Vec<Vec<i32>>),
    Voicings(Vec<Vec<i32>>),
}

impl Answer {
    pub fn kind(&self) -> &'static str {
        match self {
            Answer::SingleNote(_) => "single note",
            Answer::PitchSet(_) => "pitch set",
            Answer::Choice(_) => "choice",
            Answer::PerPosition(_) => "per-position pitch sets",
            Answer::Voicings(_) => "voicings",
        }
    }
}

/// A generated drill question and everything needed to check and explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub topic: Topic,
    pub variant: Variant,
    pub subject: Subject,
    pub focus: Focus,
    pub expectation: AnswerExpectation,
    /// Shuffled options, empty unless the variant is multiple choice.
    pub choices: Vec<Choice>,
    /// The correct answer spelled out, in answer order.
    pub answer_notes: Vec<Note>,
}

impl Question {
    /// Hint content for `level`; `None` for `HintLevel::None` or when there
    /// is nothing to show at that level.
    pub fn hint(&self, level: HintLevel) -> Option<Hint> {
        match level {
            HintLevel::None => None,
            HintLevel::Formula => Some(self.subject.formula()),
            HintLevel::Interval => {
                if self.answer_notes.len() < 2 {
                    return None;
                }
                let intervals = self
                    .answer_notes
                    .windows(2)
                    .map(|pair| pair[0].pitch_class().interval_to(pair[1].pitch_class()))
                    .collect();
                Some(Hint::Intervals(intervals))
            }
            HintLevel::FirstNote => self.answer_notes.first().copied().map(Hint::FirstNote),
        }
    }

    /// Review-item key: the subject's identity plus topic and variant.
    pub fn item_identity(&self) -> String {
        format!(
            "{}:{}:{}",
            self.subject.identity_key(),
            self.topic,
            self.variant
        )
    }

    pub fn is_multiple_choice(&self) -> bool {
        !self.choices.is_empty()
    }
}
