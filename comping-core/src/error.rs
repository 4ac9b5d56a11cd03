//! Error type shared by every resolver, the validator and the generator.

use crate::types::PitchClass;
use thiserror::Error;

/// Everything that can go wrong inside the engine.
///
/// Resolver errors (`DuplicatePitchClass`, `EmptyCadence`, `UnknownTemplate`)
/// describe malformed catalog data and are absorbed by the question generator.
/// `InvalidAnswerShape` describes malformed user input and must be surfaced as
/// "could not evaluate", never as a wrong answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("pitch class must be 0-11, got {0}")]
    InvalidPitchClass(i32),

    #[error("template `{symbol}` produces pitch class {pitch_class} more than once")]
    DuplicatePitchClass {
        symbol: String,
        pitch_class: PitchClass,
    },

    #[error("cadence `{0}` has no positions")]
    EmptyCadence(String),

    #[error("could not evaluate answer: {0}")]
    InvalidAnswerShape(String),

    #[error("no valid question available after {attempts} attempts")]
    NoValidQuestionAvailable { attempts: usize },

    #[error("invalid note name: `{0}`")]
    InvalidNoteName(String),

    #[error("unknown template: `{0}`")]
    UnknownTemplate(String),

    #[error("unknown topic `{0}` (expected chord, scale, interval or cadence)")]
    UnknownTopic(String),

    #[error("unknown question variant `{0}`")]
    UnknownVariant(String),

    #[error("{variant} questions cannot be built for {topic} drills")]
    UnsupportedVariant { topic: String, variant: String },

    #[cfg(feature = "serde")]
    #[error("catalog format error: {0}")]
    CatalogFormat(String),
}

impl DrillError {
    /// True for errors caused by bad catalog data, which the generator recovers
    /// from by picking another template.
    pub fn is_catalog_fault(&self) -> bool {
        matches!(
            self,
            DrillError::DuplicatePitchClass { .. }
                | DrillError::EmptyCadence(_)
                | DrillError::UnknownTemplate(_)
                | DrillError::InvalidPitchClass(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DrillError>;
