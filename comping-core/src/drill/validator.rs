//! Answer checking, one rule per question variant.
//!
//! A malformed answer (out-of-range pitch class or MIDI number, wrong kind,
//! wrong number of positions) is an `InvalidAnswerShape` error. An answer that
//! is well formed but wrong is an `Ok` verdict with `is_correct == false`.

use crate::drill::question::{Answer, AnswerExpectation, HintLevel, Variant};
use crate::error::{DrillError, Result};
use crate::types::{smooth_voicing_score, PitchClass, VoicingScore};
use std::collections::BTreeSet;

/// Outcome of checking one answer. Credit is computed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    pub variant: Variant,
    pub is_correct: bool,
    pub hint_level: HintLevel,
    /// Present only for incorrect answers.
    pub reason: Option<Reason>,
}

/// Why an answer was judged incorrect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reason {
    WrongNote {
        expected: PitchClass,
        given: PitchClass,
    },
    WrongSet {
        missing: BTreeSet<PitchClass>,
        extra: BTreeSet<PitchClass>,
    },
    WrongChoice {
        expected: String,
        given: String,
    },
    WrongPosition {
        position: usize,
        missing: BTreeSet<PitchClass>,
        extra: BTreeSet<PitchClass>,
    },
    RoughVoicing {
        /// Index of the first chord of the failing pair.
        position: usize,
        score: VoicingScore,
    },
}

/// Check `answer` against `expectation`.
pub fn validate(
    expectation: &AnswerExpectation,
    answer: &Answer,
    hint_level: HintLevel,
) -> Result<Verdict> {
    let reason = match (expectation, answer) {
        (AnswerExpectation::SingleTone { target }, Answer::SingleNote(given)) => {
            compare_note(*target, *given)?
        }
        (AnswerExpectation::AllTones { pitch_classes }, Answer::PitchSet(given)) => {
            compare_set(pitch_classes, given)?.map(|(missing, extra)| Reason::WrongSet { missing, extra })
        }
        (AnswerExpectation::AuralQuality { identity }, Answer::Choice(given)) => {
            if given.trim() == identity {
                None
            } else {
                Some(Reason::WrongChoice {
                    expected: identity.clone(),
                    given: given.trim().to_string(),
                })
            }
        }
        (AnswerExpectation::GuideTones { positions }, Answer::PerPosition(given)) => {
            check_position_count(positions.len(), given.len())?;
            // Shape errors anywhere win over a wrong position earlier on.
            let mut first_wrong = None;
            for (position, (expected, submitted)) in positions.iter().zip(given).enumerate() {
                if let Some((missing, extra)) = compare_set(expected, submitted)? {
                    first_wrong.get_or_insert(Reason::WrongPosition {
                        position,
                        missing,
                        extra,
                    });
                }
            }
            first_wrong
        }
        (AnswerExpectation::ResolutionTarget { resolution }, Answer::SingleNote(given)) => {
            let pair = resolution.as_ref().ok_or_else(|| {
                DrillError::InvalidAnswerShape(
                    "resolution target needs at least two chords".to_string(),
                )
            })?;
            compare_note(pair.target_pitch_class, *given)?
        }
        (AnswerExpectation::SmoothVoicing { chords, constraints }, Answer::Voicings(given)) => {
            if chords.len() < 2 || constraints.len() != chords.len() - 1 {
                return Err(DrillError::InvalidAnswerShape(format!(
                    "smooth voicing needs one constraint per chord pair, got {} chords and {} constraints",
                    chords.len(),
                    constraints.len()
                )));
            }
            check_position_count(chords.len(), given.len())?;
            let voicings = given
                .iter()
                .map(|voicing| to_midi(voicing))
                .collect::<Result<Vec<_>>>()?;

            chords
                .windows(2)
                .zip(voicings.windows(2))
                .zip(constraints)
                .enumerate()
                .map(|(position, ((pair, voiced), constraint))| {
                    let score =
                        smooth_voicing_score(&pair[0], &pair[1], &voiced[0], &voiced[1], constraint);
                    (position, score)
                })
                .find(|(_, score)| !score.is_smooth())
                .map(|(position, score)| Reason::RoughVoicing { position, score })
        }
        (expected, given) => {
            return Err(DrillError::InvalidAnswerShape(format!(
                "{} question cannot take a {} answer",
                expected.variant(),
                given.kind()
            )))
        }
    };

    Ok(Verdict {
        variant: expectation.variant(),
        is_correct: reason.is_none(),
        hint_level,
        reason,
    })
}

fn compare_note(expected: PitchClass, given: i32) -> Result<Option<Reason>> {
    let given = PitchClass::new(given).map_err(shape_error)?;
    Ok((given != expected).then_some(Reason::WrongNote { expected, given }))
}

/// Missing and extra pitch classes, or `None` when the sets are equal.
/// Repeated pitch classes in the submission count once.
fn compare_set(
    expected: &BTreeSet<PitchClass>,
    given: &[i32],
) -> Result<Option<(BTreeSet<PitchClass>, BTreeSet<PitchClass>)>> {
    let given = given
        .iter()
        .map(|&pc| PitchClass::new(pc).map_err(shape_error))
        .collect::<Result<BTreeSet<_>>>()?;
    if &given == expected {
        return Ok(None);
    }
    let missing = expected.difference(&given).copied().collect();
    let extra = given.difference(expected).copied().collect();
    Ok(Some((missing, extra)))
}

fn check_position_count(expected: usize, given: usize) -> Result<()> {
    if expected != given {
        return Err(DrillError::InvalidAnswerShape(format!(
            "expected {} positions, got {}",
            expected, given
        )));
    }
    Ok(())
}

fn to_midi(voicing: &[i32]) -> Result<Vec<u8>> {
    voicing
        .iter()
        .map(|&note| {
            u8::try_from(note)
                .ok()
                .filter(|&n| n <= 127)
                .ok_or_else(|| {
                    DrillError::InvalidAnswerShape(format!("MIDI note must be 0-127, got {}", note))
                })
        })
        .collect()
}

fn shape_error(err: DrillError) -> DrillError {
    match err {
        DrillError::InvalidPitchClass(pc) => {
            DrillError::InvalidAnswerShape(format!("pitch class must be 0-11, got {}", pc))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{Chord, Note, VoicingConstraint};

    fn pcs(values: &[u8]) -> BTreeSet<PitchClass> {
        values.iter().map(|&v| PitchClass::new(v as i32).unwrap()).collect()
    }

    fn chord(root: &str, symbol: &str) -> Chord {
        let catalog = Catalog::jazz_standard();
        Chord::resolve(root.parse::<Note>().unwrap(), catalog.chord(symbol).unwrap()).unwrap()
    }

    #[test]
    fn test_all_tones_reports_missing() {
        let expectation = AnswerExpectation::AllTones {
            pitch_classes: pcs(&[0, 4, 7, 11]),
        };
        let verdict = validate(&expectation, &Answer::PitchSet(vec![0, 4, 7]), HintLevel::None).unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(
            verdict.reason,
            Some(Reason::WrongSet {
                missing: pcs(&[11]),
                extra: BTreeSet::new(),
            })
        );

        // order and doublings are irrelevant
        let verdict = validate(
            &expectation,
            &Answer::PitchSet(vec![11, 7, 4, 0, 0]),
            HintLevel::Formula,
        )
        .unwrap();
        assert!(verdict.is_correct);
        assert_eq!(verdict.hint_level, HintLevel::Formula);
        assert_eq!(verdict.variant, Variant::AllTones);
    }

    #[test]
    fn test_single_tone() {
        let expectation = AnswerExpectation::SingleTone {
            target: PitchClass::new(5).unwrap(),
        };
        assert!(validate(&expectation, &Answer::SingleNote(5), HintLevel::None).unwrap().is_correct);
        let verdict = validate(&expectation, &Answer::SingleNote(4), HintLevel::None).unwrap();
        assert_eq!(
            verdict.reason,
            Some(Reason::WrongNote {
                expected: PitchClass::new(5).unwrap(),
                given: PitchClass::new(4).unwrap(),
            })
        );
        assert!(matches!(
            validate(&expectation, &Answer::SingleNote(12), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_out_of_range_pitch_class_is_shape_error() {
        let expectation = AnswerExpectation::AllTones {
            pitch_classes: pcs(&[0, 4, 7]),
        };
        assert!(matches!(
            validate(&expectation, &Answer::PitchSet(vec![0, 4, -1]), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_kind_mismatch_is_shape_error() {
        let expectation = AnswerExpectation::AuralQuality {
            identity: "m7".to_string(),
        };
        assert!(matches!(
            validate(&expectation, &Answer::SingleNote(2), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
        let verdict = validate(&expectation, &Answer::Choice("7".into()), HintLevel::None).unwrap();
        assert!(!verdict.is_correct);
        assert!(validate(&expectation, &Answer::Choice("m7".into()), HintLevel::None)
            .unwrap()
            .is_correct);
    }

    #[test]
    fn test_guide_tones_per_position() {
        let expectation = AnswerExpectation::GuideTones {
            positions: vec![pcs(&[5, 0]), pcs(&[11, 5]), pcs(&[4, 11])],
        };
        let answer = Answer::PerPosition(vec![vec![5, 0], vec![11, 5], vec![4, 11]]);
        assert!(validate(&expectation, &answer, HintLevel::None).unwrap().is_correct);

        let answer = Answer::PerPosition(vec![vec![5, 0], vec![11, 7], vec![4, 11]]);
        let verdict = validate(&expectation, &answer, HintLevel::None).unwrap();
        assert_eq!(
            verdict.reason,
            Some(Reason::WrongPosition {
                position: 1,
                missing: pcs(&[5]),
                extra: pcs(&[7]),
            })
        );

        let short = Answer::PerPosition(vec![vec![5, 0], vec![11, 5]]);
        assert!(matches!(
            validate(&expectation, &short, HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_resolution_target_without_successor() {
        let expectation = AnswerExpectation::ResolutionTarget { resolution: None };
        assert!(matches!(
            validate(&expectation, &Answer::SingleNote(0), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_smooth_voicing() {
        let expectation = AnswerExpectation::SmoothVoicing {
            chords: vec![chord("D", "m7"), chord("G", "7")],
            constraints: vec![VoicingConstraint {
                top_voice_motion_semitones: -1,
                max_total_motion_semitones: 6,
            }],
        };
        // D3 F3 A3 C4 -> D3 F3 G3 B3: D stays, F stays, A->G, C->B
        let smooth = Answer::Voicings(vec![vec![50, 53, 57, 60], vec![50, 53, 55, 59]]);
        assert!(validate(&expectation, &smooth, HintLevel::None).unwrap().is_correct);

        // the G7 voicing leaves out D
        let incomplete = Answer::Voicings(vec![vec![62, 65, 69, 72], vec![59, 65, 67, 71]]);
        let verdict = validate(&expectation, &incomplete, HintLevel::None).unwrap();
        match verdict.reason {
            Some(Reason::RoughVoicing { position, score }) => {
                assert_eq!(position, 0);
                assert!(!score.tones_complete);
                assert!(score.top_voice_motion_ok);
                assert_eq!(score.total_motion_semitones, 6);
            }
            other => panic!("unexpected reason {:?}", other),
        }

        let out_of_range = Answer::Voicings(vec![vec![50, 53, 57, 60], vec![50, 53, 55, 128]]);
        assert!(matches!(
            validate(&expectation, &out_of_range, HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_smooth_voicing_needs_a_constraint_per_pair() {
        let single = AnswerExpectation::SmoothVoicing {
            chords: vec![chord("C", "maj7")],
            constraints: Vec::new(),
        };
        assert!(matches!(
            validate(&single, &Answer::Voicings(vec![vec![61]]), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));

        let short = AnswerExpectation::SmoothVoicing {
            chords: vec![chord("D", "m7"), chord("G", "7"), chord("C", "maj7")],
            constraints: vec![VoicingConstraint {
                top_voice_motion_semitones: -1,
                max_total_motion_semitones: 8,
            }],
        };
        let answer = Answer::Voicings(vec![vec![50, 53, 57, 60], vec![50, 53, 55, 59], vec![61, 66]]);
        assert!(matches!(
            validate(&short, &answer, HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }
}
