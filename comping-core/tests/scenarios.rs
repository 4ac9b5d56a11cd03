#[cfg(test)]
mod tests {
    use comping_core::drill::{Focus, Reason, Subject};
    use comping_core::types::{
        common_tones, guide_tones, identity_key, minimal_voice_leading_distance,
        resolution_pairs, smooth_voicing_score, spell, Role, TonalContext, VoicingConstraint,
    };
    use comping_core::{
        validate, Answer, AnswerExpectation, CadenceProgression, Catalog, Chord, DrillError,
        HintLevel, Note, PitchClass, QuestionFilter, QuestionGenerator, Topic, Variant,
    };
    use std::collections::BTreeSet;

    fn note(name: &str) -> Note {
        name.parse().unwrap()
    }

    fn pcs(values: &[u8]) -> BTreeSet<PitchClass> {
        values
            .iter()
            .map(|&v| PitchClass::new(v as i32).unwrap())
            .collect()
    }

    fn chord(catalog: &Catalog, root: &str, symbol: &str) -> Chord {
        Chord::resolve(note(root), catalog.chord(symbol).unwrap()).unwrap()
    }

    #[test]
    fn test_spelling_round_trips_in_both_contexts() {
        for pc in 0..12 {
            for context in [TonalContext::sharps(), TonalContext::flats()] {
                let spelled = spell(pc, context, None).unwrap();
                assert_eq!(spelled.pitch_class().value() as i32, pc);
                assert_eq!(note(&spelled.to_string()), spelled);
            }
        }
        assert_eq!(
            spell(12, TonalContext::sharps(), None),
            Err(DrillError::InvalidPitchClass(12))
        );
    }

    #[test]
    fn test_d_minor_seven() {
        let catalog = Catalog::jazz_standard();
        let dm7 = chord(&catalog, "D", "m7");
        assert_eq!(dm7.pitch_class_set(), pcs(&[2, 5, 9, 0]));
        assert_eq!(guide_tones(&dm7), pcs(&[5, 0]));
        assert_eq!(identity_key(&dm7), "chord:m7:D");
    }

    #[test]
    fn test_resolving_twice_is_identical() {
        let catalog = Catalog::jazz_standard();
        for template in &catalog.chords {
            for root in &catalog.roots {
                let a = Chord::resolve(root.note, template).unwrap();
                let b = Chord::resolve(root.note, template).unwrap();
                assert_eq!(a, b);
                let expected: BTreeSet<PitchClass> = template
                    .tones
                    .iter()
                    .map(|t| root.note.pitch_class().transpose(t.semitone_offset as i32))
                    .collect();
                assert_eq!(a.pitch_class_set(), expected);
                assert_eq!(a.pitch_class_set().len(), a.len());
            }
        }
    }

    #[test]
    fn test_b_into_c_major_seven_is_a_common_tone() {
        let catalog = Catalog::jazz_standard();
        let g7 = chord(&catalog, "G", "7");
        let cmaj7 = chord(&catalog, "C", "maj7");
        let motion =
            minimal_voice_leading_distance(PitchClass::new(11).unwrap(), &cmaj7).unwrap();
        assert_eq!(motion.target, PitchClass::new(11).unwrap());
        assert_eq!(motion.semitones, 0);
        assert_eq!(motion.target_role, Role::Seventh);
        assert_eq!(common_tones(&g7, &cmaj7), common_tones(&cmaj7, &g7));
        assert_eq!(common_tones(&g7, &cmaj7), pcs(&[7, 11]));
    }

    #[test]
    fn test_triad_guide_tones() {
        let catalog = Catalog::jazz_standard();
        for symbol in ["", "m", "dim", "aug", "sus4"] {
            for root in ["C", "F#", "Bb"] {
                assert_eq!(guide_tones(&chord(&catalog, root, symbol)).len(), 2);
            }
        }
    }

    #[test]
    fn test_all_tones_missing_seventh() {
        let expectation = AnswerExpectation::AllTones {
            pitch_classes: pcs(&[0, 4, 7, 11]),
        };
        let verdict =
            validate(&expectation, &Answer::PitchSet(vec![0, 4, 7]), HintLevel::None).unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(
            verdict.reason,
            Some(Reason::WrongSet {
                missing: pcs(&[11]),
                extra: BTreeSet::new(),
            })
        );
    }

    #[test]
    fn test_smooth_voicing_dm7_to_g7() {
        let catalog = Catalog::jazz_standard();
        let score = smooth_voicing_score(
            &chord(&catalog, "D", "m7"),
            &chord(&catalog, "G", "7"),
            &[62, 65, 69, 72],
            &[59, 65, 67, 71],
            &VoicingConstraint {
                top_voice_motion_semitones: -1,
                max_total_motion_semitones: 6,
            },
        );
        assert!(score.top_voice_motion_ok);
        assert_eq!(score.total_motion_semitones, 6);
        assert!(score.within_budget);
    }

    #[test]
    fn test_two_position_cadence_resolves_and_validates() {
        let catalog = Catalog::jazz_standard();
        let progression =
            CadenceProgression::resolve(note("F"), catalog.cadence("V-I").unwrap()).unwrap();
        assert_eq!(progression.len(), 2);
        assert_eq!(progression[0].symbol(), "C7");

        let pairs = resolution_pairs(&progression);
        // E (3rd of C7) is kept as the 7th of Fmaj7, Bb (7th) falls to A
        let targets: Vec<(Role, u8, i8)> = pairs
            .iter()
            .map(|p| (p.from_role, p.target_pitch_class.value(), p.semitones))
            .collect();
        assert_eq!(targets, vec![(Role::Third, 4, 0), (Role::Seventh, 9, -1)]);

        let expectation = AnswerExpectation::ResolutionTarget {
            resolution: pairs.last().copied(),
        };
        assert!(validate(&expectation, &Answer::SingleNote(9), HintLevel::Interval)
            .unwrap()
            .is_correct);
    }

    #[test]
    fn test_single_position_cadence_validates() {
        let catalog = Catalog::jazz_standard();
        let mut tonic_only = catalog.cadence("V-I").unwrap().clone();
        tonic_only.steps.remove(0);
        let progression = CadenceProgression::resolve(note("Ab"), &tonic_only).unwrap();
        assert_eq!(progression.len(), 1);
        assert!(resolution_pairs(&progression).is_empty());

        let expectation = AnswerExpectation::GuideTones {
            positions: progression.chords().iter().map(guide_tones).collect(),
        };
        // Abmaj7: C and G
        let verdict = validate(
            &expectation,
            &Answer::PerPosition(vec![vec![0, 7]]),
            HintLevel::None,
        )
        .unwrap();
        assert!(verdict.is_correct);

        let expectation = AnswerExpectation::ResolutionTarget {
            resolution: resolution_pairs(&progression).first().copied(),
        };
        assert!(matches!(
            validate(&expectation, &Answer::SingleNote(0), HintLevel::None),
            Err(DrillError::InvalidAnswerShape(_))
        ));
    }

    #[test]
    fn test_generated_resolution_question_round_trip() {
        let catalog = Catalog::jazz_standard();
        let mut generator = QuestionGenerator::seeded(&catalog, 2024);
        let filter = QuestionFilter::new().root(note("C"));
        for _ in 0..25 {
            let question = generator
                .generate(Topic::Cadence, Variant::ResolutionTarget, &filter)
                .unwrap();
            let Focus::Resolution { chord_index, .. } = question.focus else {
                panic!("resolution question without a resolution focus");
            };
            let Subject::Cadence(progression) = &question.subject else {
                panic!("cadence question without a cadence subject");
            };
            assert!(chord_index + 1 < progression.len());

            let target = question.answer_notes[0].pitch_class().value() as i32;
            let verdict =
                validate(&question.expectation, &Answer::SingleNote(target), HintLevel::None)
                    .unwrap();
            assert!(verdict.is_correct);
            assert!(question.item_identity().starts_with("cadence:"));
        }
    }

    #[test]
    fn test_generated_voicing_question_accepts_close_voicing() {
        let catalog = Catalog::jazz_standard();
        let mut generator = QuestionGenerator::seeded(&catalog, 8);
        let filter = QuestionFilter::new().root(note("C"));
        let mut checked = 0;
        for _ in 0..120 {
            let question = generator
                .generate(Topic::Cadence, Variant::SmoothVoicing, &filter)
                .unwrap();
            let Subject::Cadence(progression) = &question.subject else {
                panic!("cadence question without a cadence subject");
            };
            if progression.template().symbol != "ii-V-I" {
                continue;
            }
            // D3 F3 A3 C4 -> D3 F3 G3 B3 -> C3 E3 G3 B3
            let answer = Answer::Voicings(vec![
                vec![50, 53, 57, 60],
                vec![50, 53, 55, 59],
                vec![48, 52, 55, 59],
            ]);
            let verdict = validate(&question.expectation, &answer, HintLevel::None).unwrap();
            assert!(verdict.is_correct, "{:?}", verdict.reason);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_unknown_note_names() {
        assert!(matches!(
            "H".parse::<Note>(),
            Err(DrillError::InvalidNoteName(_))
        ));
        assert!(matches!(
            "C#b".parse::<Note>(),
            Err(DrillError::InvalidNoteName(_))
        ));
    }
}
