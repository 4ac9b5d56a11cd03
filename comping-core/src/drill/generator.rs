//! Question generation.
//!
//! The generator draws a template and a root from the catalog, resolves them,
//! and packages the result as a [`Question`]. Templates that fail to resolve are
//! logged and replaced by another draw, up to `max_retries` attempts.

use crate::catalog::Catalog;
use crate::drill::question::{AnswerExpectation, Choice, Focus, Question, Subject, Topic, Variant};
use crate::error::{DrillError, Result};
use crate::types::{
    guide_tone_roles, guide_tones, minimal_voice_leading_distance, resolution_pairs,
    CadenceProgression, CadenceTemplate, Chord, ChordTemplate, Difficulty, IntervalTemplate, Note,
    PitchClass, ResolvedInterval, Role, Scale, ScaleTemplate, VoicingConstraint,
};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Label of the cadence position that dominant substitutions replace.
const DOMINANT_LABEL: &str = "V";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Attempts before giving up with `NoValidQuestionAvailable`.
    pub max_retries: usize,
    pub distractor_count: usize,
    /// Profile distance distractors are first drawn from; widened one step at a
    /// time up to `max_profile_distance`.
    pub initial_profile_distance: usize,
    pub max_profile_distance: usize,
    /// Total-motion allowance per voice for smooth-voicing questions.
    pub motion_budget_per_voice: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            max_retries: 8,
            distractor_count: 3,
            initial_profile_distance: 2,
            max_profile_distance: 8,
            motion_budget_per_voice: 2,
        }
    }
}

/// Caller-side restrictions for one request. Empty lists mean "anything".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestionFilter {
    pub difficulties: Vec<Difficulty>,
    /// Roots (or keys, for cadences) to draw from instead of the catalog's.
    pub roots: Vec<Note>,
    /// Chord symbol placed on the dominant of cadences.
    pub dominant_substitution: Option<String>,
    /// Draw the dominant from the catalog's `dominant_variants` instead.
    pub random_dominant: bool,
    pub motion_budget_per_voice: Option<u32>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulties.push(difficulty);
        self
    }

    /// Every tier up to and including `max`.
    pub fn up_to(mut self, max: Difficulty) -> Self {
        use Difficulty::*;
        self.difficulties
            .extend([Beginner, Intermediate, Advanced, Expert].into_iter().filter(|&d| d <= max));
        self
    }

    pub fn root(mut self, root: Note) -> Self {
        self.roots.push(root);
        self
    }

    pub fn dominant(mut self, symbol: &str) -> Self {
        self.dominant_substitution = Some(symbol.to_string());
        self
    }

    pub fn random_dominant(mut self) -> Self {
        self.random_dominant = true;
        self
    }

    pub fn motion_budget(mut self, per_voice: u32) -> Self {
        self.motion_budget_per_voice = Some(per_voice);
        self
    }

    pub fn allows(&self, difficulty: Difficulty) -> bool {
        self.difficulties.is_empty() || self.difficulties.contains(&difficulty)
    }

    /// Catalog roots are tiered too: a root is allowed when its tier does not
    /// exceed the hardest allowed template tier.
    fn allows_root_tier(&self, difficulty: Difficulty) -> bool {
        match self.difficulties.iter().max() {
            Some(&max) => difficulty <= max,
            None => true,
        }
    }
}

/// Something a multiple-choice question can ask the user to identify.
trait Quality {
    fn symbol(&self) -> &str;
    fn name(&self) -> &str;
    /// 0 means the two sound identical.
    fn distance(&self, other: &Self) -> usize;
}

impl Quality for ChordTemplate {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, other: &Self) -> usize {
        self.profile_distance(other)
    }
}

impl Quality for ScaleTemplate {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, other: &Self) -> usize {
        let profile = |t: &ScaleTemplate| t.offsets.iter().map(|o| o % 12).collect::<BTreeSet<_>>();
        profile(self).symmetric_difference(&profile(other)).count()
    }
}

impl Quality for IntervalTemplate {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, other: &Self) -> usize {
        self.semitones.abs_diff(other.semitones) as usize
    }
}

pub struct QuestionGenerator<'a> {
    catalog: &'a Catalog,
    config: GeneratorConfig,
    rng: SmallRng,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(catalog: &'a Catalog, config: GeneratorConfig, rng: SmallRng) -> Self {
        QuestionGenerator {
            catalog,
            config,
            rng,
        }
    }

    /// Reproducible generator: the same seed and calls give the same questions.
    pub fn seeded(catalog: &'a Catalog, seed: u64) -> Self {
        Self::new(catalog, GeneratorConfig::default(), SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(catalog: &'a Catalog) -> Self {
        Self::new(catalog, GeneratorConfig::default(), SmallRng::from_entropy())
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Build one question of `variant` about `topic`.
    pub fn generate(
        &mut self,
        topic: Topic,
        variant: Variant,
        filter: &QuestionFilter,
    ) -> Result<Question> {
        if !topic.supports(variant) {
            return Err(DrillError::UnsupportedVariant {
                topic: topic.to_string(),
                variant: variant.to_string(),
            });
        }

        if self.roots(filter).is_empty() || self.template_count(topic, variant, filter) == 0 {
            log::warn!("no {} template or root matches the filter", topic);
            return Err(DrillError::NoValidQuestionAvailable { attempts: 0 });
        }

        for attempt in 1..=self.config.max_retries {
            match self.attempt(topic, variant, filter) {
                Ok(question) => {
                    log::debug!(
                        "generated {} on attempt {}",
                        question.item_identity(),
                        attempt
                    );
                    return Ok(question);
                }
                Err(err) if err.is_catalog_fault() => {
                    log::warn!(
                        "attempt {}/{} for {} {}: {}; drawing again",
                        attempt,
                        self.config.max_retries,
                        topic,
                        variant,
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Err(DrillError::NoValidQuestionAvailable {
            attempts: self.config.max_retries,
        })
    }

    fn attempt(&mut self, topic: Topic, variant: Variant, filter: &QuestionFilter) -> Result<Question> {
        match topic {
            Topic::Chord => self.chord_question(variant, filter),
            Topic::Scale => self.scale_question(variant, filter),
            Topic::Interval => self.interval_question(variant, filter),
            Topic::Cadence => self.cadence_question(variant, filter),
        }
    }

    fn roots(&self, filter: &QuestionFilter) -> Vec<Note> {
        if !filter.roots.is_empty() {
            return filter.roots.clone();
        }
        self.catalog
            .roots
            .iter()
            .filter(|r| filter.allows_root_tier(r.difficulty))
            .map(|r| r.note)
            .collect()
    }

    fn chord_pool(&self, filter: &QuestionFilter) -> Vec<&'a ChordTemplate> {
        self.catalog
            .chords
            .iter()
            .filter(|t| filter.allows(t.difficulty))
            .collect()
    }

    fn scale_pool(&self, filter: &QuestionFilter) -> Vec<&'a ScaleTemplate> {
        self.catalog
            .scales
            .iter()
            .filter(|t| filter.allows(t.difficulty))
            .collect()
    }

    fn interval_pool(&self, filter: &QuestionFilter) -> Vec<&'a IntervalTemplate> {
        self.catalog
            .intervals
            .iter()
            .filter(|t| filter.allows(t.difficulty))
            .collect()
    }

    /// Resolution and voicing questions need at least one chord change.
    fn cadence_pool(&self, variant: Variant, filter: &QuestionFilter) -> Vec<&'a CadenceTemplate> {
        let min_len = match variant {
            Variant::ResolutionTarget | Variant::SmoothVoicing => 2,
            _ => 1,
        };
        self.catalog
            .cadences
            .iter()
            .filter(|t| filter.allows(t.difficulty) && t.steps.len() >= min_len)
            .collect()
    }

    fn template_count(&self, topic: Topic, variant: Variant, filter: &QuestionFilter) -> usize {
        match topic {
            Topic::Chord => self.chord_pool(filter).len(),
            Topic::Scale => self.scale_pool(filter).len(),
            Topic::Interval => self.interval_pool(filter).len(),
            Topic::Cadence => self.cadence_pool(variant, filter).len(),
        }
    }

    fn pick<T: Copy>(&mut self, items: &[T], what: &str) -> Result<T> {
        items
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| DrillError::UnknownTemplate(format!("no {} to choose from", what)))
    }

    fn pick_root(&mut self, filter: &QuestionFilter) -> Result<Note> {
        let roots = self.roots(filter);
        self.pick(&roots, "root")
    }

    fn chord_question(&mut self, variant: Variant, filter: &QuestionFilter) -> Result<Question> {
        let pool = self.chord_pool(filter);
        let template = self.pick(&pool, "chord template")?;
        let root = self.pick_root(filter)?;
        let chord = Chord::resolve(root, template)?;

        let (focus, expectation, answer_notes, choices) = match variant {
            Variant::SingleTone => {
                // Roles that occur once, so the prompt is unambiguous.
                let candidates: Vec<Role> = chord
                    .tones()
                    .iter()
                    .map(|t| t.role)
                    .filter(|&role| role != Role::Root)
                    .filter(|&role| chord.tones().iter().filter(|t| t.role == role).count() == 1)
                    .collect();
                let role = self.pick(&candidates, "chord tone")?;
                let tone = chord
                    .tone(role)
                    .ok_or_else(|| DrillError::UnknownTemplate(chord.symbol()))?;
                (
                    Focus::Role(role),
                    AnswerExpectation::SingleTone {
                        target: tone.note.pitch_class(),
                    },
                    vec![tone.note],
                    Vec::new(),
                )
            }
            Variant::AllTones => (
                Focus::Whole,
                AnswerExpectation::AllTones {
                    pitch_classes: chord.pitch_class_set(),
                },
                chord.notes(),
                Vec::new(),
            ),
            Variant::AuralQuality => {
                let catalog = self.catalog;
                let choices = self.choices(template, &catalog.chords);
                (
                    Focus::Quality,
                    AnswerExpectation::AuralQuality {
                        identity: template.symbol.clone(),
                    },
                    chord.notes(),
                    choices,
                )
            }
            Variant::GuideTones => (
                Focus::GuideTones,
                AnswerExpectation::GuideTones {
                    positions: vec![guide_tones(&chord)],
                },
                guide_tone_notes(&chord),
                Vec::new(),
            ),
            other => return Err(unsupported(Topic::Chord, other)),
        };

        Ok(Question {
            topic: Topic::Chord,
            variant,
            subject: Subject::Chord(chord),
            focus,
            expectation,
            choices,
            answer_notes,
        })
    }

    fn scale_question(&mut self, variant: Variant, filter: &QuestionFilter) -> Result<Question> {
        let pool = self.scale_pool(filter);
        let template = self.pick(&pool, "scale template")?;
        let root = self.pick_root(filter)?;
        let scale = Scale::resolve(root, template)?;
        let answer_notes: Vec<Note> = scale.answer_degrees().iter().map(|d| d.note).collect();

        let (focus, expectation, answer_notes, choices) = match variant {
            Variant::SingleTone => {
                let numbers: Vec<u8> = scale
                    .answer_degrees()
                    .iter()
                    .map(|d| d.number)
                    .filter(|&n| n > 1)
                    .collect();
                let number = self.pick(&numbers, "scale degree")?;
                let degree = scale
                    .degree(number)
                    .ok_or_else(|| DrillError::UnknownTemplate(scale.symbol()))?;
                (
                    Focus::Degree(number),
                    AnswerExpectation::SingleTone {
                        target: degree.note.pitch_class(),
                    },
                    vec![degree.note],
                    Vec::new(),
                )
            }
            Variant::AllTones => (
                Focus::Whole,
                AnswerExpectation::AllTones {
                    pitch_classes: scale.pitch_class_set(),
                },
                answer_notes,
                Vec::new(),
            ),
            Variant::AuralQuality => {
                let catalog = self.catalog;
                let choices = self.choices(template, &catalog.scales);
                (
                    Focus::Quality,
                    AnswerExpectation::AuralQuality {
                        identity: template.symbol.clone(),
                    },
                    answer_notes,
                    choices,
                )
            }
            other => return Err(unsupported(Topic::Scale, other)),
        };

        Ok(Question {
            topic: Topic::Scale,
            variant,
            subject: Subject::Scale(scale),
            focus,
            expectation,
            choices,
            answer_notes,
        })
    }

    fn interval_question(&mut self, variant: Variant, filter: &QuestionFilter) -> Result<Question> {
        let pool = self.interval_pool(filter);
        let template = self.pick(&pool, "interval template")?;
        let root = self.pick_root(filter)?;
        let interval = ResolvedInterval::resolve(root, template)?;
        let catalog = self.catalog;

        let (focus, expectation, choices) = match variant {
            Variant::SingleTone => (
                Focus::UpperNote,
                AnswerExpectation::SingleTone {
                    target: interval.upper().pitch_class(),
                },
                Vec::new(),
            ),
            Variant::AuralQuality => (
                Focus::Quality,
                AnswerExpectation::AuralQuality {
                    identity: template.symbol.clone(),
                },
                self.choices(template, &catalog.intervals),
            ),
            other => return Err(unsupported(Topic::Interval, other)),
        };

        Ok(Question {
            topic: Topic::Interval,
            variant,
            focus,
            expectation,
            choices,
            answer_notes: vec![interval.upper()],
            subject: Subject::Interval(interval),
        })
    }

    fn cadence_question(&mut self, variant: Variant, filter: &QuestionFilter) -> Result<Question> {
        let pool = self.cadence_pool(variant, filter);
        let mut template = self.pick(&pool, "cadence template")?.clone();
        if let Some(symbol) = &filter.dominant_substitution {
            let dominant = self.catalog.chord(symbol)?;
            template = template.with_substitution(DOMINANT_LABEL, dominant);
        } else if filter.random_dominant {
            let catalog = self.catalog;
            let variants = catalog.dominant_variant_templates();
            let dominant = self.pick(&variants, "dominant variant")?;
            template = template.with_substitution(DOMINANT_LABEL, dominant);
        }
        let key = self.pick_root(filter)?;
        let progression = CadenceProgression::resolve(key, &template)?;

        let (focus, expectation, answer_notes) = match variant {
            Variant::GuideTones => (
                Focus::GuideTones,
                AnswerExpectation::GuideTones {
                    positions: progression.chords().iter().map(guide_tones).collect(),
                },
                progression
                    .chords()
                    .iter()
                    .flat_map(guide_tone_notes)
                    .collect(),
            ),
            Variant::ResolutionTarget => {
                let pairs = resolution_pairs(&progression);
                let pair = pairs.choose(&mut self.rng).copied();
                let (focus, answer_notes) = match &pair {
                    Some(pair) => {
                        let from = note_at(&progression[pair.from_chord_index], pair.from_pitch_class)?;
                        let target =
                            note_at(&progression[pair.to_chord_index], pair.target_pitch_class)?;
                        (
                            Focus::Resolution {
                                chord_index: pair.from_chord_index,
                                role: pair.from_role,
                                note: from,
                            },
                            vec![target],
                        )
                    }
                    None => (Focus::Whole, Vec::new()),
                };
                (
                    focus,
                    AnswerExpectation::ResolutionTarget { resolution: pair },
                    answer_notes,
                )
            }
            Variant::SmoothVoicing => {
                let per_voice = filter
                    .motion_budget_per_voice
                    .unwrap_or(self.config.motion_budget_per_voice);
                let (constraints, top_line) = voicing_constraints(progression.chords(), per_voice)?;
                (
                    Focus::Voicings(constraints.clone()),
                    AnswerExpectation::SmoothVoicing {
                        chords: progression.chords().to_vec(),
                        constraints,
                    },
                    top_line,
                )
            }
            other => return Err(unsupported(Topic::Cadence, other)),
        };

        Ok(Question {
            topic: Topic::Cadence,
            variant,
            subject: Subject::Cadence(progression),
            focus,
            expectation,
            choices: Vec::new(),
            answer_notes,
        })
    }

    /// The correct option plus distractors, shuffled.
    fn choices<T: Quality>(&mut self, correct: &T, pool: &[T]) -> Vec<Choice> {
        let mut picked: Vec<&T> = Vec::new();
        let mut threshold = self.config.initial_profile_distance;

        while picked.len() < self.config.distractor_count && threshold <= self.config.max_profile_distance {
            let mut candidates: Vec<&T> = pool
                .iter()
                .filter(|t| t.symbol() != correct.symbol())
                .filter(|t| {
                    let distance = t.distance(correct);
                    distance > 0 && distance <= threshold
                })
                .filter(|t| picked.iter().all(|p| p.symbol() != t.symbol() && p.distance(t) > 0))
                .collect();
            candidates.shuffle(&mut self.rng);

            for candidate in candidates {
                if picked.len() == self.config.distractor_count {
                    break;
                }
                // Candidates at the same level may still sound alike.
                if picked.iter().all(|p| p.distance(candidate) > 0) {
                    picked.push(candidate);
                }
            }
            threshold += 1;
        }

        if picked.len() < self.config.distractor_count {
            log::debug!(
                "only {} distractors within distance {} of {}",
                picked.len(),
                self.config.max_profile_distance,
                correct.symbol()
            );
        }

        let mut choices: Vec<Choice> = std::iter::once(correct)
            .chain(picked)
            .map(|t| Choice {
                symbol: t.symbol().to_string(),
                name: t.name().to_string(),
            })
            .collect();
        choices.shuffle(&mut self.rng);
        choices
    }
}

fn unsupported(topic: Topic, variant: Variant) -> DrillError {
    DrillError::UnsupportedVariant {
        topic: topic.to_string(),
        variant: variant.to_string(),
    }
}

fn guide_tone_notes(chord: &Chord) -> Vec<Note> {
    guide_tone_roles(chord)
        .into_iter()
        .filter_map(|role| chord.tone(role))
        .map(|t| t.note)
        .collect()
}

fn note_of(chord: &Chord, role: Role) -> Result<Note> {
    chord
        .tone(role)
        .map(|t| t.note)
        .ok_or_else(|| DrillError::UnknownTemplate(format!("{} has no {}", chord.symbol(), role)))
}

fn note_at(chord: &Chord, pc: PitchClass) -> Result<Note> {
    chord
        .tones()
        .iter()
        .find(|t| t.note.pitch_class() == pc)
        .map(|t| t.note)
        .ok_or_else(|| DrillError::UnknownTemplate(format!("{} has no pitch class {}", chord.symbol(), pc)))
}

/// Constraints for every adjacent pair, plus the top-voice line they imply.
///
/// The top voice starts on the first chord's highest guide tone (its 7th when
/// there is one) and moves to its nearest tone in each following chord. The
/// motion budget scales with the larger chord of each pair.
pub fn voicing_constraints(
    chords: &[Chord],
    per_voice: u32,
) -> Result<(Vec<VoicingConstraint>, Vec<Note>)> {
    let Some(first) = chords.first() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let top_role = if first.tone(Role::Seventh).is_some() {
        Role::Seventh
    } else {
        guide_tone_roles(first).last().copied().unwrap_or(Role::Root)
    };
    let mut top = note_of(first, top_role)?;

    let mut constraints = Vec::with_capacity(chords.len().saturating_sub(1));
    let mut line = vec![top];
    for pair in chords.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let motion = minimal_voice_leading_distance(top.pitch_class(), to)
            .ok_or_else(|| DrillError::UnknownTemplate(format!("{} has no tones", to.symbol())))?;
        constraints.push(VoicingConstraint {
            top_voice_motion_semitones: motion.semitones,
            max_total_motion_semitones: per_voice.saturating_mul(from.len().max(to.len()) as u32),
        });
        top = note_at(to, motion.target)?;
        line.push(top);
    }
    Ok((constraints, line))
}
