//! Voice leading analysis between resolved chords
//!
//! Everything here is a pure function of pitch-class sets: common tones,
//! guide tones, the nearest resolution of a single tone into the next chord,
//! and scoring of user-supplied voicings against a motion constraint.

use crate::types::chord::Chord;
use crate::types::pitch::PitchClass;
use crate::types::progression::CadenceProgression;
use crate::types::template::Role;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;

/// Nearest move from one pitch class into a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motion {
    pub target: PitchClass,
    pub target_role: Role,
    /// Signed semitones, negative is downward.
    pub semitones: i8,
}

/// Where one guide tone of a chord goes in the next chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionPair {
    pub from_role: Role,
    pub from_chord_index: usize,
    pub to_chord_index: usize,
    pub from_pitch_class: PitchClass,
    pub target_pitch_class: PitchClass,
    pub target_role: Role,
    pub semitones: i8,
}

impl fmt::Display for ResolutionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}→{}: {} ({}) → {} ({}), {:+}",
            self.from_chord_index,
            self.to_chord_index,
            self.from_role,
            self.from_pitch_class,
            self.target_role,
            self.target_pitch_class,
            self.semitones
        )
    }
}

/// Required motion for a pair of user voicings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoicingConstraint {
    pub top_voice_motion_semitones: i8,
    pub max_total_motion_semitones: u32,
}

/// Result of scoring two voicings against their chords and a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoicingScore {
    pub tones_complete: bool,
    pub top_voice_motion_ok: bool,
    pub total_motion_semitones: u32,
    pub within_budget: bool,
}

impl VoicingScore {
    pub fn is_smooth(&self) -> bool {
        self.tones_complete && self.top_voice_motion_ok && self.within_budget
    }
}

/// Pitch classes shared by both chords.
pub fn common_tones(a: &Chord, b: &Chord) -> BTreeSet<PitchClass> {
    a.pitch_class_set()
        .intersection(&b.pitch_class_set())
        .copied()
        .collect()
}

/// Roles that act as guide tones, in template order.
///
/// The 3rd and 7th; a chord without a 7th uses its 5th instead, and a
/// suspended chord uses its 4th (or 2nd) in place of the missing 3rd.
pub fn guide_tone_roles(chord: &Chord) -> Vec<Role> {
    let has = |role| chord.tone(role).is_some();
    let lower = [Role::Third, Role::Fourth, Role::Second]
        .into_iter()
        .find(|&role| has(role));
    let upper = if has(Role::Seventh) {
        Some(Role::Seventh)
    } else if has(Role::Fifth) {
        Some(Role::Fifth)
    } else {
        None
    };

    chord
        .tones()
        .iter()
        .map(|t| t.role)
        .filter(|&role| Some(role) == lower || Some(role) == upper)
        .collect()
}

pub fn guide_tones(chord: &Chord) -> BTreeSet<PitchClass> {
    guide_tone_roles(chord)
        .into_iter()
        .filter_map(|role| chord.tone(role))
        .map(|t| t.note.pitch_class())
        .collect()
}

/// The tone of `to` nearest to `from`.
///
/// Smallest absolute distance wins; ties go to downward motion, then to the
/// 3rd over the 7th over any other role, then to template order. `None` only
/// for a chord with no tones.
pub fn minimal_voice_leading_distance(from: PitchClass, to: &Chord) -> Option<Motion> {
    to.tones()
        .iter()
        .enumerate()
        .map(|(index, tone)| {
            let target = tone.note.pitch_class();
            let semitones = from.signed_distance_to(target);
            (index, tone.role, target, semitones)
        })
        .min_by_key(|&(index, role, _, semitones)| {
            (
                semitones.abs(),
                Reverse(semitones < 0),
                role.resolution_priority(),
                index,
            )
        })
        .map(|(_, target_role, target, semitones)| Motion {
            target,
            target_role,
            semitones,
        })
}

/// One resolution per guide tone of every chord that has a successor.
pub fn resolution_pairs(progression: &CadenceProgression) -> Vec<ResolutionPair> {
    resolution_pairs_for(progression.chords())
}

pub fn resolution_pairs_for(chords: &[Chord]) -> Vec<ResolutionPair> {
    let mut pairs = Vec::new();
    for (index, window) in chords.windows(2).enumerate() {
        let (from, to) = (&window[0], &window[1]);
        for role in guide_tone_roles(from) {
            let Some(tone) = from.tone(role) else {
                continue;
            };
            let from_pc = tone.note.pitch_class();
            if let Some(motion) = minimal_voice_leading_distance(from_pc, to) {
                pairs.push(ResolutionPair {
                    from_role: role,
                    from_chord_index: index,
                    to_chord_index: index + 1,
                    from_pitch_class: from_pc,
                    target_pitch_class: motion.target,
                    target_role: motion.target_role,
                    semitones: motion.semitones,
                });
            }
        }
    }
    log::debug!("computed {} resolution pairs", pairs.len());
    pairs
}

/// Score two MIDI voicings of consecutive chords.
///
/// Each voicing must cover exactly its chord's pitch classes (doublings are
/// fine, extras or omissions are not). Top-voice motion is compared exactly.
/// Total motion pairs voices by sorted pitch, not by role; voices beyond the
/// shorter voicing are left unpaired.
pub fn smooth_voicing_score(
    a: &Chord,
    b: &Chord,
    voicing_a: &[u8],
    voicing_b: &[u8],
    constraint: &VoicingConstraint,
) -> VoicingScore {
    let tones_complete = covers_exactly(a, voicing_a) && covers_exactly(b, voicing_b);

    let top_voice_motion_ok = match (voicing_a.iter().max(), voicing_b.iter().max()) {
        (Some(&top_a), Some(&top_b)) => {
            top_b as i32 - top_a as i32 == constraint.top_voice_motion_semitones as i32
        }
        _ => false,
    };

    let mut sorted_a = voicing_a.to_vec();
    let mut sorted_b = voicing_b.to_vec();
    sorted_a.sort_unstable();
    sorted_b.sort_unstable();
    let total_motion_semitones: u32 = sorted_a
        .iter()
        .zip(&sorted_b)
        .map(|(&from, &to)| (to as i32 - from as i32).unsigned_abs())
        .sum();

    VoicingScore {
        tones_complete,
        top_voice_motion_ok,
        total_motion_semitones,
        within_budget: total_motion_semitones <= constraint.max_total_motion_semitones,
    }
}

fn covers_exactly(chord: &Chord, voicing: &[u8]) -> bool {
    let voiced: BTreeSet<PitchClass> = voicing.iter().map(|&m| PitchClass::from_midi(m)).collect();
    voiced == chord.pitch_class_set()
}
