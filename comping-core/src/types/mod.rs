// comping-core/src/types/mod.rs

pub mod chord;
pub mod identity;
pub mod interval;
pub mod note;
pub mod pitch;
pub mod progression;
pub mod scale;
pub mod speller;
pub mod template;
pub mod voice_leading;

pub use chord::{Chord, ChordTone};
pub use identity::{identity_key, Identified};
pub use interval::ResolvedInterval;
pub use note::{key_signature, Note, TonalContext, Tonality};
pub use pitch::{Accidental, Letter, PitchClass};
pub use progression::CadenceProgression;
pub use scale::{Scale, ScaleDegree};
pub use speller::{spell, spell_degree, spell_pitch_class};
pub use template::{
    CadenceStep, CadenceTemplate, ChordTemplate, ChordToneTemplate, Difficulty, IntervalTemplate,
    Role, ScaleTemplate,
};
pub use voice_leading::{
    common_tones, guide_tone_roles, guide_tones, minimal_voice_leading_distance,
    resolution_pairs, resolution_pairs_for, smooth_voicing_score, Motion, ResolutionPair,
    VoicingConstraint, VoicingScore,
};
