use crate::error::{DrillError, Result};
use crate::types::note::{Note, TonalContext};
use crate::types::pitch::PitchClass;
use crate::types::speller::spell_degree;
use crate::types::template::{ChordTemplate, Role};
use std::collections::BTreeSet;
use std::fmt;

/// One spelled tone of a resolved chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordTone {
    pub role: Role,
    pub note: Note,
}

/// A chord template expanded on a concrete root.
///
/// Immutable once built; tones keep the template's order (root first) and
/// carry unique pitch classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    root: Note,
    template: ChordTemplate,
    context: TonalContext,
    tones: Vec<ChordTone>,
}

impl Chord {
    /// Expand `template` on `root`.
    ///
    /// Each tone is spelled on the letter its role occupies above the root, so
    /// altered extensions and diminished sevenths keep their theoretical names.
    /// Fails with `DuplicatePitchClass` when two tones land on the same pitch class.
    pub fn resolve(root: Note, template: &ChordTemplate) -> Result<Self> {
        let context = TonalContext::for_root(&root, template.tonality);
        let mut seen = BTreeSet::new();
        let mut tones = Vec::with_capacity(template.tones.len());

        for tone in &template.tones {
            let pc = root.pitch_class().transpose(tone.semitone_offset as i32);
            if !seen.insert(pc) {
                return Err(DrillError::DuplicatePitchClass {
                    symbol: template.symbol.clone(),
                    pitch_class: pc,
                });
            }

            let note = if tone.role == Role::Root && tone.semitone_offset % 12 == 0 {
                root
            } else {
                spell_degree(pc, &root, tone.role.degree(), context, tone.forced_accidental)
            };
            tones.push(ChordTone {
                role: tone.role,
                note,
            });
        }

        Ok(Chord {
            root,
            template: template.clone(),
            context,
            tones,
        })
    }

    pub fn root(&self) -> Note {
        self.root
    }

    pub fn template(&self) -> &ChordTemplate {
        &self.template
    }

    pub fn context(&self) -> TonalContext {
        self.context
    }

    pub fn tones(&self) -> &[ChordTone] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Notes in template order.
    pub fn notes(&self) -> Vec<Note> {
        self.tones.iter().map(|t| t.note).collect()
    }

    /// Pitch classes in template order, for playback.
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.tones.iter().map(|t| t.note.pitch_class()).collect()
    }

    /// Pitch classes as a set, for comparisons.
    pub fn pitch_class_set(&self) -> BTreeSet<PitchClass> {
        self.tones.iter().map(|t| t.note.pitch_class()).collect()
    }

    pub fn tone(&self, role: Role) -> Option<&ChordTone> {
        self.tones.iter().find(|t| t.role == role)
    }

    pub fn role_of(&self, pc: PitchClass) -> Option<Role> {
        self.tones
            .iter()
            .find(|t| t.note.pitch_class() == pc)
            .map(|t| t.role)
    }

    /// Chord symbol, e.g. `Dm7` or `Bb7b9`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.root, self.template.symbol)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.tones.iter().map(|t| t.note.to_string()).collect();
        write!(f, "{}: [{}]", self.symbol(), names.join(", "))
    }
}
