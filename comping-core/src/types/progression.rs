use crate::error::{DrillError, Result};
use crate::types::chord::Chord;
use crate::types::note::{Note, TonalContext};
use crate::types::speller::spell_degree;
use crate::types::template::CadenceTemplate;
use std::fmt;
use std::ops::Index;

/// A cadence template expanded in a concrete key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceProgression {
    key: Note,
    template: CadenceTemplate,
    chords: Vec<Chord>,
}

impl CadenceProgression {
    /// Resolve every position of `template` in `key`.
    ///
    /// Each chord root is `key + offset`, spelled on the degree named by the
    /// position's roman numeral. The resolver does not care which dominant
    /// variant a position holds; substitutions happen on the template first.
    pub fn resolve(key: Note, template: &CadenceTemplate) -> Result<Self> {
        if template.steps.is_empty() {
            return Err(DrillError::EmptyCadence(template.symbol.clone()));
        }

        let key_context = TonalContext::for_root(&key, Default::default());
        let chords = template
            .steps
            .iter()
            .map(|step| {
                let pc = key.pitch_class().transpose(step.offset_from_key as i32);
                let root = spell_degree(pc, &key, step.degree().unwrap_or(0), key_context, None);
                Chord::resolve(root, &step.chord)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CadenceProgression {
            key,
            template: template.clone(),
            chords,
        })
    }

    pub fn key(&self) -> Note {
        self.key
    }

    pub fn template(&self) -> &CadenceTemplate {
        &self.template
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chord> {
        self.chords.get(index)
    }

    /// Adjacent chord pairs with the index of the first chord.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &Chord, &Chord)> {
        self.chords
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (i, &pair[0], &pair[1]))
    }

    pub fn function_labels(&self) -> Vec<&str> {
        self.template
            .steps
            .iter()
            .map(|s| s.function_label.as_str())
            .collect()
    }
}

impl Index<usize> for CadenceProgression {
    type Output = Chord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.chords[index]
    }
}

impl fmt::Display for CadenceProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<String> = self.chords.iter().map(|c| c.symbol()).collect();
        write!(
            f,
            "{} in {}: {}",
            self.template.symbol,
            self.key,
            symbols.join(" | ")
        )
    }
}
