use crate::error::{DrillError, Result};
use crate::types::note::{Note, TonalContext};
use crate::types::pitch::PitchClass;
use crate::types::speller::{spell_degree, spell_pitch_class};
use crate::types::template::ScaleTemplate;
use std::collections::BTreeSet;
use std::fmt;

/// One numbered degree of a resolved scale (degree 1 is the root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleDegree {
    pub number: u8,
    pub note: Note,
}

/// A scale template expanded on a concrete root, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    root: Note,
    template: ScaleTemplate,
    context: TonalContext,
    degrees: Vec<ScaleDegree>,
}

impl Scale {
    /// Expand `template` on `root`.
    ///
    /// Seven-note scales get one letter per degree; any other size is spelled
    /// from the root's tonal context. An octave degree repeats degree 1's note.
    pub fn resolve(root: Note, template: &ScaleTemplate) -> Result<Self> {
        let context = TonalContext::for_root(&root, template.tonality);
        let body_len = if template.has_octave() {
            template.offsets.len() - 1
        } else {
            template.offsets.len()
        };
        let heptatonic = body_len == 7;

        let mut seen = BTreeSet::new();
        let mut degrees = Vec::with_capacity(template.offsets.len());
        for (index, &offset) in template.offsets[..body_len].iter().enumerate() {
            let number = index as u8 + 1;
            let pc = root.pitch_class().transpose(offset as i32);
            if !seen.insert(pc) {
                return Err(DrillError::DuplicatePitchClass {
                    symbol: template.symbol.clone(),
                    pitch_class: pc,
                });
            }

            let note = if index == 0 && offset % 12 == 0 {
                root
            } else if heptatonic {
                spell_degree(pc, &root, number, context, None)
            } else {
                spell_pitch_class(pc, context, None)
            };
            degrees.push(ScaleDegree { number, note });
        }

        if template.has_octave() {
            degrees.push(ScaleDegree {
                number: body_len as u8 + 1,
                note: degrees.first().map(|d| d.note).unwrap_or(root),
            });
        }

        Ok(Scale {
            root,
            template: template.clone(),
            context,
            degrees,
        })
    }

    pub fn root(&self) -> Note {
        self.root
    }

    pub fn template(&self) -> &ScaleTemplate {
        &self.template
    }

    pub fn context(&self) -> TonalContext {
        self.context
    }

    /// Every degree including the octave, for ascending/descending playback.
    pub fn degrees(&self) -> &[ScaleDegree] {
        &self.degrees
    }

    pub fn degree(&self, number: u8) -> Option<&ScaleDegree> {
        self.degrees.iter().find(|d| d.number == number)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.degrees.iter().map(|d| d.note).collect()
    }

    /// Degrees that count for answers: the octave is left out.
    pub fn answer_degrees(&self) -> &[ScaleDegree] {
        if self.template.has_octave() {
            &self.degrees[..self.degrees.len() - 1]
        } else {
            &self.degrees
        }
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.degrees.iter().map(|d| d.note.pitch_class()).collect()
    }

    pub fn pitch_class_set(&self) -> BTreeSet<PitchClass> {
        self.answer_degrees()
            .iter()
            .map(|d| d.note.pitch_class())
            .collect()
    }

    pub fn symbol(&self) -> String {
        format!("{} {}", self.root, self.template.symbol)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.degrees.iter().map(|d| d.note.to_string()).collect();
        write!(f, "{} {}: [{}]", self.root, self.template.name, names.join(", "))
    }
}
