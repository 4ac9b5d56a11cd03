use crate::error::{DrillError, Result};
use crate::types::note::{Note, TonalContext};
use crate::types::pitch::PitchClass;
use crate::types::speller::spell_degree;
use crate::types::template::IntervalTemplate;
use std::fmt;

/// An interval template measured up from a concrete root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedInterval {
    root: Note,
    template: IntervalTemplate,
    upper: Note,
}

impl ResolvedInterval {
    /// The upper note sits `steps` letters and `semitones` half steps above the root.
    pub fn resolve(root: Note, template: &IntervalTemplate) -> Result<Self> {
        if template.steps > 7 || template.semitones > 12 {
            return Err(DrillError::UnknownTemplate(format!(
                "interval `{}` spans {} semitones over {} letters",
                template.symbol, template.semitones, template.steps
            )));
        }
        let context = TonalContext::for_root(&root, Default::default());
        let pc = root.pitch_class().transpose(template.semitones as i32);
        let upper = if template.semitones % 12 == 0 && template.steps % 7 == 0 {
            root
        } else {
            spell_degree(pc, &root, template.steps + 1, context, None)
        };
        Ok(ResolvedInterval {
            root,
            template: template.clone(),
            upper,
        })
    }

    pub fn root(&self) -> Note {
        self.root
    }

    pub fn template(&self) -> &IntervalTemplate {
        &self.template
    }

    pub fn upper(&self) -> Note {
        self.upper
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        vec![self.root.pitch_class(), self.upper.pitch_class()]
    }
}

impl fmt::Display for ResolvedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} above {}: {}", self.template.name, self.root, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::template::Difficulty;

    fn note(name: &str) -> Note {
        name.parse().unwrap()
    }

    #[test]
    fn test_interval_spelling_follows_letters() {
        let minor_third = IntervalTemplate::new("m3", "minor third", 3, 2, Difficulty::Beginner);
        let augmented_second = IntervalTemplate::new("A2", "augmented second", 3, 1, Difficulty::Advanced);
        let tritone = IntervalTemplate::new("d5", "diminished fifth", 6, 4, Difficulty::Intermediate);

        assert_eq!(ResolvedInterval::resolve(note("D"), &minor_third).unwrap().upper(), note("F"));
        assert_eq!(ResolvedInterval::resolve(note("E"), &minor_third).unwrap().upper(), note("G"));
        assert_eq!(ResolvedInterval::resolve(note("D"), &augmented_second).unwrap().upper(), note("E#"));
        assert_eq!(ResolvedInterval::resolve(note("C"), &tritone).unwrap().upper(), note("Gb"));
        assert_eq!(ResolvedInterval::resolve(note("F#"), &tritone).unwrap().upper(), note("C"));
    }

    #[test]
    fn test_out_of_range_interval_is_a_template_error() {
        let too_many_letters = IntervalTemplate::new("x", "broken", 3, 255, Difficulty::Beginner);
        let too_wide = IntervalTemplate::new("y", "broken", 200, 2, Difficulty::Beginner);
        for template in [too_many_letters, too_wide] {
            let err = ResolvedInterval::resolve(note("C"), &template).unwrap_err();
            assert!(matches!(err, DrillError::UnknownTemplate(_)));
            assert!(err.is_catalog_fault());
        }
    }

    #[test]
    fn test_octave_repeats_root() {
        let octave = IntervalTemplate::new("P8", "octave", 12, 7, Difficulty::Beginner);
        let resolved = ResolvedInterval::resolve(note("Ab"), &octave).unwrap();
        assert_eq!(resolved.upper(), note("Ab"));
        assert_eq!(resolved.pitch_classes()[0], resolved.pitch_classes()[1]);
    }
}
