//! Stable identities for resolved entities, used by the spaced-repetition
//! layer to key review items without re-deriving music-theory facts.

use crate::types::chord::Chord;
use crate::types::interval::ResolvedInterval;
use crate::types::progression::CadenceProgression;
use crate::types::scale::Scale;

/// Anything resolved from a template on a root or key.
pub trait Identified {
    /// Entity kind, template symbol and root name joined with `:`.
    fn identity_key(&self) -> String;
}

impl Identified for Chord {
    fn identity_key(&self) -> String {
        format!("chord:{}:{}", self.template().symbol, self.root())
    }
}

impl Identified for Scale {
    fn identity_key(&self) -> String {
        format!("scale:{}:{}", self.template().symbol, self.root())
    }
}

impl Identified for ResolvedInterval {
    fn identity_key(&self) -> String {
        format!("interval:{}:{}", self.template().symbol, self.root())
    }
}

impl Identified for CadenceProgression {
    fn identity_key(&self) -> String {
        format!("cadence:{}:{}", self.template().symbol, self.key())
    }
}

pub fn identity_key<T: Identified + ?Sized>(entity: &T) -> String {
    entity.identity_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::template::{CadenceTemplate, ChordTemplate, Difficulty, Role, ScaleTemplate};

    fn m7() -> ChordTemplate {
        ChordTemplate::new("m7", "minor seventh", Difficulty::Beginner)
            .minor()
            .tone(Role::Root, 0)
            .tone(Role::Third, 3)
            .tone(Role::Fifth, 7)
            .tone(Role::Seventh, 10)
    }

    #[test]
    fn test_identity_keys() {
        let chord = Chord::resolve("D".parse().unwrap(), &m7()).unwrap();
        assert_eq!(identity_key(&chord), "chord:m7:D");

        let dorian = ScaleTemplate::new("dorian", "Dorian", &[0, 2, 3, 5, 7, 9, 10], Difficulty::Beginner);
        let scale = Scale::resolve("Bb".parse().unwrap(), &dorian).unwrap();
        assert_eq!(identity_key(&scale), "scale:dorian:Bb");

        let cadence = CadenceTemplate::new("ii-V", "ii-V", Difficulty::Beginner).step("ii", m7(), 2);
        let progression = CadenceProgression::resolve("Eb".parse().unwrap(), &cadence).unwrap();
        assert_eq!(identity_key(&progression), "cadence:ii-V:Eb");
    }

    #[test]
    fn test_enharmonic_roots_are_distinct_items() {
        let sharp = Chord::resolve("F#".parse().unwrap(), &m7()).unwrap();
        let flat = Chord::resolve("Gb".parse().unwrap(), &m7()).unwrap();
        assert_ne!(identity_key(&sharp), identity_key(&flat));
    }
}
