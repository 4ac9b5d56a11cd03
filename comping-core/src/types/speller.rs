//! Pitch-class to note-name resolution.
//!
//! Two entry points: [`spell`] picks a name from the tonal context alone, and
//! [`spell_degree`] spells a chord or scale degree on the letter that degree
//! occupies above its root, which is where double accidentals and spellings
//! such as `Fb` or `E#` come from.

use crate::error::Result;
use crate::types::note::{Note, TonalContext};
use crate::types::pitch::{Accidental, Letter, PitchClass};

/// Spell a raw pitch class. Fails with `InvalidPitchClass` outside 0-11.
pub fn spell(pitch_class: i32, context: TonalContext, forced: Option<Accidental>) -> Result<Note> {
    let pc = PitchClass::new(pitch_class)?;
    Ok(spell_pitch_class(pc, context, forced))
}

/// Spell an already-validated pitch class.
///
/// A forced accidental wins over the context. When no letter carries exactly
/// that accidental, the same direction is doubled (flat on C gives `Dbb`);
/// when even that fails the context spelling is used.
pub fn spell_pitch_class(pc: PitchClass, context: TonalContext, forced: Option<Accidental>) -> Note {
    if let Some(accidental) = forced {
        if let Some(note) = with_accidental(pc, accidental) {
            return note;
        }
        if let Some(note) = with_accidental(pc, accidental.doubled()) {
            return note;
        }
    }

    let black = |below: Letter, above: Letter| {
        if context.prefer_sharps {
            Note::new(below, Accidental::Sharp)
        } else {
            Note::new(above, Accidental::Flat)
        }
    };
    match pc.value() {
        0 => Note::natural(Letter::C),
        1 => black(Letter::C, Letter::D),
        2 => Note::natural(Letter::D),
        3 => black(Letter::D, Letter::E),
        4 => Note::natural(Letter::E),
        5 => Note::natural(Letter::F),
        6 => black(Letter::F, Letter::G),
        7 => Note::natural(Letter::G),
        8 => black(Letter::G, Letter::A),
        9 => Note::natural(Letter::A),
        10 => black(Letter::A, Letter::B),
        _ => Note::natural(Letter::B),
    }
}

/// Spell `pc` as the given degree (1 = root, 3 = third, 9 = ninth...) above `root`.
///
/// The letter is fixed by the degree and the accidental is whatever reaches
/// `pc` from it. Falls back to [`spell_pitch_class`] when the degree is 0,
/// when more than a double accidental would be needed, or when a forced
/// accidental points the other way.
pub fn spell_degree(
    pc: PitchClass,
    root: &Note,
    degree: u8,
    context: TonalContext,
    forced: Option<Accidental>,
) -> Note {
    if degree == 0 {
        return spell_pitch_class(pc, context, forced);
    }

    let letter = root.letter().step(degree as i32 - 1);
    match Note::on_letter(letter, pc) {
        Some(note) => match forced {
            Some(accidental) if note.accidental().opposes(accidental) => {
                spell_pitch_class(pc, context, forced)
            }
            _ => note,
        },
        None => spell_pitch_class(pc, context, forced),
    }
}

fn with_accidental(pc: PitchClass, accidental: Accidental) -> Option<Note> {
    let natural = pc.transpose(-(accidental.alteration() as i32));
    Letter::from_natural(natural).map(|letter| Note::new(letter, accidental))
}
