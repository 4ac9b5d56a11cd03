//! Turning a typed line into an [`Answer`] for the current question

use anyhow::{anyhow, bail, Result};
use comping_core::drill::Choice;
use comping_core::{Answer, Note, Question, Variant};

/// Parse `input` as an answer of the kind `question` expects.
///
/// Notes are names (`Bb`, `F#`, `Ebb`); several notes may be separated by
/// spaces or commas, positions by `|`. Voicings are MIDI numbers. Multiple
/// choice accepts an option number, symbol or name.
pub fn parse_answer(input: &str, question: &Question) -> Result<Answer> {
    let input = input.trim();
    match question.variant {
        Variant::SingleTone | Variant::ResolutionTarget => {
            let notes = parse_notes(input)?;
            match notes.as_slice() {
                [single] => Ok(Answer::SingleNote(*single)),
                _ => bail!("Expected exactly one note, got {}", notes.len()),
            }
        }
        Variant::AllTones => Ok(Answer::PitchSet(parse_notes(input)?)),
        Variant::GuideTones => Ok(Answer::PerPosition(
            positions(input)
                .map(parse_notes)
                .collect::<Result<Vec<_>>>()?,
        )),
        Variant::SmoothVoicing => Ok(Answer::Voicings(
            positions(input)
                .map(parse_midi)
                .collect::<Result<Vec<_>>>()?,
        )),
        Variant::AuralQuality => Ok(Answer::Choice(parse_choice(input, &question.choices))),
    }
}

fn positions(input: &str) -> impl Iterator<Item = &str> {
    input.split('|').map(str::trim)
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Note names to pitch classes.
pub fn parse_notes(input: &str) -> Result<Vec<i32>> {
    let notes = tokens(input)
        .map(|token| {
            token
                .parse::<Note>()
                .map(|note| note.pitch_class().value() as i32)
                .map_err(|e| anyhow!(e))
        })
        .collect::<Result<Vec<_>>>()?;
    if notes.is_empty() {
        bail!("Expected at least one note name");
    }
    Ok(notes)
}

/// MIDI numbers, range-checked later by the validator.
pub fn parse_midi(input: &str) -> Result<Vec<i32>> {
    tokens(input)
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| anyhow!("'{}' is not a MIDI note number", token))
        })
        .collect()
}

/// Option number (1-based), symbol, or case-insensitive name; anything else
/// is passed through as typed.
pub fn parse_choice(input: &str, choices: &[Choice]) -> String {
    if let Ok(number) = input.parse::<usize>() {
        if let Some(choice) = number.checked_sub(1).and_then(|i| choices.get(i)) {
            return choice.symbol.clone();
        }
    }
    choices
        .iter()
        .find(|c| c.symbol == input || c.name.eq_ignore_ascii_case(input))
        .map(|c| c.symbol.clone())
        .unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        vec![
            Choice {
                symbol: "m7".to_string(),
                name: "minor seventh".to_string(),
            },
            Choice {
                symbol: "".to_string(),
                name: "major triad".to_string(),
            },
        ]
    }

    #[test]
    fn test_parse_notes() {
        assert_eq!(parse_notes("D F A C").unwrap(), vec![2, 5, 9, 0]);
        assert_eq!(parse_notes("Bb, Ebb,F#").unwrap(), vec![10, 2, 6]);
        assert!(parse_notes("D Q").is_err());
        assert!(parse_notes("  ").is_err());
    }

    #[test]
    fn test_parse_midi() {
        assert_eq!(parse_midi("62 65 69 72").unwrap(), vec![62, 65, 69, 72]);
        assert!(parse_midi("62 sixty").is_err());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", &choices()), "m7");
        assert_eq!(parse_choice("2", &choices()), "");
        assert_eq!(parse_choice("Major Triad", &choices()), "");
        assert_eq!(parse_choice("m7", &choices()), "m7");
        assert_eq!(parse_choice("9", &choices()), "9");
    }
}
