//! Text rendering of questions, hints and verdicts

use colored::*;
use comping_core::drill::{Focus, Hint, Reason, Subject};
use comping_core::types::{spell_pitch_class, PitchClass, TonalContext};
use comping_core::{Note, Question, Verdict};
use std::collections::BTreeSet;

/// One-line prompt for a question.
pub fn prompt(question: &Question) -> String {
    let subject = question.subject.to_string().bright_cyan().bold();
    match &question.focus {
        Focus::Whole => format!("Spell every note of {}", subject),
        Focus::Role(role) => format!("What is the {} of {}?", role, subject),
        Focus::Degree(number) => format!("What is degree {} of {}?", number, subject),
        Focus::UpperNote => format!("Which note is a {}?", subject),
        Focus::Quality => match &question.subject {
            Subject::Interval(interval) => {
                format!("Name the interval {} to {}", interval.root(), interval.upper())
            }
            _ => format!("Name the quality of {}", notes(&question.answer_notes).bright_cyan()),
        },
        Focus::GuideTones => match &question.subject {
            Subject::Cadence(_) => format!("Guide tones of each chord in {} (separate chords with |)", subject),
            _ => format!("Guide tones of {}", subject),
        },
        Focus::Resolution {
            chord_index,
            role,
            note,
        } => format!(
            "In {}, where does the {} ({}) of chord {} resolve?",
            subject,
            role,
            note,
            chord_index + 1
        ),
        Focus::Voicings(constraints) => {
            let motions: Vec<String> = constraints
                .iter()
                .map(|c| format!("{:+} (max {})", c.top_voice_motion_semitones, c.max_total_motion_semitones))
                .collect();
            format!(
                "Voice {} as MIDI notes, chords separated by |. Top voice moves {}",
                subject,
                motions.join(", then ")
            )
        }
    }
}

/// Numbered multiple-choice options.
pub fn choices(question: &Question) -> Vec<String> {
    question
        .choices
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let symbol = if c.symbol.is_empty() { "(none)" } else { c.symbol.as_str() };
            format!("  {}) {} {}", i + 1, symbol.cyan(), c.name.dimmed())
        })
        .collect()
}

pub fn hint(hint: &Hint) -> String {
    match hint {
        Hint::Formula { labels, offsets } => {
            let parts: Vec<String> = labels
                .iter()
                .zip(offsets)
                .map(|(label, offset)| format!("{}={}", label, offset))
                .collect();
            format!("Formula: {}", parts.join(" "))
        }
        Hint::Intervals(steps) => {
            let steps: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
            format!("Semitones between notes: {}", steps.join(" "))
        }
        Hint::FirstNote(note) => format!("Starts on {}", note),
    }
}

pub fn answer(question: &Question) -> String {
    notes(&question.answer_notes)
}

pub fn verdict(verdict: &Verdict) -> String {
    if verdict.is_correct {
        return format!("{} (hints: {})", "Correct!".bright_green().bold(), verdict.hint_level);
    }
    let detail = match &verdict.reason {
        Some(Reason::WrongNote { expected, given }) => {
            format!("expected {}, got {}", name(*expected), name(*given))
        }
        Some(Reason::WrongSet { missing, extra }) => set_detail(missing, extra),
        Some(Reason::WrongChoice { given, .. }) => format!("{} is not it", given),
        Some(Reason::WrongPosition {
            position,
            missing,
            extra,
        }) => format!("chord {}: {}", position + 1, set_detail(missing, extra)),
        Some(Reason::RoughVoicing { position, score }) => {
            let mut problems = Vec::new();
            if !score.tones_complete {
                problems.push("chord tones incomplete".to_string());
            }
            if !score.top_voice_motion_ok {
                problems.push("top voice motion is off".to_string());
            }
            if !score.within_budget {
                problems.push(format!("voices move {} semitones", score.total_motion_semitones));
            }
            format!("chords {}-{}: {}", position + 1, position + 2, problems.join(", "))
        }
        None => String::new(),
    };
    format!("{} {}", "Not quite:".bright_red().bold(), detail)
}

fn set_detail(missing: &BTreeSet<PitchClass>, extra: &BTreeSet<PitchClass>) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing {}", names(missing)));
    }
    if !extra.is_empty() {
        parts.push(format!("extra {}", names(extra)));
    }
    parts.join(", ")
}

fn name(pc: PitchClass) -> String {
    spell_pitch_class(pc, TonalContext::flats(), None).to_string()
}

fn names(set: &BTreeSet<PitchClass>) -> String {
    set.iter().map(|&pc| name(pc)).collect::<Vec<_>>().join(" ")
}

fn notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
