//! Drill commands (new, hint, skip, show, catalog)

use crate::commands::{CommandContext, CommandResult};
use crate::display;
use colored::*;
use comping_core::{Note, Topic, Variant};

/// Handle `new <topic> <variant> [root] [dominant]`
///
/// With no arguments the previous request is reused. For cadences, a chord
/// symbol (or `any`) replaces the V chord.
pub fn cmd_new(args: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let (topic, variant) = match parts.as_slice() {
        [] => match ctx.last_request {
            Some(request) => return ask(ctx, request.0, request.1),
            None => return CommandResult::Error(USAGE.to_string()),
        },
        [topic, variant, ..] => match (topic.parse::<Topic>(), variant.parse::<Variant>()) {
            (Ok(t), Ok(v)) => (t, v),
            (Err(e), _) | (_, Err(e)) => return CommandResult::Error(e.to_string()),
        },
        [_] => return CommandResult::Error(USAGE.to_string()),
    };

    ctx.filter.roots.clear();
    ctx.filter.dominant_substitution = None;
    ctx.filter.random_dominant = false;
    for extra in &parts[2..] {
        if let Ok(note) = extra.parse::<Note>() {
            ctx.filter.roots.push(note);
        } else if topic != Topic::Cadence {
            return CommandResult::Error(format!("Invalid root: {}", extra));
        } else if extra.eq_ignore_ascii_case("any") {
            ctx.filter.random_dominant = true;
        } else if ctx.catalog().chord(extra).is_ok() {
            ctx.filter.dominant_substitution = Some(extra.to_string());
        } else {
            return CommandResult::Error(format!("Not a root or chord symbol: {}", extra));
        }
    }

    ask(ctx, topic, variant)
}

const USAGE: &str = "Usage: new <topic> <variant> [root] [dominant]";

fn ask(ctx: &mut CommandContext<'_>, topic: Topic, variant: Variant) -> CommandResult {
    match ctx.ask(topic, variant) {
        Ok(question) => CommandResult::Message(render_question(question)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `hint`: reveal the next hint level for the current question
pub fn cmd_hint(_args: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(question) = &ctx.current else {
        return CommandResult::Error("No question to hint at".to_string());
    };
    let level = ctx.hint_level.next();
    ctx.hint_level = level;
    match question.hint(level) {
        Some(hint) => CommandResult::Message(format!(
            "{} {}",
            "💡".bright_yellow(),
            display::hint(&hint)
        )),
        None => CommandResult::Message("No further hints".to_string()),
    }
}

/// Handle `skip`: reveal the answer and drop the question
pub fn cmd_skip(_args: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
    match ctx.current.take() {
        Some(question) => CommandResult::Message(format!(
            "Answer: {}",
            display::answer(&question).bright_green()
        )),
        None => CommandResult::Error("Nothing to skip".to_string()),
    }
}

/// Handle `show`: repeat the current question
pub fn cmd_show(_args: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
    match &ctx.current {
        Some(question) => CommandResult::Message(render_question(question)),
        None => CommandResult::Error("No current question".to_string()),
    }
}

/// Handle `catalog [topic]`: list template symbols by topic
pub fn cmd_catalog(args: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
    let catalog = ctx.catalog();
    let topics = if args.is_empty() {
        Topic::ALL.to_vec()
    } else {
        match args.parse::<Topic>() {
            Ok(topic) => vec![topic],
            Err(e) => return CommandResult::Error(e.to_string()),
        }
    };

    let mut lines = Vec::new();
    for topic in topics {
        let entries: Vec<String> = match topic {
            Topic::Chord => catalog
                .chords
                .iter()
                .map(|t| entry(&t.symbol, &t.name, t.difficulty))
                .collect(),
            Topic::Scale => catalog
                .scales
                .iter()
                .map(|t| entry(&t.symbol, &t.name, t.difficulty))
                .collect(),
            Topic::Interval => catalog
                .intervals
                .iter()
                .map(|t| entry(&t.symbol, &t.name, t.difficulty))
                .collect(),
            Topic::Cadence => catalog
                .cadences
                .iter()
                .map(|t| entry(&t.symbol, &t.name, t.difficulty))
                .collect(),
        };
        lines.push(format!("{} ({})", topic.to_string().green().bold(), entries.len()));
        lines.extend(entries);
        if topic == Topic::Cadence && !catalog.dominant_variants.is_empty() {
            lines.push(format!(
                "  {} {}",
                "dominants:".dimmed(),
                catalog.dominant_variants.join(" ")
            ));
        }
    }
    CommandResult::Message(lines.join("\n"))
}

fn entry(symbol: &str, name: &str, difficulty: comping_core::types::Difficulty) -> String {
    let symbol = if symbol.is_empty() { "(none)" } else { symbol };
    format!("  {:<18} {} {}", symbol.cyan(), name, format!("[{}]", difficulty).dimmed())
}

fn render_question(question: &comping_core::Question) -> String {
    let mut lines = vec![display::prompt(question)];
    lines.extend(display::choices(question));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use comping_core::{Catalog, QuestionGenerator};

    #[test]
    fn test_new_with_root() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = CommandContext::new(QuestionGenerator::seeded(&catalog, 4));
        assert!(matches!(
            cmd_new("cadence guide-tones Eb", &mut ctx),
            CommandResult::Message(_)
        ));
        let question = ctx.current.as_ref().unwrap();
        assert!(question.item_identity().contains(":Eb:cadence:guide-tones"));
        assert_eq!(ctx.last_request, Some((Topic::Cadence, Variant::GuideTones)));
    }

    #[test]
    fn test_new_rejects_bad_requests() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = CommandContext::new(QuestionGenerator::seeded(&catalog, 4));
        assert!(matches!(cmd_new("", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_new("chord", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_new("interval voicing", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_new("chord all-tones H", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_new_with_dominant() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = CommandContext::new(QuestionGenerator::seeded(&catalog, 4));
        assert!(matches!(
            cmd_new("cadence guide-tones F 7alt", &mut ctx),
            CommandResult::Message(_)
        ));
        assert_eq!(ctx.filter.dominant_substitution.as_deref(), Some("7alt"));
        assert!(matches!(cmd_new("cadence resolution any", &mut ctx), CommandResult::Message(_)));
        assert!(ctx.filter.random_dominant);
        assert!(ctx.filter.roots.is_empty());
        assert!(matches!(cmd_new("chord all-tones 7alt", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_hints_escalate_then_skip() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = CommandContext::new(QuestionGenerator::seeded(&catalog, 4));
        cmd_new("scale all-tones", &mut ctx);
        for _ in 0..4 {
            assert!(matches!(cmd_hint("", &mut ctx), CommandResult::Message(_)));
        }
        assert_eq!(ctx.hint_level, comping_core::HintLevel::FirstNote);
        assert!(matches!(cmd_skip("", &mut ctx), CommandResult::Message(_)));
        assert!(ctx.current.is_none());
        assert!(matches!(cmd_skip("", &mut ctx), CommandResult::Error(_)));
    }
}
