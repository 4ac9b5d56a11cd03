//! General REPL commands (help, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use comping_core::Topic;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext<'_>) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext<'_>) -> CommandResult {
    CommandResult::Exit
}

/// Print help information
fn print_help() {
    println!("{}", "🎹 Comping Help".bold());
    println!("{}", "===============".bold());
    println!();
    println!("{}", "Drills:".green());
    println!("  {}  - Ask a new question", "new <topic> <variant> [root]".cyan());
    println!("  {}        - Cadence with a given V chord (or any)", "new cadence <variant> [root] <dominant>".cyan());
    println!("  {}                         - Reveal the next hint level", "hint".cyan());
    println!("  {}                         - Show the answer and move on", "skip".cyan());
    println!("  {}                         - Repeat the current question", "show".cyan());
    println!("  {}            - List templates, optionally for one topic", "catalog [topic]".cyan());
    println!();
    println!("{}", "Topics and variants:".green());
    for topic in Topic::ALL {
        let variants: Vec<String> = topic.variants().iter().map(|v| v.to_string()).collect();
        println!("  {:<10} {}", topic.to_string().cyan(), variants.join(", "));
    }
    println!();
    println!("{}", "Answering:".green());
    println!("  {}            - Note names, sharps or flats", "D F A C".cyan());
    println!("  {}      - One group per chord for guide tones", "F C | B F | E B".cyan());
    println!("  {} - MIDI notes for voicings", "50 53 57 60 | 50 53 55 59".cyan());
    println!("  {}                  - Option number for multiple choice", "2".cyan());
    println!();
    println!("{}", "Examples:".green());
    println!("  comping> {}", "new chord all-tones".cyan());
    println!("  Spell every note of Dm7");
    println!("  comping> {}", "D F A C".cyan());
    println!("  Correct! (hints: none)");
    println!();
    println!("  comping> {}", "new cadence resolution Eb".cyan());
    println!("  comping> {}", "new cadence guide-tones F 7alt".cyan());
    println!();
    println!("Type '{}' or '{}' to exit.", "quit".bright_red(), "exit".bright_red());
}
