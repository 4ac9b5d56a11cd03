//! REPL (Read-Eval-Print Loop) for jazz-harmony drills

use crate::commands::{create_registry, CommandContext, CommandResult};
use crate::display;
use anyhow::Result;
use colored::*;
use comping_core::{Catalog, QuestionGenerator};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};

/// Interactive drill session over one catalog
pub struct Repl<'a> {
    editor: DefaultEditor,
    ctx: CommandContext<'a>,
}

impl<'a> Repl<'a> {
    /// Create a new REPL instance
    pub fn new(generator: QuestionGenerator<'a>) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Repl {
            editor,
            ctx: CommandContext::new(generator),
        })
    }

    /// Handle one line of input. Returns false when the session should end.
    pub fn handle_line(&mut self, line: &str, registry: &crate::commands::CommandRegistry) -> bool {
        match registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return false,
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::NotACommand => match self.ctx.check(line) {
                Ok(verdict) => {
                    println!("{}", display::verdict(&verdict));
                    if !verdict.is_correct {
                        return true;
                    }
                    // Move straight on to the next question of the same kind
                    if let Some((topic, variant)) = self.ctx.last_request {
                        match self.ctx.ask(topic, variant) {
                            Ok(question) => {
                                let mut lines = vec![display::prompt(question)];
                                lines.extend(display::choices(question));
                                println!("\n{}", lines.join("\n"));
                            }
                            Err(e) => println!("{} {}", "Error:".bright_red().bold(), e.to_string().red()),
                        }
                    }
                }
                Err(e) => println!(
                    "{} {}",
                    "Could not evaluate:".bright_red().bold(),
                    e.to_string().red()
                ),
            },
        }
        true
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎹".bright_yellow(),
            "Comping: jazz-harmony drills".bright_cyan().bold()
        );
        println!(
            "Start with: {}, {}, {}",
            "new chord all-tones".cyan(),
            "new scale single-tone Bb".cyan(),
            "new cadence resolution".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let registry = create_registry();

        loop {
            let prompt = format!("{} ", "comping>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);
                    if !self.handle_line(line, &registry) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        println!(
            "{} {}/{} correct 🎵",
            "Goodbye!".bright_cyan(),
            self.ctx.correct,
            self.ctx.answered
        );
        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start(catalog: &Catalog, seed: Option<u64>) -> Result<()> {
    let generator = match seed {
        Some(seed) => QuestionGenerator::seeded(catalog, seed),
        None => QuestionGenerator::from_entropy(catalog),
    };
    let mut repl =
        Repl::new(generator).map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
