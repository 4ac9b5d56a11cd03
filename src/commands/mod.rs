//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod drill;
pub mod general;

use comping_core::drill::Verdict;
use comping_core::{
    validate, Catalog, HintLevel, Question, QuestionFilter, QuestionGenerator, Topic, Variant,
};

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, try parsing as an answer
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Drill session state passed to command handlers
pub struct CommandContext<'a> {
    pub generator: QuestionGenerator<'a>,
    pub filter: QuestionFilter,
    pub current: Option<Question>,
    pub hint_level: HintLevel,
    /// Topic and variant of the last `new`, reused after each answer
    pub last_request: Option<(Topic, Variant)>,
    pub answered: usize,
    pub correct: usize,
}

impl<'a> CommandContext<'a> {
    pub fn new(generator: QuestionGenerator<'a>) -> Self {
        Self {
            generator,
            filter: QuestionFilter::new(),
            current: None,
            hint_level: HintLevel::None,
            last_request: None,
            answered: 0,
            correct: 0,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.generator.catalog()
    }

    /// Generate a question and make it current.
    pub fn ask(&mut self, topic: Topic, variant: Variant) -> anyhow::Result<&Question> {
        let question = self.generator.generate(topic, variant, &self.filter)?;
        self.last_request = Some((topic, variant));
        self.hint_level = HintLevel::None;
        Ok(self.current.insert(question))
    }

    /// Validate an answer to the current question and keep score.
    pub fn check(&mut self, input: &str) -> anyhow::Result<Verdict> {
        let question = self
            .current
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No question yet. Try 'new chord all-tones'"))?;
        let answer = crate::answer::parse_answer(input, question)?;
        let verdict = validate(&question.expectation, &answer, self.hint_level)?;
        log::debug!("{} -> {:?}", question.item_identity(), verdict);
        self.answered += 1;
        if verdict.is_correct {
            self.correct += 1;
        }
        Ok(verdict)
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext<'_>) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix (e.g., "new")
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Drill commands
    registry.register("new", drill::cmd_new);
    registry.register("hint", drill::cmd_hint);
    registry.register("skip", drill::cmd_skip);
    registry.register("show", drill::cmd_show);
    registry.register("catalog", drill::cmd_catalog);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(catalog: &Catalog) -> CommandContext<'_> {
        CommandContext::new(QuestionGenerator::seeded(catalog, 1))
    }

    #[test]
    fn test_prefix_matching() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = context(&catalog);
        let registry = create_registry();
        assert!(matches!(registry.execute("quit", &mut ctx), CommandResult::Exit));
        assert!(matches!(registry.execute("exit", &mut ctx), CommandResult::Exit));
        // answers that happen to start like a command word are not commands
        assert!(matches!(registry.execute("newt", &mut ctx), CommandResult::NotACommand));
        assert!(matches!(registry.execute("D F A C", &mut ctx), CommandResult::NotACommand));
        assert_eq!(registry.list_commands().len(), 8);
    }

    #[test]
    fn test_check_without_question() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = context(&catalog);
        assert!(ctx.check("C E G").is_err());
    }

    #[test]
    fn test_ask_and_check() {
        let catalog = Catalog::jazz_standard();
        let mut ctx = context(&catalog);
        let answer = {
            let question = ctx.ask(Topic::Chord, Variant::AllTones).unwrap();
            question
                .answer_notes
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        assert!(ctx.check(&answer).unwrap().is_correct);
        assert_eq!((ctx.answered, ctx.correct), (1, 1));
    }
}
