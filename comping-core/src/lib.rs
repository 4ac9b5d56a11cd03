//! # Comping Core
//!
//! Music-theory resolution and answer validation for jazz-harmony drills.
//! Pure and synchronous, with no terminal or audio access.
//!
//! ## Features
//!
//! - **serde**: (de)serialize templates, resolved entities and questions;
//!   load catalogs from JSON
//!
//! ## Example
//!
//! ```ignore
//! use comping_core::{Catalog, QuestionFilter, QuestionGenerator, Topic, Variant};
//!
//! let catalog = Catalog::jazz_standard();
//! let mut generator = QuestionGenerator::seeded(&catalog, 42);
//! let question = generator.generate(Topic::Chord, Variant::AllTones, &QuestionFilter::new())?;
//! println!("{}", question.subject);
//! ```

pub mod catalog;
pub mod drill;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, RootEntry};
pub use drill::{
    validate, Answer, AnswerExpectation, HintLevel, Question, QuestionFilter, QuestionGenerator,
    Topic, Variant, Verdict,
};
pub use error::{DrillError, Result};
pub use types::{CadenceProgression, Chord, Note, PitchClass, ResolvedInterval, Scale};
