//! Drill questions: generation from a catalog and validation of answers.

pub mod generator;
pub mod question;
pub mod validator;

pub use generator::{voicing_constraints, GeneratorConfig, QuestionFilter, QuestionGenerator};
pub use question::{
    Answer, AnswerExpectation, Choice, Focus, Hint, HintLevel, Question, Subject, Topic, Variant,
};
pub use validator::{validate, Reason, Verdict};
