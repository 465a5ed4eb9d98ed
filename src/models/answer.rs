//! Answer strategy and style enums shared by the CLI and the workflow.

use std::fmt;

use clap::ValueEnum;

/// Answer strategy requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnswerMode {
    /// Classify the question, then pick fact or creative.
    Auto,
    Creative,
    Fact,
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnswerMode::Auto => "auto",
            AnswerMode::Creative => "creative",
            AnswerMode::Fact => "fact",
        };
        write!(f, "{}", label)
    }
}

/// Length profile for templated creative answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnswerStyle {
    Short,
    Medium,
    Long,
}

impl fmt::Display for AnswerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnswerStyle::Short => "short",
            AnswerStyle::Medium => "medium",
            AnswerStyle::Long => "long",
        };
        write!(f, "{}", label)
    }
}

/// What kind of answer a question calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Fact,
    Creative,
}

impl QuestionKind {
    /// Label used in `auto-><label>` mode annotations.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Fact => "fact",
            QuestionKind::Creative => "creative",
        }
    }
}
