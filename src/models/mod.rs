pub mod answer;
pub mod entry;

pub use answer::{AnswerMode, AnswerStyle, QuestionKind};
pub use entry::{LedgerEntry, Status, COUNTED_STATUSES};
