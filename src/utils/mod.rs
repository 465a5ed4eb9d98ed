pub mod text;

pub use text::{cap_chars, encode_query, normalize_ws, pick_question_line, truncate_text};
