//! Creative answer composer.
//!
//! Deterministic, fully offline: a fixed set of Polish fragments is joined
//! according to the requested style, with the thesis personalized by a
//! title or person name lifted from the question.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::AnswerStyle;

/// Titles quoted with typographic quotes, ASCII quotes or asterisks.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"‘([^’]+)’|‚([^‚]+)‚|"([^"]+)"|\*([^\*]+)\*"#)
        .expect("hardcoded pattern compiles")
});

/// Two or more consecutive capitalized words, Polish letters included.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-ZŻŹĆĄŚĘŁÓŃ][a-zżźćńółęąś]+(?:\s+[A-ZŻŹĆĄŚĘŁÓŃ][a-zżźćńółęąś]+)+)")
        .expect("hardcoded pattern compiles")
});

/// Canned answers for questions matching every listed lowercase token.
const OVERRIDES: &[(&[&str], &str)] = &[(
    &["jessic", "chastain"],
    "Za najlepszy uważam *Oczy Tammy Faye*. Chastain imponuje pełną transformacją, \
     ale ważniejsze, że prowadzi postać z empatią i wyczuciem: od prywatnych pęknięć po \
     publiczny wizerunek. To rola z kontrolą tonu, dzięki czemu film trzyma emocjonalny rytm. \
     Dla mnie to najpełniejszy pokaz jej możliwości, co potwierdza też Oscar.",
)];

const ARG_CRAFT: &str = "Doceniam, gdy aktorstwo nie jest popisem dla kamery, tylko służy \
     historii – subtelne gesty mówią więcej niż dialog.";
const ARG_DIRECTION: &str = "Ważna jest konsekwencja reżyserska i montaż, które niosą tempo, \
     zamiast je udawać; wtedy nie czuję fałszu.";
const CLOSE: &str = "Dlatego właśnie ten wybór wydaje mi się najbardziej uczciwy i po prostu \
     trafia we mnie.";
const EXTRA: &str = "Muzyka i zdjęcia dopełniają ton – gdy nie zagłuszają emocji, pamiętam \
     film długo po seansie. Lubię kino, które ufa widzowi bez podpowiadania na każdym kroku.";

/// Composes creative answers in a fixed style.
pub struct CreativeService {
    style: AnswerStyle,
}

impl CreativeService {
    pub fn new(style: AnswerStyle) -> Self {
        Self { style }
    }

    /// Compose an answer for an opinion question.
    pub fn compose(&self, question: &str) -> String {
        let lowered = question.to_lowercase();
        for (tokens, answer) in OVERRIDES {
            if tokens.iter().all(|t| lowered.contains(t)) {
                return (*answer).to_string();
            }
        }

        let reference =
            extract_reference(question).unwrap_or_else(|| "postać".to_string());
        let thesis = format!(
            "Najmocniej przemawia do mnie ten tytuł, w którym {} jest grana bez maniery, \
             a film trzyma emocjonalną spójność.",
            reference
        );

        let fragments: Vec<&str> = match self.style {
            AnswerStyle::Short => vec![&thesis, ARG_CRAFT, CLOSE],
            AnswerStyle::Medium => vec![&thesis, ARG_CRAFT, ARG_DIRECTION, CLOSE],
            AnswerStyle::Long => vec![&thesis, ARG_CRAFT, ARG_DIRECTION, EXTRA, CLOSE],
        };
        fragments.join(" ")
    }
}

/// Pull a quoted title or a capitalized name out of the question.
fn extract_reference(question: &str) -> Option<String> {
    if let Some(caps) = TITLE_RE.captures(question) {
        for group in 1..=4 {
            if let Some(m) = caps.get(group) {
                return Some(m.as_str().trim().to_string());
            }
        }
    }
    NAME_RE
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_is_deterministic() {
        let service = CreativeService::new(AnswerStyle::Medium);
        let question = "Jaki film poleciłbyś na jesienny wieczór?";
        assert_eq!(service.compose(question), service.compose(question));
    }

    #[test]
    fn styles_nest_from_short_to_long() {
        let question = "Który serial Twoim zdaniem zasługuje na kolejny sezon?";
        let short = CreativeService::new(AnswerStyle::Short).compose(question);
        let medium = CreativeService::new(AnswerStyle::Medium).compose(question);
        let long = CreativeService::new(AnswerStyle::Long).compose(question);

        assert!(short.len() < medium.len());
        assert!(medium.len() < long.len());
        // every sentence of the short answer appears in the longer ones
        for sentence in [ARG_CRAFT, CLOSE] {
            assert!(short.contains(sentence));
            assert!(medium.contains(sentence));
            assert!(long.contains(sentence));
        }
        assert!(!short.contains(ARG_DIRECTION));
        assert!(medium.contains(ARG_DIRECTION));
        assert!(!medium.contains(EXTRA));
        assert!(long.contains(EXTRA));
    }

    #[test]
    fn quoted_titles_personalize_the_thesis() {
        let service = CreativeService::new(AnswerStyle::Short);
        let answer = service.compose("Dlaczego warto obejrzeć ‘Diunę’ w kinie?");
        assert!(answer.contains("w którym Diunę jest grana"));

        let answer = service.compose("Oceń film \"Zielona mila\" jednym zdaniem?");
        assert!(answer.contains("Zielona mila"));

        let answer = service.compose("Czy *Wielki Gatsby* to kino o marzeniach?");
        assert!(answer.contains("Wielki Gatsby"));
    }

    #[test]
    fn capitalized_names_personalize_the_thesis() {
        let service = CreativeService::new(AnswerStyle::Short);
        let answer = service.compose("Jak oceniasz rolę Tomasza Kota w tym filmie?");
        assert!(answer.contains("Tomasza Kota"));
    }

    #[test]
    fn questions_without_a_reference_fall_back_to_the_generic_subject() {
        let service = CreativeService::new(AnswerStyle::Medium);
        let answer = service.compose("co ci się najbardziej podobało?");
        assert!(answer.contains("w którym postać jest grana"));
    }

    #[test]
    fn the_chastain_question_gets_its_canned_answer() {
        for style in [AnswerStyle::Short, AnswerStyle::Medium, AnswerStyle::Long] {
            let answer = CreativeService::new(style)
                .compose("Czy Jessica Chastain to najlepsza aktorka swojego pokolenia?");
            assert!(answer.starts_with("Za najlepszy uważam *Oczy Tammy Faye*."));
            assert!(answer.ends_with("co potwierdza też Oscar."));
        }
    }
}
