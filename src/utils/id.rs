// src/utils/id.rs

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::AppError;

/// `id := examCode chapterOrdinal "-" sequence`
/// `examCode := letters`, `chapterOrdinal := digits`, `sequence := digits`.
static QUESTION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<exam>[A-Za-z]+)(?P<ordinal>[0-9]+)-(?P<seq>[0-9]+)$")
        .expect("question id pattern is valid")
});

/// A parsed question identifier such as `saa03-12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionId {
    pub exam: String,
    pub ordinal: u32,
    pub sequence: u32,
    /// Text before the first hyphen, kept verbatim (`saa03`).
    pub chapter: String,
}

impl QuestionId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let caps = QUESTION_ID.captures(raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Malformed question id '{}': expected <exam><chapter>-<sequence>",
                raw
            ))
        })?;

        let ordinal = caps["ordinal"]
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Chapter ordinal out of range in '{}'", raw)))?;
        let sequence = caps["seq"]
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Sequence out of range in '{}'", raw)))?;

        Ok(Self {
            exam: caps["exam"].to_string(),
            ordinal,
            sequence,
            chapter: format!("{}{}", &caps["exam"], &caps["ordinal"]),
        })
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.chapter, self.sequence)
    }
}

/// Builds a chapter code from an exam code and a 1-based ordinal (`saa`, 3 -> `saa03`).
pub fn chapter_code(exam: &str, ordinal: u32) -> String {
    format!("{}{:02}", exam, ordinal)
}

/// Extracts the ordinal of a chapter code belonging to `exam` (`saa03` -> 3).
pub fn chapter_ordinal(exam: &str, chapter: &str) -> Option<u32> {
    chapter
        .strip_prefix(exam)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_id() {
        let id = QuestionId::parse("saa03-12").unwrap();
        assert_eq!(id.exam, "saa");
        assert_eq!(id.ordinal, 3);
        assert_eq!(id.sequence, 12);
        assert_eq!(id.chapter, "saa03");
        assert_eq!(id.to_string(), "saa03-12");
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["saa03", "03-1", "saa-1", "saa03-", "saa03-1-2", "saa 03-1", ""] {
            assert!(
                matches!(QuestionId::parse(raw), Err(AppError::BadRequest(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn chapter_code_is_zero_padded() {
        assert_eq!(chapter_code("saa", 3), "saa03");
        assert_eq!(chapter_code("saa", 105), "saa105");
    }

    #[test]
    fn chapter_ordinal_round_trips() {
        assert_eq!(chapter_ordinal("saa", "saa03"), Some(3));
        assert_eq!(chapter_ordinal("saa", "clf03"), None);
        assert_eq!(chapter_ordinal("saa", "saa"), None);
    }
}
