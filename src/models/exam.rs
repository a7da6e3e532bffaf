// src/models/exam.rs

use serde::Serialize;

use crate::utils::id::{chapter_code, chapter_ordinal};

/// One certification track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub code: &'static str,
    pub name: &'static str,
    pub chapter_count: u32,
}

/// The fixed exam catalogue.
pub const EXAMS: [Exam; 4] = [
    Exam {
        code: "clf",
        name: "AWS Cloud Practitioner (CLF-C02)",
        chapter_count: 35,
    },
    Exam {
        code: "aif",
        name: "AWS AI Practitioner (AIF-C01)",
        chapter_count: 45,
    },
    Exam {
        code: "saa",
        name: "AWS Solutions Architect Associate (SAA-C03)",
        chapter_count: 105,
    },
    Exam {
        code: "soa",
        name: "AWS SysOps Administrator (SOA-C02)",
        chapter_count: 100,
    },
];

/// A chapter derived from an exam and an ordinal. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterInfo {
    pub id: String,
    pub exam: String,
    pub num: u32,
    pub name: String,
}

pub fn find_exam(code: &str) -> Option<&'static Exam> {
    EXAMS.iter().find(|e| e.code == code)
}

impl Exam {
    pub fn chapter(&self, num: u32) -> ChapterInfo {
        ChapterInfo {
            id: chapter_code(self.code, num),
            exam: self.code.to_string(),
            num,
            name: format!("{} - Chapter {}", self.code.to_uppercase(), num),
        }
    }

    pub fn chapters(&self) -> Vec<ChapterInfo> {
        (1..=self.chapter_count).map(|n| self.chapter(n)).collect()
    }

    /// Code of the chapter after `chapter`, if the exam has one.
    pub fn next_chapter(&self, chapter: &str) -> Option<String> {
        let current = chapter_ordinal(self.code, chapter)?;
        (current < self.chapter_count).then(|| chapter_code(self.code, current + 1))
    }
}
