// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Teacher-uploaded lesson body. `content` is HTML and is sanitized before storage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LessonUpload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 1_000_000))]
    pub content: String,
}

/// Grade levels lessons and tests are organised by.
pub const MIN_GRADE: u8 = 9;
pub const MAX_GRADE: u8 = 12;

/// Parses a grade path segment, accepting only 9 through 12.
pub fn parse_grade(raw: &str) -> Option<u8> {
    raw.parse::<u8>()
        .ok()
        .filter(|grade| (MIN_GRADE..=MAX_GRADE).contains(grade))
}
