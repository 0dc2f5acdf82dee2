// src/models/grade.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{account::AccountRef, answer_sheet::AnswerSheet, test::validate_test_id};

/// Reference answers the teacher graded against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerKey {
    #[serde(rename = "testID")]
    #[validate(custom(function = validate_test_id))]
    pub test_id: String,
    pub answers: Vec<Value>,
}

/// Grade submission: the teacher, the graded answer sheet, the key and the mark.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmission {
    pub teacher: AccountRef,
    #[validate(nested)]
    pub student_answer_sheet: AnswerSheet,
    #[validate(nested)]
    pub answer_key: AnswerKey,
    #[validate(range(min = 1.0, max = 10.0, message = "Grade must be between 1 and 10."))]
    pub value: f64,
}
