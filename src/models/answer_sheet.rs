// src/models/answer_sheet.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{account::AccountRef, test::validate_test_id};

/// A student's submitted answers for one test.
///
/// `student` carries the submitter's credentials so the server can check the
/// sheet is not filed on someone else's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerSheet {
    pub student: AccountRef,
    #[serde(rename = "testID")]
    #[validate(custom(function = validate_test_id))]
    pub test_id: String,
    pub answers: Vec<Value>,
}
