// src/handlers/mod.rs

pub mod accounts;
pub mod admin;
pub mod answer_sheets;
pub mod grades;
pub mod lessons;

use serde_json::Value;

use crate::{
    error::AppError,
    models::{account::Role, subject::Subject, test::TestId},
    services::identity,
    store::Database,
};

pub(crate) fn parse_test_id(raw: &str) -> Result<TestId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Test ID invalid!".to_string()))
}

pub(crate) fn parse_subject(raw: &str) -> Result<Subject, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("404 course not found".to_string()))
}

/// Student lookups on read endpoints treat an unknown ID as a bad request.
pub(crate) async fn require_student(db: &Database, id: &str) -> Result<Value, AppError> {
    identity::find_by_id(db, Role::Student, id)
        .await?
        .ok_or(AppError::BadRequest("Student ID invalid!".to_string()))
}
