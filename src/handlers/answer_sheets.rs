// src/handlers/answer_sheets.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    handlers::{parse_test_id, require_student},
    models::{account::Role, answer_sheet::AnswerSheet},
    services::pipeline,
    state::AppState,
    store::{Collection, Database},
    utils::basic_auth::BasicCredentials,
};

/// Returns the answer sheet a student submitted for a test.
///
/// 400 for a malformed test ID or unknown student, 404 when nothing was
/// submitted (or it was already graded and purged).
pub async fn get_answer_sheet(
    State(db): State<Database>,
    Path((student_id, test_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let test_id = parse_test_id(&test_id)?;
    require_student(&db, &student_id).await?;

    let sheet = db
        .find_one(
            Collection::SubmittedAnswers,
            json!({ "studentID": student_id, "testID": test_id.to_string() }),
        )
        .await?
        .ok_or(AppError::NotFound("404 answer sheet not found".to_string()))?;

    tracing::info!(student_id = %student_id, test_id = %test_id, "answer sheet fetched");
    Ok(Json(sheet))
}

/// Files a student's answers for a test. One submission per (student, test).
pub async fn submit_answer_sheet(
    State(state): State<AppState>,
    Path(test_id): Path<String>,
    credentials: BasicCredentials,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let accepted = pipeline::accept::<AnswerSheet>(&state, Role::Student, &credentials, &body).await?;
    let student = accepted.actor;
    let sheet = accepted.payload;

    pipeline::ensure_same_test(
        &test_id,
        &sheet.test_id,
        "Cannot submit answer sheet from another test to this one!",
    )?;

    if state.db.test_subject(&test_id).await?.is_none() {
        return Err(AppError::NotFound("404 test not found!".to_string()));
    }

    let existing = state
        .db
        .find_one(
            Collection::SubmittedAnswers,
            json!({ "studentID": student.id, "testID": test_id }),
        )
        .await?;
    pipeline::ensure_absent(
        existing,
        "Cannot submit an answer sheet after it has already been submitted!",
    )?;

    state
        .db
        .insert(
            Collection::SubmittedAnswers,
            json!({
                "studentID": student.id,
                "testID": test_id,
                "student": student.document,
                "answers": sheet.answers,
                "submittedAt": Utc::now(),
            }),
        )
        .await?;

    tracing::info!(student_id = %student.id, test_id = %test_id, "answer sheet submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Answer sheet added! You can no longer add anything to this test!"
        })),
    ))
}
