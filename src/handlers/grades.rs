// src/handlers/grades.rs

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
    models::{account::Role, grade::GradeSubmission},
    services::{identity, pipeline},
    state::AppState,
    store::{Collection, Database},
    utils::basic_auth::BasicCredentials,
};

/// Obtains a grade by student ID and test ID.
pub async fn get_grade(
    State(db): State<Database>,
    Path((student_id, test_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let test_id = parse_test_id(&test_id)?.to_string();
    require_student(&db, &student_id).await?;

    let subject = db
        .test_subject(&test_id)
        .await?
        .ok_or(AppError::NotFound("404 grade not found".to_string()))?;

    let grade = db
        .find_one(
            Collection::Grades(subject),
            json!({ "studentID": student_id, "testID": test_id }),
        )
        .await?
        .ok_or(AppError::NotFound("404 grade not found".to_string()))?;

    tracing::info!(student_id = %student_id, test_id = %test_id, "grade fetched");
    Ok(Json(grade))
}

/// Records a teacher's grade for a student's answer sheet.
///
/// Only teachers may grade, and only as themselves. The graded sheet and the
/// answer key must both belong to the test in the path. Once stored, the
/// student's answer sheet is purged; a failed purge is logged, not undone.
pub async fn submit_grade(
    State(state): State<AppState>,
    Path(test_id): Path<String>,
    credentials: BasicCredentials,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let accepted =
        pipeline::accept::<GradeSubmission>(&state, Role::Teacher, &credentials, &body).await?;
    let teacher = accepted.actor;
    let grade = accepted.payload;
    let sheet = &grade.student_answer_sheet;

    pipeline::ensure_same_test(
        &test_id,
        &sheet.test_id,
        "Cannot submit grade from another test to this one!",
    )?;
    pipeline::ensure_same_test(
        &sheet.test_id,
        &grade.answer_key.test_id,
        "Malformed grade! (Cannot have answer sheets from different tests!)",
    )?;

    let embedded = &sheet.student.account;
    let student = identity::resolve(&state.db, Role::Student, &embedded.user_name, &embedded.password)
        .await?
        .ok_or(AppError::BadRequest(
            "Malformed grade! (Answer sheet does not belong to a known student)".to_string(),
        ))?;

    let subject = state
        .db
        .test_subject(&test_id)
        .await?
        .ok_or(AppError::NotFound("404 test not found!".to_string()))?;

    let existing = state
        .db
        .find_one(
            Collection::Grades(subject),
            json!({ "studentID": student.id, "testID": test_id }),
        )
        .await?;
    pipeline::ensure_absent(
        existing,
        "Cannot submit a grade after it has already been submitted!",
    )?;

    state
        .db
        .insert(
            Collection::Grades(subject),
            json!({
                "teacherID": teacher.id,
                "studentID": student.id,
                "testID": test_id,
                "teacher": teacher.document,
                "studentAnswerSheet": {
                    "student": student.document,
                    "testID": sheet.test_id,
                    "answers": sheet.answers,
                },
                "answerKey": grade.answer_key,
                "value": grade.value,
                "gradedAt": Utc::now(),
            }),
        )
        .await?;

    // The grade is the record of truth from here on.
    match state
        .db
        .remove(
            Collection::SubmittedAnswers,
            json!({ "studentID": student.id, "testID": test_id }),
        )
        .await
    {
        Ok(0) => tracing::debug!(student_id = %student.id, test_id = %test_id, "no answer sheet to purge"),
        Ok(_) => {}
        Err(e) => tracing::warn!(
            student_id = %student.id,
            test_id = %test_id,
            "Cannot remove answer sheet after grading: {}",
            e
        ),
    }

    tracing::info!(
        teacher_id = %teacher.id,
        student_id = %student.id,
        test_id = %test_id,
        subject = %subject,
        "grade submitted"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Grade added! You can no longer add anything to this test!" })),
    ))
}
