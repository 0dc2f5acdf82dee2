// src/handlers/lessons.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    handlers::parse_subject,
    models::{
        account::Role,
        lesson::{LessonUpload, parse_grade},
    },
    services::{identity, pipeline},
    state::AppState,
    store::{Collection, Database},
    utils::{basic_auth::BasicCredentials, html::clean_html},
};

fn invalid_grade() -> AppError {
    AppError::BadRequest("Invalid grade! Must be between 9-12!".to_string())
}

/// Lists the IDs of every lesson for a subject and grade.
///
/// The grade is checked before anything else: only 9 through 12 are served.
pub async fn list_lessons(
    State(db): State<Database>,
    Path((subject, grade)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let grade = parse_grade(&grade).ok_or_else(invalid_grade)?;
    let subject = parse_subject(&subject)?;

    let ids: Vec<String> = db
        .find_many(Collection::Lessons(subject), json!({ "grade": grade }))
        .await?
        .iter()
        .filter_map(|lesson| lesson.get("_id").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(AppError::NotFound("404 lessons not found".to_string()));
    }

    tracing::info!(subject = %subject, grade, count = ids.len(), "lessons listed");
    Ok(Json(ids))
}

/// Downloads a single lesson.
pub async fn get_lesson(
    State(db): State<Database>,
    Path((subject, lesson_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let subject = parse_subject(&subject)?;

    let lesson = db
        .find_by_id(Collection::Lessons(subject), &lesson_id)
        .await?
        .ok_or(AppError::NotFound("404 lesson not found!".to_string()))?;

    Ok(Json(lesson))
}

/// Uploads a lesson on behalf of an authenticated teacher.
///
/// Checked in order: grade (400), credentials (401), subject (404), body (400).
/// The HTML content is sanitized before it is stored.
pub async fn upload_lesson(
    State(state): State<AppState>,
    Path((subject, grade)): Path<(String, String)>,
    credentials: BasicCredentials,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let grade = parse_grade(&grade).ok_or_else(invalid_grade)?;
    let teacher = identity::authenticate(&state.db, Role::Teacher, &credentials).await?;
    let subject = parse_subject(&subject)?;

    let lesson = pipeline::validate_body::<LessonUpload>(&state.templates, &body)?.payload;

    let id = state
        .db
        .insert(
            Collection::Lessons(subject),
            json!({
                "course": subject,
                "grade": grade,
                "title": lesson.title,
                "content": clean_html(&lesson.content),
                "uploadedBy": teacher.id,
                "uploadedAt": Utc::now(),
            }),
        )
        .await?;

    tracing::info!(teacher_id = %teacher.id, subject = %subject, grade, lesson_id = %id, "lesson uploaded");
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "message": "Lesson uploaded!" }))))
}
