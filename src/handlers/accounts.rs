// src/handlers/accounts.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    error::AppError,
    models::account::{Credentials, FindIdRequest, Role, StudentProfile, TeacherProfile},
    services::{
        identity,
        pipeline::{self, Submission},
    },
    state::AppState,
    store::Database,
    utils::hash::hash_password,
};

/// Registration body types: they carry the credentials that get hashed.
trait AccountProfile: Submission + Serialize {
    const ROLE: Role;

    fn credentials_mut(&mut self) -> &mut Credentials;
}

impl AccountProfile for StudentProfile {
    const ROLE: Role = Role::Student;

    fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.account
    }
}

impl AccountProfile for TeacherProfile {
    const ROLE: Role = Role::Teacher;

    fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.account
    }
}

/// Fetches a student account by ID (password omitted).
pub async fn get_student(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    get_account(&db, Role::Student, &id).await
}

/// Fetches a teacher account by ID (password omitted).
pub async fn get_teacher(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    get_account(&db, Role::Teacher, &id).await
}

/// Translates a student's username and password into their ID (plain text).
pub async fn find_student_id(
    State(db): State<Database>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    find_account_id(&db, Role::Student, &body).await
}

pub async fn find_teacher_id(
    State(db): State<Database>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    find_account_id(&db, Role::Teacher, &body).await
}

/// Registers a new student.
///
/// Validates against the Student template, refuses taken user names,
/// stores the Argon2 hash and returns 201 with the new ID.
pub async fn register_student(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    register::<StudentProfile>(&state, &body).await
}

pub async fn register_teacher(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    register::<TeacherProfile>(&state, &body).await
}

async fn get_account(db: &Database, role: Role, id: &str) -> Result<Json<Value>, AppError> {
    let account = identity::find_by_id(db, role, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("404 {} not found", role.label())))?;

    tracing::info!(role = role.label(), id, "account fetched");
    Ok(Json(account))
}

async fn find_account_id(db: &Database, role: Role, body: &[u8]) -> Result<String, AppError> {
    let request: FindIdRequest = serde_json::from_slice(body)?;
    request.validate()?;

    let account = identity::resolve(db, role, &request.username, &request.password)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("404 {} not found", role.label())))?;

    tracing::info!(role = role.label(), id = %account.id, "account id resolved");
    Ok(account.id)
}

async fn register<P: AccountProfile>(
    state: &AppState,
    body: &[u8],
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut profile = pipeline::validate_body::<P>(&state.templates, body)?.payload;
    let role = P::ROLE;

    let user_name = profile.credentials_mut().user_name.clone();
    if identity::find_by_user_name(&state.db, role, &user_name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Username '{}' already exists",
            user_name
        )));
    }

    let credentials = profile.credentials_mut();
    credentials.password = hash_password(&credentials.password)?;

    let document = serde_json::to_value(&profile)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    let id = state.db.insert(role.collection(), document).await?;

    tracing::info!(role = role.label(), id = %id, user_name = %user_name, "account registered");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
