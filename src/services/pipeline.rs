// src/services/pipeline.rs

//! Shared guard sequence for write endpoints.
//!
//! Every write walks the same stages: authenticate the caller, validate the
//! body against its template, then check that any identity embedded in the
//! body is the caller's own. Each stage only reads; the first failure ends the
//! request with its status and nothing is written. Entity handlers add their
//! own cross-checks and duplicate probes before persisting.

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        account::{Credentials, Role, StudentProfile, TeacherProfile},
        answer_sheet::AnswerSheet,
        grade::GradeSubmission,
        lesson::LessonUpload,
        test::TestDocument,
    },
    services::identity::{self, ResolvedAccount},
    state::AppState,
    store::Document,
    utils::{
        basic_auth::BasicCredentials,
        schema::{Template, TemplateRegistry},
    },
};

/// A request body type that goes through template validation.
pub trait Submission: DeserializeOwned + Validate {
    const TEMPLATE: Template;

    /// Credentials inside the body that must resolve to the caller.
    fn embedded_owner(&self) -> Option<&Credentials> {
        None
    }
}

impl Submission for StudentProfile {
    const TEMPLATE: Template = Template::Student;
}

impl Submission for TeacherProfile {
    const TEMPLATE: Template = Template::Teacher;
}

impl Submission for AnswerSheet {
    const TEMPLATE: Template = Template::AnswerSheet;

    fn embedded_owner(&self) -> Option<&Credentials> {
        Some(&self.student.account)
    }
}

impl Submission for GradeSubmission {
    const TEMPLATE: Template = Template::Grade;

    fn embedded_owner(&self) -> Option<&Credentials> {
        Some(&self.teacher.account)
    }
}

impl Submission for TestDocument {
    const TEMPLATE: Template = Template::Test;
}

impl Submission for LessonUpload {
    const TEMPLATE: Template = Template::Lesson;
}

/// A body that passed structural and field-level validation.
#[derive(Debug)]
pub struct Validated<T> {
    pub payload: T,
    pub document: Document,
}

/// Output of [`accept`]: who is acting and what they sent.
#[derive(Debug)]
pub struct Accepted<T> {
    pub actor: ResolvedAccount,
    pub payload: T,
    pub document: Document,
}

/// Template check followed by typed deserialization and `validator` rules.
pub fn validate_body<T: Submission>(
    templates: &TemplateRegistry,
    body: &[u8],
) -> Result<Validated<T>, AppError> {
    let document = templates
        .validate(T::TEMPLATE, body)
        .map_err(|violation| AppError::BadRequest(violation.to_string()))?;

    let payload: T = serde_json::from_value(document.clone())?;
    payload.validate()?;

    Ok(Validated { payload, document })
}

/// Runs authentication, validation and the ownership check, in that order.
pub async fn accept<T: Submission>(
    state: &AppState,
    role: Role,
    credentials: &BasicCredentials,
    body: &[u8],
) -> Result<Accepted<T>, AppError> {
    let actor = identity::authenticate(&state.db, role, credentials).await?;

    let Validated { payload, document } = validate_body::<T>(&state.templates, body)?;

    if let Some(embedded) = payload.embedded_owner() {
        ensure_owner(state, &actor, embedded).await?;
    }

    Ok(Accepted {
        actor,
        payload,
        document,
    })
}

/// Embedded credentials must resolve to the authenticated account.
pub async fn ensure_owner(
    state: &AppState,
    actor: &ResolvedAccount,
    embedded: &Credentials,
) -> Result<(), AppError> {
    let embedded_id = identity::resolve(
        &state.db,
        actor.role,
        &embedded.user_name,
        &embedded.password,
    )
    .await?
    .map(|account| account.id);

    if embedded_id.as_deref() != Some(actor.id.as_str()) {
        tracing::warn!(
            actor_id = %actor.id,
            role = actor.role.label(),
            "payload identity does not match caller"
        );
        return Err(AppError::AuthError(format!(
            "Cannot submit on someone else's behalf! Embedded {} does not match the authenticated one.",
            actor.role.label()
        )));
    }
    Ok(())
}

/// Foreign-key style equality check between two test IDs.
pub fn ensure_same_test(expected: &str, submitted: &str, message: &str) -> Result<(), AppError> {
    if expected != submitted {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(())
}

/// Natural-key probe: an existing document means the submission already happened.
pub fn ensure_absent(existing: Option<Value>, message: &str) -> Result<(), AppError> {
    if existing.is_some() {
        return Err(AppError::Conflict(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, state::AppState};
    use serde_json::json;
    use std::path::Path;

    fn templates() -> TemplateRegistry {
        TemplateRegistry::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")).unwrap()
    }

    #[test]
    fn schema_failure_is_bad_request() {
        let err = validate_body::<AnswerSheet>(&templates(), br#"{"testID": "T-000001"}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn validator_rules_apply_after_template() {
        let body = json!({
            "testID": "T-000001",
            "course": "Math",
            "grade": 10,
            "gradeLetter": "A",
            "startTime": "2026-05-01T10:00:00Z",
            "endTime": "2026-05-01T09:00:00Z",
            "questions": [{ "text": "?" }]
        });
        let err = validate_body::<TestDocument>(&templates(), body.to_string().as_bytes())
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn cross_checks() {
        assert!(ensure_same_test("T-000001", "T-000001", "x").is_ok());
        assert!(matches!(
            ensure_same_test("T-000001", "T-000002", "x"),
            Err(AppError::BadRequest(_))
        ));
        assert!(ensure_absent(None, "x").is_ok());
        assert!(matches!(
            ensure_absent(Some(json!({})), "x"),
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unknown_caller_is_unauthorized_before_validation() {
        let config = Config::from_json(
            r#"{
                "listenPort": 0,
                "database": { "backend": "memory", "name": "VianuEdu" },
                "admin": { "userName": "root", "password": "toor" }
            }"#,
        )
        .unwrap();
        let state = AppState::in_memory(config, templates());
        let credentials = BasicCredentials {
            user_name: "ghost".to_string(),
            password: "nope".to_string(),
        };

        let err = accept::<AnswerSheet>(&state, Role::Student, &credentials, b"garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }
}
