// src/models/account.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{models::subject::Subject, store::Collection};

/// Which account collection an identity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn collection(&self) -> Collection {
        match self {
            Role::Student => Collection::StudentAccounts,
            Role::Teacher => Collection::TeacherAccounts,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

/// Login pair embedded in every account document under `account`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub user_name: String,

    /// Plain text on the wire; only the Argon2 hash is ever persisted.
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// Registration body for a student.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[validate(nested)]
    pub account: Credentials,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(range(min = 9, max = 12, message = "Grade must be between 9 and 12."))]
    pub grade: u8,
    #[validate(length(equal = 1))]
    pub grade_letter: String,
}

/// Registration body for a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    #[validate(nested)]
    pub account: Credentials,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub course: Subject,
}

/// The `account` wrapper other documents embed to identify a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    pub account: Credentials,
}

/// Body of `findStudentID` / `findTeacherID`.
#[derive(Debug, Deserialize, Validate)]
pub struct FindIdRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Strips `account.password` from an account-shaped document before it
/// leaves the server or gets embedded elsewhere.
pub fn without_password(mut document: Value) -> Value {
    if let Some(account) = document.get_mut("account").and_then(Value::as_object_mut) {
        account.remove("password");
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_profile_rejects_out_of_range_grade() {
        let profile: StudentProfile = serde_json::from_value(json!({
            "account": { "userName": "ana", "password": "x123" },
            "firstName": "Ana",
            "lastName": "Pop",
            "grade": 8,
            "gradeLetter": "A"
        }))
        .unwrap();

        assert!(profile.validate().is_err());
    }

    #[test]
    fn without_password_keeps_user_name() {
        let doc = without_password(json!({
            "_id": "1",
            "account": { "userName": "ana", "password": "secret" }
        }));

        assert_eq!(doc["account"]["userName"], "ana");
        assert!(doc["account"].get("password").is_none());
    }
}
