// src/services/identity.rs

use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::account::{Role, without_password},
    store::{Database, StoreResult},
    utils::{basic_auth::BasicCredentials, hash::verify_password},
};

/// An account whose credentials checked out.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    pub id: String,
    pub role: Role,
    /// Account document with the password hash removed.
    pub document: Value,
}

/// Maps `(role, userName, password)` to the account it names.
///
/// `Ok(None)` covers both an unknown user name and a wrong password.
/// Store failures are returned as errors, never folded into `None`.
pub async fn resolve(
    db: &Database,
    role: Role,
    user_name: &str,
    password: &str,
) -> StoreResult<Option<ResolvedAccount>> {
    let Some(account) = find_by_user_name(db, role, user_name).await? else {
        return Ok(None);
    };

    let hash = account
        .pointer("/account/password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !verify_password(password, hash) {
        return Ok(None);
    }

    let Some(id) = account.get("_id").and_then(Value::as_str).map(str::to_string) else {
        tracing::warn!(role = role.label(), user_name, "account document has no _id");
        return Ok(None);
    };

    Ok(Some(ResolvedAccount {
        id,
        role,
        document: without_password(account),
    }))
}

pub async fn find_by_user_name(
    db: &Database,
    role: Role,
    user_name: &str,
) -> StoreResult<Option<Value>> {
    db.find_one(role.collection(), json!({ "account": { "userName": user_name } }))
        .await
}

/// Account by store ID, password removed. Used by the lookup endpoints.
pub async fn find_by_id(db: &Database, role: Role, id: &str) -> StoreResult<Option<Value>> {
    Ok(db
        .find_by_id(role.collection(), id)
        .await?
        .map(without_password))
}

/// Authenticates a request's Basic credentials for `role`.
pub async fn authenticate(
    db: &Database,
    role: Role,
    credentials: &BasicCredentials,
) -> Result<ResolvedAccount, AppError> {
    resolve(db, role, &credentials.user_name, &credentials.password)
        .await?
        .ok_or_else(|| {
            tracing::info!(
                role = role.label(),
                user_name = %credentials.user_name,
                "authentication failed"
            );
            AppError::AuthError("Invalid username and password combination!".to_string())
        })
}
