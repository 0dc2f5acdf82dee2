// src/handlers/admin.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::{config::Config, error::AppError};

#[derive(Debug, Serialize)]
pub struct LogFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBundle {
    pub generated_at: chrono::DateTime<Utc>,
    pub files: Vec<LogFile>,
}

/// Bundles every file in the log directory into one JSON document.
/// Admin only.
pub async fn download_logs(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let read_failed = |e: std::io::Error| {
        tracing::error!(dir = %config.log_dir.display(), "Failed to read logs: {:?}", e);
        AppError::InternalServerError(e.to_string())
    };

    let mut entries = tokio::fs::read_dir(&config.log_dir).await.map_err(read_failed)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        if !entry.file_type().await.map_err(read_failed)?.is_file() {
            continue;
        }
        let bytes = tokio::fs::read(entry.path()).await.map_err(read_failed)?;
        files.push(LogFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(count = files.len(), "log bundle generated");
    Ok(Json(LogBundle {
        generated_at: Utc::now(),
        files,
    }))
}
