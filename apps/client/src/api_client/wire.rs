//! Backend envelope shapes and response validation.
//!
//! Everything the client accepts from the backend passes through here, so the
//! rest of the crate can rely on typed, validated records.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::ApiError;
use crate::models::{Resume, ResumeId};

/// Body of a successful `POST /resumes/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub resume_id: Option<ResumeId>,
    pub data: Resume,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Unwraps an upload envelope, checking that the advertised id matches the record.
pub fn parse_upload(body: &str) -> Result<Resume, ApiError> {
    let envelope: UploadEnvelope = serde_json::from_str(body)?;
    if let Some(message) = &envelope.message {
        debug!("Upload accepted: {message}");
    }
    if let Some(id) = envelope.resume_id {
        if id != envelope.data.id {
            return Err(ApiError::InvalidResponse(format!(
                "upload reported resume_id {id} but returned record {}",
                envelope.data.id
            )));
        }
    }
    Ok(envelope.data)
}

pub fn parse_list(body: &str) -> Result<Vec<Resume>, ApiError> {
    let resumes: Vec<Resume> = serde_json::from_str(body)?;
    ensure_unique_ids(&resumes)?;
    Ok(resumes)
}

pub fn parse_record(body: &str, expected: ResumeId) -> Result<Resume, ApiError> {
    let resume: Resume = serde_json::from_str(body)?;
    if resume.id != expected {
        return Err(ApiError::InvalidResponse(format!(
            "requested resume {expected} but received {}",
            resume.id
        )));
    }
    Ok(resume)
}

pub fn ensure_unique_ids(resumes: &[Resume]) -> Result<(), ApiError> {
    let mut seen = HashSet::with_capacity(resumes.len());
    for resume in resumes {
        if !seen.insert(resume.id) {
            return Err(ApiError::InvalidResponse(format!(
                "duplicate resume id {} in list",
                resume.id
            )));
        }
    }
    Ok(())
}

/// Extracts the human-readable message from an error body.
///
/// The backend reports `{"detail": "..."}`; validation failures carry a list of
/// objects under `detail` instead. Anything unparseable is returned as-is.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(msg),
        }) => msg,
        Ok(ErrorBody { detail: Value::Array(items) }) => items
            .iter()
            .map(|item| {
                item.get("msg")
                    .and_then(|m| m.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| item.to_string())
            })
            .collect::<Vec<_>>()
            .join("; "),
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
