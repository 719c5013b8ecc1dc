use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Backend-assigned resume identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(pub i64);

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resume record as returned by the backend.
///
/// List responses carry only the summary fields (`id`, `file_name`, `name`,
/// `email`, `phone`, `uploaded_at`); detail and upload responses carry the
/// full record. Every field besides `id` is present-or-absent: nothing is
/// defaulted on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: ResumeId,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub technical_skills: Option<Vec<String>>,
    #[serde(default)]
    pub work_experience: Option<Vec<WorkExperience>>,
    /// Backend-produced analysis document. Shown verbatim, never interpreted.
    #[serde(default)]
    pub llm_analysis: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
}

/// Accepts RFC 3339 timestamps as well as the offset-less ISO form the
/// backend emits for naive datetimes (`2024-05-01T12:30:00.123456`). The
/// field is display-only, so anything else is dropped with a warning instead
/// of failing the whole record.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let Some(value) = raw else {
        return Ok(None);
    };
    let parsed = value.as_str().and_then(parse_timestamp);
    if parsed.is_none() {
        warn!("Ignoring unrecognised uploaded_at value {value}");
    }
    Ok(parsed)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
