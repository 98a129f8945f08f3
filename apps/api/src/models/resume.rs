use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// The canonical structured résumé record.
///
/// Every schema key is always serialized, empty or not. On deserialization a
/// missing key or an explicit `null` becomes the empty value, while a value of
/// the wrong JSON type is an error. Keys outside the schema are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResume {
    #[serde(default, deserialize_with = "nullable")]
    pub contact_info: ContactInfo,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<ProjectEntry>,
    /// Free text. A list returned by the model is joined during normalization.
    #[serde(default, deserialize_with = "nullable")]
    pub skills: String,
    #[serde(default, deserialize_with = "nullable")]
    pub certifications: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "nullable")]
    pub github: String,
    /// Keys the schema does not define, kept as returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub job_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub responsibilities: Vec<String>,
    /// Keys the schema does not define, kept as returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub degree: String,
    #[serde(default, deserialize_with = "nullable")]
    pub institution: String,
    #[serde(default, deserialize_with = "nullable")]
    pub graduation_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cgpa: String,
    /// Keys the schema does not define, kept as returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub responsibilities: Vec<String>,
    /// Keys the schema does not define, kept as returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedResume {
    /// Parses a caller-supplied payload, failing on wrong JSON types.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl ExperienceEntry {
    /// "start - end", or whichever side is present.
    pub fn date_range(&self) -> String {
        join_range(&self.start_date, &self.end_date)
    }
}

fn join_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => s.to_string(),
        ("", e) => e.to_string(),
        (s, e) => format!("{s} - {e}"),
    }
}

/// Treats `null` the same as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A persisted record as stored in the `resumes` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub record: Value,
    pub created_at: DateTime<Utc>,
}
