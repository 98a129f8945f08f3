//! Schema reconciliation — forces an arbitrary JSON object into `NormalizedResume`.
//!
//! The model's compliance with the schema is best-effort, so this is where
//! schema-closure is enforced:
//! - a missing key gets its empty default
//! - a wrong-typed value is coerced when no information is lost
//!   (number/bool → string, string → one-item list, list → joined `skills`)
//!   and replaced by the default otherwise
//! - keys outside the schema are preserved in `extra`
//!
//! Every repair is recorded so the caller can log what the model got wrong.

use serde_json::{Map, Value};

use crate::models::{
    ContactInfo, EducationEntry, ExperienceEntry, NormalizedResume, ProjectEntry,
};

pub const SCHEMA_KEYS: [&str; 7] = [
    "contact_info",
    "summary",
    "experience",
    "education",
    "projects",
    "skills",
    "certifications",
];

/// Result of reconciling one payload.
#[derive(Debug)]
pub struct Reconciled {
    pub record: NormalizedResume,
    /// Dotted paths of fields that were defaulted or coerced.
    pub repairs: Vec<String>,
}

/// Reconciles a parsed top-level JSON object against the résumé schema.
pub fn reconcile(mut obj: Map<String, Value>) -> Reconciled {
    let mut r = Repairs::default();

    let contact_info = contact(obj.remove("contact_info"), &mut r);
    let summary = string_at(obj.remove("summary"), "summary", &mut r);
    let experience = entries(obj.remove("experience"), "experience", &mut r, experience_entry);
    let education = entries(obj.remove("education"), "education", &mut r, education_entry);
    let projects = entries(obj.remove("projects"), "projects", &mut r, project_entry);
    let skills = skills_text(obj.remove("skills"), &mut r);
    let certifications = string_list(obj.remove("certifications"), "certifications", &mut r);

    Reconciled {
        record: NormalizedResume {
            contact_info,
            summary,
            experience,
            education,
            projects,
            skills,
            certifications,
            extra: obj,
        },
        repairs: r.0,
    }
}

#[derive(Default)]
struct Repairs(Vec<String>);

impl Repairs {
    fn note(&mut self, path: &str, what: &str) {
        self.0.push(format!("{path}: {what}"));
    }
}

fn contact(value: Option<Value>, r: &mut Repairs) -> ContactInfo {
    let mut obj = object_at(value, "contact_info", r);
    let mut field = |key: &str| string_at(obj.remove(key), &format!("contact_info.{key}"), r);
    let name = field("name");
    let email = field("email");
    let phone = field("phone");
    let linkedin = field("linkedin");
    let github = field("github");
    ContactInfo {
        name,
        email,
        phone,
        linkedin,
        github,
        extra: obj,
    }
}

fn experience_entry(mut obj: Map<String, Value>, path: &str, r: &mut Repairs) -> ExperienceEntry {
    ExperienceEntry {
        job_title: string_at(obj.remove("job_title"), &format!("{path}.job_title"), r),
        company: string_at(obj.remove("company"), &format!("{path}.company"), r),
        location: string_at(obj.remove("location"), &format!("{path}.location"), r),
        start_date: string_at(obj.remove("start_date"), &format!("{path}.start_date"), r),
        end_date: string_at(obj.remove("end_date"), &format!("{path}.end_date"), r),
        responsibilities: string_list(
            obj.remove("responsibilities"),
            &format!("{path}.responsibilities"),
            r,
        ),
        extra: obj,
    }
}

fn education_entry(mut obj: Map<String, Value>, path: &str, r: &mut Repairs) -> EducationEntry {
    EducationEntry {
        degree: string_at(obj.remove("degree"), &format!("{path}.degree"), r),
        institution: string_at(obj.remove("institution"), &format!("{path}.institution"), r),
        graduation_date: string_at(
            obj.remove("graduation_date"),
            &format!("{path}.graduation_date"),
            r,
        ),
        cgpa: string_at(obj.remove("cgpa"), &format!("{path}.cgpa"), r),
        extra: obj,
    }
}

fn project_entry(mut obj: Map<String, Value>, path: &str, r: &mut Repairs) -> ProjectEntry {
    ProjectEntry {
        name: string_at(obj.remove("name"), &format!("{path}.name"), r),
        responsibilities: string_list(
            obj.remove("responsibilities"),
            &format!("{path}.responsibilities"),
            r,
        ),
        extra: obj,
    }
}

fn object_at(value: Option<Value>, path: &str, r: &mut Repairs) -> Map<String, Value> {
    match value {
        Some(Value::Object(obj)) => obj,
        Some(Value::Null) | None => {
            r.note(path, "missing");
            Map::new()
        }
        Some(other) => {
            r.note(path, &format!("expected object, got {}", type_name(&other)));
            Map::new()
        }
    }
}

fn entries<T>(
    value: Option<Value>,
    path: &str,
    r: &mut Repairs,
    build: fn(Map<String, Value>, &str, &mut Repairs) -> T,
) -> Vec<T> {
    let items = match value {
        Some(Value::Array(items)) => items,
        // A lone object is a one-entry section.
        Some(Value::Object(obj)) => {
            r.note(path, "expected list, wrapped single object");
            vec![Value::Object(obj)]
        }
        Some(Value::Null) | None => {
            r.note(path, "missing");
            return Vec::new();
        }
        Some(other) => {
            r.note(path, &format!("expected list, got {}", type_name(&other)));
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let item_path = format!("{path}[{i}]");
            match item {
                Value::Object(obj) => Some(build(obj, &item_path, r)),
                other => {
                    r.note(&item_path, &format!("dropped {} entry", type_name(&other)));
                    None
                }
            }
        })
        .collect()
}

fn string_at(value: Option<Value>, path: &str, r: &mut Repairs) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => {
            r.note(path, "missing");
            String::new()
        }
        Some(other) => match scalar_to_string(&other) {
            Some(s) => {
                r.note(path, &format!("coerced {} to string", type_name(&other)));
                s
            }
            None => {
                r.note(path, &format!("expected string, got {}", type_name(&other)));
                String::new()
            }
        },
    }
}

fn string_list(value: Option<Value>, path: &str, r: &mut Repairs) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    let coerced = scalar_to_string(other);
                    r.note(
                        path,
                        &format!(
                            "{} {} item",
                            if coerced.is_some() { "coerced" } else { "dropped" },
                            type_name(other)
                        ),
                    );
                    coerced
                }
            })
            .collect(),
        Some(Value::String(s)) => {
            r.note(path, "expected list, wrapped string");
            if s.trim().is_empty() {
                Vec::new()
            } else {
                vec![s]
            }
        }
        Some(Value::Null) | None => {
            r.note(path, "missing");
            Vec::new()
        }
        Some(other) => {
            r.note(path, &format!("expected list, got {}", type_name(&other)));
            Vec::new()
        }
    }
}

/// `skills` is free text; a list (possibly of category objects) is flattened and joined.
fn skills_text(value: Option<Value>, r: &mut Repairs) -> String {
    match value {
        Some(Value::Array(items)) => {
            r.note("skills", "joined list into text");
            let mut parts = Vec::new();
            for item in &items {
                flatten_skill(item, &mut parts);
            }
            parts.join(", ")
        }
        Some(Value::Object(obj)) => {
            r.note("skills", "joined object into text");
            obj.iter()
                .filter_map(|(category, v)| {
                    let mut parts = Vec::new();
                    flatten_skill(v, &mut parts);
                    (!parts.is_empty()).then(|| format!("{category}: {}", parts.join(", ")))
                })
                .collect::<Vec<_>>()
                .join("; ")
        }
        other => string_at(other, "skills", r),
    }
}

fn flatten_skill(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| flatten_skill(v, out)),
        Value::Object(obj) => obj.values().for_each(|v| flatten_skill(v, out)),
        other => {
            if let Some(s) = scalar_to_string(other).filter(|s| !s.trim().is_empty()) {
                out.push(s);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
