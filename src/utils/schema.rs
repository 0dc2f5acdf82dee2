// src/utils/schema.rs

//! Structural validation of request bodies against per-entity templates.
//!
//! Templates are JSON Schema documents compiled once at boot with `jsonschema`.

use std::{collections::HashMap, fmt, path::Path};

use jsonschema::Validator;
use serde_json::Value;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Student,
    Teacher,
    AnswerSheet,
    Grade,
    Test,
    Lesson,
}

impl Template {
    pub const ALL: [Template; 6] = [
        Template::Student,
        Template::Teacher,
        Template::AnswerSheet,
        Template::Grade,
        Template::Test,
        Template::Lesson,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Template::Student => "Student",
            Template::Teacher => "Teacher",
            Template::AnswerSheet => "AnswerSheet",
            Template::Grade => "Grade",
            Template::Test => "Test",
            Template::Lesson => "Lesson",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}Template.json", self.name())
    }
}

/// Client document failed its template. Always a 400, never a config problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    pub template: Template,
    pub reasons: Vec<String>,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sent {} JSON not valid: {}",
            self.template.name(),
            self.reasons.join("; ")
        )
    }
}

/// All entity templates, loaded once at boot.
#[derive(Debug)]
pub struct TemplateRegistry {
    schemas: HashMap<Template, Validator>,
}

impl TemplateRegistry {
    /// Reads `{dir}/{Name}Template.json` for every template. Any missing or
    /// malformed file is a configuration error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut schemas = HashMap::new();

        for template in Template::ALL {
            let path = dir.join(template.file_name());
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let json: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            let schema = jsonschema::validator_for(&json).map_err(|e| ConfigError::Template {
                path,
                reason: e.to_string(),
            })?;

            tracing::debug!(template = template.name(), "template loaded");
            schemas.insert(template, schema);
        }

        Ok(Self { schemas })
    }

    /// Parses `body` and checks it against `template`, returning the parsed document.
    pub fn validate(&self, template: Template, body: &[u8]) -> Result<Value, SchemaViolation> {
        let document: Value = serde_json::from_slice(body).map_err(|e| SchemaViolation {
            template,
            reasons: vec![format!("body is not valid JSON: {}", e)],
        })?;

        let reasons: Vec<String> = match self.schemas.get(&template) {
            Some(schema) => schema
                .iter_errors(&document)
                .map(|error| format!("{}: {}", location(error.instance_path.as_str()), error))
                .collect(),
            None => vec!["no template registered".to_string()],
        };

        if reasons.is_empty() {
            Ok(document)
        } else {
            Err(SchemaViolation { template, reasons })
        }
    }
}

/// `/account/password` reads as `$.account.password`; the root is `$`.
fn location(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .fold("$".to_string(), |mut path, segment| {
            if segment.bytes().all(|b| b.is_ascii_digit()) && !segment.is_empty() {
                path.push_str(&format!("[{}]", segment));
            } else {
                path.push('.');
                path.push_str(&segment.replace("~1", "/").replace("~0", "~"));
            }
            path
        })
}
