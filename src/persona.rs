//! Persona and task description driving the ranking.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Who the ranking is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Role description, e.g. "PhD researcher in computational biology"
    pub role: String,

    /// Any other fields, preserved verbatim in the output metadata
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the persona wants to accomplish.
///
/// Accepted as a plain string or as an object with a `task` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobToBeDone {
    Text(String),
    Task {
        task: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl JobToBeDone {
    /// The task text.
    pub fn task(&self) -> &str {
        match self {
            JobToBeDone::Text(text) => text,
            JobToBeDone::Task { task, .. } => task,
        }
    }
}

/// Contents of a `persona.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaInput {
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl PersonaInput {
    /// Build an input from a role and a task.
    pub fn new(role: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona: Persona {
                role: role.into(),
                extra: Map::new(),
            },
            job_to_be_done: JobToBeDone::Text(task.into()),
        }
    }

    /// Load and validate a persona file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidPersona(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Parse and validate persona JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let input: PersonaInput =
            serde_json::from_str(json).map_err(|e| Error::InvalidPersona(e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    fn validate(&self) -> Result<()> {
        if self.persona.role.trim().is_empty() {
            return Err(Error::InvalidPersona("persona role is empty".to_string()));
        }
        if self.job_to_be_done.task().trim().is_empty() {
            return Err(Error::InvalidPersona("job_to_be_done task is empty".to_string()));
        }
        Ok(())
    }

    /// Query text embedded once per run.
    pub fn query(&self) -> String {
        format!(
            "Role: {}. Task: {}",
            self.persona.role,
            self.job_to_be_done.task()
        )
    }
}
