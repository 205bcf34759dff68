//! Module for reading annotations, and reading and writing Models
pub mod annotation;
pub mod flat_file;
pub mod json;

use thiserror::Error;

use crate::knowledge_base::KnowledgeBaseError;
use crate::model::model::ModelError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Unable to read or write model file")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse model json")]
    UnableToParse(#[from] serde_json::Error),
    #[error("Unsupported model document version {0}")]
    UnsupportedVersion(u32),
    #[error("Line {line} of {file} is malformed")]
    MalformedLine { file: String, line: usize },
    #[error("The {field} {value:?} contains a character reserved by the file format")]
    DelimiterInField { field: &'static str, value: String },
    #[error("The {0} is empty, which the file format can't represent")]
    EmptyField(&'static str),
    #[error("Unable to load the knowledge base for the model")]
    KnowledgeBase(#[from] KnowledgeBaseError),
    #[error("Unable to rebuild model")]
    Model(#[from] ModelError),
}

/// Local time in ISO 8601 format, used for the `created_on` field of saved models
pub(crate) fn created_on_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
