use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file} at {line}:{column}: {message}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{0}: root node is not an object list")]
    NotObjectList(String),

    #[error("{file}: malformed {kind} declaration: {reason}")]
    MalformedDeclaration {
        file: String,
        kind: &'static str,
        reason: String,
    },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for DocError {
    fn from(e: serde_json::Error) -> Self {
        DocError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for DocError {
    fn from(e: serde_yaml::Error) -> Self {
        DocError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
