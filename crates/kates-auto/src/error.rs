use std::fmt;

use kates_core::{ParseError, ScriptExecutionError};

#[derive(Debug)]
pub enum AutoError {
    Parse(ParseError),
    Execution(ScriptExecutionError),
    Config { message: String },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl AutoError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AutoError::Parse(_) => 2,
            AutoError::Execution(_) => 3,
            AutoError::Config { .. } => 4,
            AutoError::Io(_) => 4,
            AutoError::Json(_) => 1,
        }
    }
}

impl fmt::Display for AutoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoError::Parse(e) => write!(f, "{}", e),
            AutoError::Execution(e) => write!(f, "{}", e),
            AutoError::Config { message } => write!(f, "Config error: {}", message),
            AutoError::Io(e) => write!(f, "IO error: {}", e),
            AutoError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for AutoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AutoError::Parse(e) => Some(e),
            AutoError::Execution(e) => Some(e),
            AutoError::Config { .. } => None,
            AutoError::Io(e) => Some(e),
            AutoError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for AutoError {
    fn from(e: std::io::Error) -> Self {
        AutoError::Io(e)
    }
}

impl From<serde_json::Error> for AutoError {
    fn from(e: serde_json::Error) -> Self {
        AutoError::Json(e)
    }
}

impl From<ParseError> for AutoError {
    fn from(e: ParseError) -> Self {
        AutoError::Parse(e)
    }
}

impl From<ScriptExecutionError> for AutoError {
    fn from(e: ScriptExecutionError) -> Self {
        AutoError::Execution(e)
    }
}
