use thiserror::Error;

const MAX_MESSAGE_LENGTH: usize = 120;

/// Validation failure while turning wire JSON into the model. `path` points at the offending
/// value, e.g. `projects[0].dueDate`, and is empty for the root value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at {}: {message}", display_path(.path))]
pub struct DecodeError {
    pub path: String,
    pub message: String,
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

fn truncate(message: String) -> String {
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        message.chars().take(MAX_MESSAGE_LENGTH).collect::<String>() + "..."
    } else {
        message
    }
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            message: truncate(message.into()),
        }
    }

    /// Prefixes the path with an object key.
    pub fn at_key(mut self, key: &str) -> Self {
        self.path = if self.path.is_empty() || self.path.starts_with('[') {
            format!("{key}{}", self.path)
        } else {
            format!("{key}.{}", self.path)
        };
        self
    }

    /// Prefixes the path with an array index.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path = if self.path.is_empty() || self.path.starts_with('[') {
            format!("[{index}]{}", self.path)
        } else {
            format!("[{index}].{}", self.path)
        };
        self
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for DecodeError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        Self {
            path: if path == "." { String::new() } else { path },
            message: truncate(error.inner().to_string()),
        }
    }
}
