use std::path::Path;

use kirinuki::{ErrorKind, KirinukiError};
use serde::Serialize;

/// The single JSON object written to stdout.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn clip(path: &Path) -> Self {
        Self {
            path: Some(path.to_string_lossy().into_owned()),
            error: None,
        }
    }

    /// Rejected urls are explained, any other failure is reported generically.
    pub fn failure(error: &anyhow::Error) -> Self {
        let reason = match error.downcast_ref::<KirinukiError>() {
            Some(e) if e.kind() == ErrorKind::Rejected => e.to_string(),
            _ => "Could not clip.".to_string(),
        };

        Self {
            path: None,
            error: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
