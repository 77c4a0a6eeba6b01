//! API data models

use serde::{Deserialize, Serialize};

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health report, including collaborator availability.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub caption_model: bool,
    pub detection_model: bool,
}
