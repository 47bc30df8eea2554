//! API request handlers.

pub mod config;
pub mod health;
pub mod orders;
pub mod webhook;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
