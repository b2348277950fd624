//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to register a client phone number.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub phone_number: String,
}

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct CreateClientResponse {
    pub id: i64,
    pub phone_number: String,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub client_count: i64,
    pub bot_healthy: bool,
}
