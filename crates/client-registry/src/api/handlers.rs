//! HTTP request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use telegram_client::Update;
use tracing::{debug, error, info, warn};

use super::types::{CreateClientRequest, CreateClientResponse, HealthResponse};
use super::AppState;
use crate::error::RegistrationError;
use crate::phone;
use crate::store::StoreError;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let bot_healthy = state.notifier.health_check().await;

    let (status, client_count) = match state.store.count().await {
        Ok(count) => ("ok", count),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the store");
            ("degraded", 0)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        client_count,
        bot_healthy,
    })
}

/// Register a client phone number.
///
/// Validates the number against the default region's plan, stores its E.164
/// form inside one transaction, then notifies the admin chat. The
/// notification is best-effort: by the time it runs the row is committed,
/// so a failed send is logged and the response stays 201.
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<CreateClientResponse>), RegistrationError> {
    let raw = request.phone_number;

    let normalized = match phone::normalize(&raw, state.default_region) {
        Ok(normalized) => normalized,
        Err(e) => {
            warn!(phone_number = %raw, error = %e, "Rejected registration request");
            return Err(e);
        }
    };

    info!(phone_number = %normalized, "Registration request received");

    let client = match state.store.insert(&normalized).await {
        Ok(client) => client,
        Err(StoreError::DuplicateNumber(_)) => {
            warn!(phone_number = %normalized, "Client already exists");
            return Err(RegistrationError::DuplicateClient(raw));
        }
        Err(StoreError::Database(e)) => {
            error!(phone_number = %normalized, error = %e, "Failed to store client");
            return Err(RegistrationError::Persistence(raw));
        }
    };

    info!(
        client_id = client.id,
        phone_number = %client.phone_number,
        "Client created"
    );

    if let Err(e) = state.notifier.client_registered(&client).await {
        error!(
            phone_number = %client.phone_number,
            error = %e,
            "Failed to notify admin about the new client"
        );
    }

    let message = format!(
        "Client with phone number \"{}\" successfully registered.",
        client.phone_number
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateClientResponse {
            id: client.id,
            phone_number: client.phone_number,
            message,
        }),
    ))
}

/// Accept a Telegram webhook update.
///
/// Update dispatch is out of scope for this service: updates are logged
/// for operators and acknowledged so Telegram stops retrying them.
pub async fn bot_webhook(Json(update): Json<Update>) -> StatusCode {
    debug!(
        update_id = update.update_id,
        text = update.message.as_ref().and_then(|m| m.text.as_deref()),
        "Webhook update received"
    );

    StatusCode::OK
}
