//! HTTP routes for the ABX endpoint.

use std::sync::Arc;

use abx_fetch::{AbxClient, ClientError, fetch_records};
use abx_format::{FormatError, JsonFormatter};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info, warn};

use crate::ServerConfig;

/// Message returned when the ABX server cannot be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Unable to connect to ABX server. Please try again later.";

/// Message returned for any other failure.
pub const INTERNAL_MESSAGE: &str = "An error occurred while processing your request.";

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    client: AbxClient,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates the handler state from a server configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client: AbxClient::new(config.client.clone()),
            config: Arc::new(config),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Creates the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ABX/GetDataPackets", get(get_data_packets))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn get_data_packets(State(state): State<AppState>) -> Result<Response, ApiError> {
    let config = state.config();
    info!(endpoint = %config.client.endpoint(), "Fetching data packets");

    let outcome = fetch_records(&state.client, &config.recovery, |_| {})
        .await
        .map_err(ApiError::Fetch)?;

    if !outcome.is_complete() {
        warn!(
            unresolved = ?outcome.recovery.unresolved,
            unrequestable = outcome.recovery.unrequestable.count,
            unrequestable_span = ?outcome.recovery.unrequestable.span,
            "Returning incomplete record set"
        );
    }

    let body = JsonFormatter::new()
        .with_pretty(true)
        .render(&outcome.records)
        .map_err(ApiError::Export)?;

    tokio::fs::write(&config.output_path, &body)
        .await
        .map_err(|e| ApiError::Export(FormatError::Io(e)))?;

    info!(
        records = outcome.records.len(),
        path = %config.output_path.display(),
        "Wrote data packets"
    );

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Failure of a data packet request.
#[derive(Debug)]
pub enum ApiError {
    /// The stream session could not be completed.
    Fetch(ClientError),
    /// The records could not be rendered or written to the output file.
    Export(FormatError),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(e) if e.is_transport() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Fetch(e) => error!(stage = "fetch", error = %e, "Data packet request failed"),
            Self::Export(e) => error!(stage = "export", error = %e, "Data packet request failed"),
        }

        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            UNAVAILABLE_MESSAGE
        } else {
            INTERNAL_MESSAGE
        };
        (status, message).into_response()
    }
}
