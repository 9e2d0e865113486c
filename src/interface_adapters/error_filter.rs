use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::errors::TicketError;

// Rejection bodies produced by the framework are short plain-text lines.
const REJECTION_BODY_LIMIT: usize = 64 * 1024;

// Error value carried by every failed request. Handlers raise it; the
// translation layer alone turns it into bytes on the wire.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub trace: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        // A non-error status raised as an error means the raiser is broken;
        // treat it as a server fault rather than leaking it to the client.
        if !(status.is_client_error() || status.is_server_error()) {
            return Self::internal(format!("non-error status {status} raised as error"));
        }
        Self {
            status,
            kind,
            message: message.into(),
            trace: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFoundException", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BadRequestException", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "ConflictException", message)
    }

    // Server faults keep a generic client message; the detail goes into the
    // diagnostic trace for the error log only.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "InternalServerErrorException",
            message: "Internal server error".to_string(),
            trace: Some(detail.into()),
        }
    }
}

impl From<TicketError> for ApiError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::TicketNotFound | TicketError::ChecklistItemNotFound => {
                ApiError::not_found(err.to_string())
            }
            TicketError::EmptySubject
            | TicketError::EmptyRequester
            | TicketError::EmptyActor
            | TicketError::EmptyCommentBody => ApiError::bad_request(err.to_string()),
            TicketError::AlreadyInStatus(_) | TicketError::BrokenTransitionChain => {
                ApiError::conflict(err.to_string())
            }
            TicketError::StorageFailure => ApiError::internal("ticket store failure"),
        }
    }
}

// The response only carries the status here; translate_errors fills in the
// body because it alone knows the request's method and path.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.status.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

// Client-visible error envelope. Key names are the wire contract consumed by
// existing clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub message: String,
    pub error: String,
}

// Single choke point for error rendering, layered once over the whole
// router. Every raised ApiError and every framework rejection comes out as
// the same JSON envelope plus exactly one log record.
pub async fn translate_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;
    let status = response.status();

    if let Some(err) = response.extensions().get::<ApiError>().cloned() {
        return render(&method, &path, err);
    }

    // Rejections raised by the framework itself (unknown route, wrong
    // method, undecodable payload) never pass through ApiError, so the
    // envelope is synthesized from the status and the rejection text.
    if status.is_client_error() || status.is_server_error() {
        let bytes = to_bytes(response.into_body(), REJECTION_BODY_LIMIT)
            .await
            .unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes);
        let message = if text.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            text.trim().to_string()
        };
        let err = ApiError::new(status, kind_for_status(status), message);
        return render(&method, &path, err);
    }

    response
}

fn render(method: &Method, path: &str, err: ApiError) -> Response {
    log_fault(method, path, &err);
    let body = ErrorResponse {
        status_code: err.status.as_u16(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        path: path.to_string(),
        method: method.to_string(),
        message: err.message,
        error: err.kind.to_string(),
    };
    (err.status, Json(body)).into_response()
}

// Server faults get an error record with the diagnostic trace; client faults
// get a warning without one.
fn log_fault(method: &Method, path: &str, err: &ApiError) {
    let line = log_line(method.as_str(), path, err.status.as_u16(), &err.message);
    if err.status.is_server_error() {
        let trace = err.trace.as_deref().unwrap_or("<no trace captured>");
        error!(trace = %trace, "{line}");
    } else {
        warn!("{line}");
    }
}

fn log_line(method: &str, path: &str, status: u16, message: &str) -> String {
    format!("{method} {path} - {status}: {message}")
}

fn kind_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BadRequestException",
        StatusCode::UNAUTHORIZED => "UnauthorizedException",
        StatusCode::FORBIDDEN => "ForbiddenException",
        StatusCode::NOT_FOUND => "NotFoundException",
        StatusCode::METHOD_NOT_ALLOWED => "MethodNotAllowedException",
        StatusCode::CONFLICT => "ConflictException",
        StatusCode::PAYLOAD_TOO_LARGE => "PayloadTooLargeException",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UnsupportedMediaTypeException",
        StatusCode::UNPROCESSABLE_ENTITY => "UnprocessableEntityException",
        s if s.is_server_error() => "InternalServerErrorException",
        _ => "HttpException",
    }
}
