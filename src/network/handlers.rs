//! Request handlers
//!
//! Each handler decodes its body, runs one service operation and maps the
//! outcome to a status code.

use std::time::Duration;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::error::{PartError, Result};
use crate::model::RobotPart;
use crate::protocol::{
    decode_request, messages, DeleteRequest, JsonMessage, ListCompatibleRequest, ReadRequest,
    UpdateRequest, ENDPOINT_ADD, ENDPOINT_DELETE, ENDPOINT_LIST_ALL, ENDPOINT_LIST_COMPATIBLE,
    ENDPOINT_READ, ENDPOINT_UPDATE,
};
use crate::service::PartsService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppContext {
    pub service: PartsService,
    pub request_timeout: Duration,
}

impl AppContext {
    pub fn new(service: PartsService, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Run a service call on the blocking pool, bounded by the request timeout
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&PartsService) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        let task = tokio::task::spawn_blocking(move || op(&service));

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PartError::StoreUnavailable(format!(
                "Service task failed: {}",
                e
            ))),
            Err(_) => Err(PartError::Timeout),
        }
    }
}

pub async fn handle_add(Extension(ctx): Extension<AppContext>, body: Bytes) -> Response {
    let part: RobotPart = match decode_body(ENDPOINT_ADD, &body) {
        Ok(part) => part,
        Err(e) => return error_response(ENDPOINT_ADD, e),
    };

    match ctx.run(move |service| service.add(part)).await {
        Ok(()) => acknowledge(),
        Err(e) => error_response(ENDPOINT_ADD, e),
    }
}

pub async fn handle_read(Extension(ctx): Extension<AppContext>, body: Bytes) -> Response {
    let req: ReadRequest = match decode_body(ENDPOINT_READ, &body) {
        Ok(req) => req,
        Err(e) => return error_response(ENDPOINT_READ, e),
    };

    match ctx.run(move |service| service.read(&req.serial_number)).await {
        Ok(part) => (StatusCode::OK, Json(part)).into_response(),
        Err(e) => error_response(ENDPOINT_READ, e),
    }
}

pub async fn handle_update(Extension(ctx): Extension<AppContext>, body: Bytes) -> Response {
    let req: UpdateRequest = match decode_body(ENDPOINT_UPDATE, &body) {
        Ok(req) => req,
        Err(e) => return error_response(ENDPOINT_UPDATE, e),
    };

    // Unknown field names and mistyped values are rejected here, before the
    // service sees them
    let (serial_number, update) = match req.into_update() {
        Ok(pair) => pair,
        Err(e) => return error_response(ENDPOINT_UPDATE, e),
    };

    match ctx
        .run(move |service| service.update(&serial_number, update))
        .await
    {
        Ok(()) => acknowledge(),
        Err(e) => error_response(ENDPOINT_UPDATE, e),
    }
}

pub async fn handle_delete(Extension(ctx): Extension<AppContext>, body: Bytes) -> Response {
    let req: DeleteRequest = match decode_body(ENDPOINT_DELETE, &body) {
        Ok(req) => req,
        Err(e) => return error_response(ENDPOINT_DELETE, e),
    };

    match ctx.run(move |service| service.delete(&req.serial_number)).await {
        Ok(()) => acknowledge(),
        Err(e) => error_response(ENDPOINT_DELETE, e),
    }
}

pub async fn handle_list_all(Extension(ctx): Extension<AppContext>) -> Response {
    match ctx.run(|service| service.list_all()).await {
        Ok(parts) => (StatusCode::OK, Json(parts)).into_response(),
        Err(e) => error_response(ENDPOINT_LIST_ALL, e),
    }
}

pub async fn handle_list_compatible(
    Extension(ctx): Extension<AppContext>,
    body: Bytes,
) -> Response {
    let req: ListCompatibleRequest = match decode_body(ENDPOINT_LIST_COMPATIBLE, &body) {
        Ok(req) => req,
        Err(e) => return error_response(ENDPOINT_LIST_COMPATIBLE, e),
    };

    match ctx
        .run(move |service| service.list_compatible(&req.serial_number, req.limit()))
        .await
    {
        Ok(parts) => (StatusCode::OK, Json(parts)).into_response(),
        Err(e) => error_response(ENDPOINT_LIST_COMPATIBLE, e),
    }
}

/// Map a failed operation to its status code and `{message}` body
pub fn error_response(endpoint: &str, err: PartError) -> Response {
    let (status, message) = match &err {
        PartError::NotFound(_) => (StatusCode::NOT_FOUND, messages::NOT_FOUND.to_string()),
        PartError::AlreadyExists(_) => {
            (StatusCode::BAD_REQUEST, messages::ALREADY_EXISTS.to_string())
        }
        PartError::Conflict(_) => (StatusCode::BAD_REQUEST, messages::SERIAL_CONFLICT.to_string()),
        PartError::InvalidArgument(reason) => (
            StatusCode::BAD_REQUEST,
            format!("{} {}", messages::BAD_REQUEST_PREFIX, reason),
        ),
        PartError::Protocol(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            messages::UNPROCESSABLE.to_string(),
        ),
        PartError::Timeout => (
            StatusCode::INTERNAL_SERVER_ERROR,
            messages::TIMED_OUT.to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            messages::INTERNAL.to_string(),
        ),
    };

    if status.is_server_error() {
        tracing::error!("{} failed: {}", endpoint, err);
    } else {
        tracing::warn!("{} rejected: {}", endpoint, err);
    }

    (status, Json(JsonMessage::new(message))).into_response()
}

fn acknowledge() -> Response {
    (StatusCode::OK, Json(JsonMessage::ok())).into_response()
}

fn decode_body<T: serde::de::DeserializeOwned>(endpoint: &str, body: &Bytes) -> Result<T> {
    decode_request(body).map_err(|e| {
        tracing::debug!(
            "Could not decode {} request: {}",
            endpoint,
            String::from_utf8_lossy(body)
        );
        e
    })
}
