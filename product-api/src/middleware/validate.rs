use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::RawPathParamsRejection, RawPathParams, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::validation::{RequestInput, RuleSet};

const BODY_LIMIT: usize = 1024 * 1024;

/// Request body as parsed by [`handle_input_errors`], available to handlers
/// through `Extension<JsonBody>`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

/// Runs every rule of the route, answers 400 with all collected errors when
/// any fail, and otherwise forwards the request with its parsed body attached.
///
/// Mounted per handler with `middleware::from_fn_with_state(Arc::new(rules), handle_input_errors)`.
pub async fn handle_input_errors(
    State(rules): State<Arc<RuleSet>>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let params: HashMap<String, String> = params
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT).await.map_err(read_error)?;

    let body = parse_body(&parts.headers, &bytes)?;
    let input = RequestInput { params, body };

    let errors = rules.validate(&input);
    if !errors.is_empty() {
        tracing::debug!(uri = %parts.uri, errors = %errors, "rejecting invalid input");
        return Err(AppError::Validation(errors));
    }

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(JsonBody(input.body));

    Ok(next.run(request).await)
}

fn read_error(error: axum::Error) -> AppError {
    let error = error.into_inner();
    if error.downcast_ref::<LengthLimitError>().is_some() {
        return AppError::PayloadTooLarge(format!("Request body exceeds {} bytes", BODY_LIMIT));
    }

    AppError::BadRequest(format!("Failed to read request body: {}", error))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn parse_body(headers: &HeaderMap, bytes: &Bytes) -> Result<Value, AppError> {
    if !is_json(headers) || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}
