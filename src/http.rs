//! HTTP transport for the RPC layer.
//!
//! Queries are `GET /api/trpc/{procedure}?input=<json>`, mutations are
//! `POST /api/trpc/{procedure}` with a JSON body.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::rpc::{ErrorCode, ProcedureKind, RpcError, RpcRouter, SessionEffect, ValidationError};
use crate::session::{token_from_cookie_header, CookiePolicy};

pub const API_PREFIX: &str = "/api/trpc";

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RpcRouter>,
    pub cookies: Arc<CookiePolicy>,
}

impl AppState {
    pub fn new(router: RpcRouter, cookies: CookiePolicy) -> Self {
        Self {
            router: Arc::new(router),
            cookies: Arc::new(cookies),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    input: Option<String>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            &format!("{API_PREFIX}/{{procedure}}"),
            get(handle_query).post(handle_mutation),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = json!({
            "error": {
                "code": code.as_str(),
                "message": self.public_message(),
            }
        });
        (status_for(code), Json(body)).into_response()
    }
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
}

async fn respond(
    state: &AppState,
    procedure: &str,
    kind: ProcedureKind,
    headers: &HeaderMap,
    input: Result<Value, ValidationError>,
) -> Response {
    let caller = state.router.caller(session_token(headers));
    let output = match state
        .router
        .call_decoded(&caller, procedure, kind, input)
        .await
    {
        Ok(output) => output,
        Err(err) => return err.into_response(),
    };

    let mut response = Json(json!({ "result": { "data": output.data } })).into_response();
    if output.effect == Some(SessionEffect::ClearCookie) {
        match HeaderValue::from_str(&state.cookies.clear_cookie()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => warn!(error = %err, "cookie policy produced an invalid header"),
        }
    }
    response
}

async fn handle_query(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
) -> Response {
    let input = match params.input.as_deref() {
        None | Some("") => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).map_err(ValidationError::from),
    };
    respond(&state, &procedure, ProcedureKind::Query, &headers, input).await
}

async fn handle_mutation(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(&body).map_err(ValidationError::from)
    };
    respond(&state, &procedure, ProcedureKind::Mutation, &headers, input).await
}
