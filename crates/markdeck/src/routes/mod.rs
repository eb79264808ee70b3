//! Route definitions.
//!
//! ## Routes
//!
//! - `GET /` - Random snippet for `?category=` (default "default")
//! - `POST /shuffle` - Random snippet for the form's `category`
//! - `GET /new` - Submission form
//! - `POST /new` - Store a snippet, then redirect to `/`
//! - `GET /health` - Health check (JSON)

mod health;
mod snippets;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use maud::Markup;

use crate::pages::CSP_HEADER;
use crate::state::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(snippets::show_random))
        .route("/shuffle", post(snippets::shuffle))
        .route("/new", get(snippets::new_form).post(snippets::create))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// Build a 200 HTML response with security headers.
fn html_response(markup: Markup) -> Response {
    html_response_with_status(StatusCode::OK, markup)
}

/// Build an HTML response with security headers.
///
/// Every page shows a fresh random pick, so nothing is cacheable. Error
/// pages carry the same headers.
pub(crate) fn html_response_with_status(status: StatusCode, markup: Markup) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    (status, headers, markup.into_string()).into_response()
}
