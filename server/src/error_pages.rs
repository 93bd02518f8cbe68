//! Middleware that renders pages for otherwise-bodyless error responses.

use axum::extract::{Request, State};
use http_body::Body as _;
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;

/// Replaces any 4xx/5xx response with an empty body by the page the error
/// router produces for that status.
///
/// A handler that already wrote an error body keeps it; rendering only kicks
/// in when nothing was written yet, which is the pages crate's "the handler
/// owns the whole response" contract.
pub(crate) async fn render(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let request = Request::from_parts(parts.clone(), body);

    let response = next.run(request).await;

    let status = response.status();
    let empty_error = (status.is_client_error() || status.is_server_error())
        && response.body().size_hint().exact() == Some(0);
    if !empty_error {
        return response;
    }

    state.errors.respond(&parts, status)
}
