//! The built-in handlers and adapters for foreign ones.

use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;

use crate::codes::StatusMessages;
use crate::{BoxError, Handler, SharedHandler};

/// The terminal handler: a plain-text page with the message for the code.
#[derive(Debug, Clone)]
pub struct DefaultHandler {
    messages: StatusMessages,
}

impl DefaultHandler {
    pub fn new(messages: StatusMessages) -> Self {
        Self { messages }
    }
}

impl Default for DefaultHandler {
    /// Uses [`StatusMessages::standard`].
    fn default() -> Self {
        Self::new(StatusMessages::standard())
    }
}

impl Handler for DefaultHandler {
    fn call(&self, _req: &Parts, code: StatusCode) -> Response {
        let (code, message) = self.messages.message(code);
        plain_text(code, format!("{message}\n"))
    }
}

fn plain_text(code: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = code;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf8"),
    );
    response
}

/// Adapts a body renderer that knows nothing about status dispatch.
///
/// The returned handler renders `body` and then forces the dispatched code
/// onto the response; whatever status the renderer set is discarded.
pub fn wrap<F>(body: F) -> SharedHandler
where
    F: Fn(&Parts) -> Response + Send + Sync + 'static,
{
    Arc::new(move |req: &Parts, code: StatusCode| {
        let mut response = body(req);
        *response.status_mut() = code;
        response
    })
}

/// Render context handed to [`Template::render`].
///
/// Serializes with the keys `Code` and `Message`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorContext {
    pub code: u16,
    pub message: String,
}

/// The one capability a template engine has to provide.
pub trait Template: Send + Sync {
    /// Renders the page for `context` into `out`.
    fn render(
        &self,
        out: &mut dyn std::io::Write,
        context: &ErrorContext,
    ) -> Result<(), BoxError>;
}

impl<F> Template for F
where
    F: Fn(&mut dyn std::io::Write, &ErrorContext) -> Result<(), BoxError> + Send + Sync,
{
    fn render(
        &self,
        out: &mut dyn std::io::Write,
        context: &ErrorContext,
    ) -> Result<(), BoxError> {
        self(out, context)
    }
}

/// Builds a handler that renders `template` with the code and message
/// resolved through `messages`.
///
/// Rendering is buffered. On success the buffer becomes the body and the
/// resolved code the status; no content type is set, the template owns its
/// representation. On failure the default plain-text 500 page is served
/// instead, with the render error appended as a trailing diagnostic line:
/// best effort, the request is never left unanswered.
pub fn template_handler<T>(template: T, messages: StatusMessages) -> SharedHandler
where
    T: Template + 'static,
{
    Arc::new(move |_req: &Parts, code: StatusCode| {
        let (code, message) = messages.message(code);
        let context = ErrorContext {
            code: code.as_u16(),
            message: message.to_owned(),
        };

        let mut buffer = Vec::new();
        match template.render(&mut buffer, &context) {
            Ok(()) => {
                let mut response = Response::new(Body::from(buffer));
                *response.status_mut() = code;
                response
            }
            Err(err) => {
                tracing::warn!(error = %err, "error page template failed, serving the default page");
                let (code, message) = messages.message(StatusCode::INTERNAL_SERVER_ERROR);
                plain_text(code, format!("{message}\n{err}\n"))
            }
        }
    })
}
