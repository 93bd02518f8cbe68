//! Routing of HTTP error pages.
//!
//! In its simplest form this replaces an inline
//! `(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")` with
//! [`Router::respond`], where the message text comes from a
//! [`StatusMessages`] table. Beyond that, a [`Router`] can send specific
//! codes, whole classes of codes (4xx vs 5xx), or everything to custom
//! [`Handler`]s, and can defer to a parent router so one part of a service
//! overrides a few pages while inheriting the rest.
//!
//! ```
//! use axum::http::{Request, StatusCode};
//! use pages::Router;
//!
//! let router = Router::default();
//! let (parts, ()) = Request::builder().uri("/kitty").body(()).unwrap().into_parts();
//!
//! let response = router.respond(&parts, StatusCode::NOT_FOUND);
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! ```

pub mod codes;
pub mod handler;
pub mod router;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Response;

pub use codes::StatusMessages;
pub use handler::{DefaultHandler, ErrorContext, Template, template_handler, wrap};
pub use router::{Router, Routes};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Renders the error page for one status code.
///
/// A handler builds the entire response: status, headers, and body. Closures
/// with the matching signature implement this automatically; implement it by
/// hand when the handler carries state worth naming.
pub trait Handler: Send + Sync {
    fn call(&self, req: &Parts, code: StatusCode) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Parts, StatusCode) -> Response + Send + Sync,
{
    fn call(&self, req: &Parts, code: StatusCode) -> Response {
        self(req, code)
    }
}

/// A [`Handler`] shared between routers.
///
/// The same handler value may back any number of routers; a router never owns
/// its handlers exclusively.
pub type SharedHandler = Arc<dyn Handler>;
