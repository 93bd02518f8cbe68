//! Error page lookup and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Response;

use crate::handler::DefaultHandler;
use crate::{Handler, SharedHandler};

/// Handlers for specific status codes.
pub type Routes = HashMap<StatusCode, SharedHandler>;

/// Longest parent chain [`Router::for_code`] will walk before giving up.
///
/// Parent links are plain `Arc`s with no cycle check; a chain this deep is
/// assumed to be a cycle and resolution fails closed to the fallback.
const MAX_CHAIN_DEPTH: usize = 64;

/// Finds the [`Handler`] for a given error code.
///
/// Resolution order, highest precedence first:
/// 1. codes outside the 4xx and 5xx ranges are replaced with 500;
/// 2. an exact entry in [`specific`](Self::specific);
/// 3. [`client`](Self::client) for 4xx codes, [`server`](Self::server) for 5xx;
/// 4. [`universal`](Self::universal);
/// 5. the [`parent`](Self::parent) router, restarting at step 2;
/// 6. [`fallback`](Self::fallback), the terminal plain-text handler.
///
/// `Router::default()` sends everything to the default plain-text page, so
/// struct-update syntax is the usual way to build one:
///
/// ```
/// use std::sync::Arc;
///
/// use axum::http::StatusCode;
/// use pages::{DefaultHandler, Router, StatusMessages};
///
/// let apologetic = Router {
///     fallback: Arc::new(DefaultHandler::new(
///         StatusMessages::standard().with(StatusCode::NOT_FOUND, "It's not here, sorry"),
///     )),
///     ..Router::default()
/// };
/// ```
///
/// Routers are built once at startup and read concurrently afterwards; don't
/// mutate one while it is resolving on other tasks.
#[derive(Clone)]
pub struct Router {
    /// Handlers for specific codes.
    pub specific: Routes,
    /// Handler for all 4xx codes.
    pub client: Option<SharedHandler>,
    /// Handler for all 5xx codes.
    pub server: Option<SharedHandler>,
    /// Handler for every code the tables above didn't match.
    pub universal: Option<SharedHandler>,
    /// Router that takes over when nothing here matched. Lets one spot
    /// override a few pages while inheriting everything else.
    pub parent: Option<Arc<Router>>,
    /// Terminal handler once the whole chain has passed.
    ///
    /// Only consulted on the last router of the chain (or on the first, if
    /// the chain turns out to be a cycle).
    pub fallback: SharedHandler,
}

impl Default for Router {
    /// An "always defer" router: every code reaches [`fallback`](Self::fallback),
    /// which renders the standard plain-text pages.
    fn default() -> Self {
        Router {
            specific: Routes::new(),
            client: None,
            server: None,
            universal: None,
            parent: None,
            fallback: Arc::new(DefaultHandler::default()),
        }
    }
}

impl Router {
    /// Returns the handler for `code`. Infallible.
    pub fn for_code(&self, code: StatusCode) -> SharedHandler {
        // not an error code is an error
        let code = if code.is_client_error() || code.is_server_error() {
            code
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let mut router = self;
        for _ in 0..MAX_CHAIN_DEPTH {
            if let Some(handler) = router.specific.get(&code) {
                return handler.clone();
            }

            let class = if code.is_client_error() {
                &router.client
            } else {
                &router.server
            };
            if let Some(handler) = class {
                return handler.clone();
            }

            if let Some(handler) = &router.universal {
                return handler.clone();
            }

            match &router.parent {
                Some(parent) => router = parent,
                None => return router.fallback.clone(),
            }
        }

        tracing::warn!(%code, "error router parent chain too deep, assuming a cycle");
        self.fallback.clone()
    }

    /// Renders the error page for `code`.
    ///
    /// The handler receives the code exactly as given here; only the lookup
    /// itself corrects out-of-range codes.
    pub fn respond(&self, req: &Parts, code: StatusCode) -> Response {
        self.for_code(code).call(req, code)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt as _;

    use super::*;

    fn page(marker: &'static str) -> SharedHandler {
        Arc::new(move |_: &Parts, _: StatusCode| Response::new(Body::from(marker)))
    }

    fn parts() -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/kitty")
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn specific_beats_universal() {
        let a = page("418");
        let b = page("502");
        let c = page("universal");
        let router = Router {
            specific: Routes::from([
                (StatusCode::IM_A_TEAPOT, a.clone()),
                (StatusCode::BAD_GATEWAY, b.clone()),
            ]),
            universal: Some(c.clone()),
            ..Router::default()
        };

        assert!(Arc::ptr_eq(&router.for_code(StatusCode::IM_A_TEAPOT), &a));
        assert!(Arc::ptr_eq(&router.for_code(StatusCode::BAD_GATEWAY), &b));
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::INTERNAL_SERVER_ERROR),
            &c
        ));
    }

    #[test]
    fn class_handlers_cover_their_range() {
        let client = page("client");
        let server = page("server");
        let router = Router {
            client: Some(client.clone()),
            server: Some(server.clone()),
            ..Router::default()
        };

        assert!(Arc::ptr_eq(&router.for_code(StatusCode::NOT_FOUND), &client));
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::IM_A_TEAPOT),
            &client
        ));
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::BAD_GATEWAY),
            &server
        ));
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::INTERNAL_SERVER_ERROR),
            &server
        ));
    }

    #[test]
    fn class_beats_universal() {
        let client = page("client");
        let universal = page("universal");
        let router = Router {
            client: Some(client.clone()),
            universal: Some(universal.clone()),
            ..Router::default()
        };

        assert!(Arc::ptr_eq(&router.for_code(StatusCode::NOT_FOUND), &client));
        // no server handler set, so 5xx falls through to universal
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::BAD_GATEWAY),
            &universal
        ));
    }

    #[test]
    fn out_of_range_codes_resolve_like_500() {
        let five_hundred = page("500");
        let router = Router {
            specific: Routes::from([(StatusCode::INTERNAL_SERVER_ERROR, five_hundred.clone())]),
            ..Router::default()
        };

        for code in [
            StatusCode::CONTINUE,
            StatusCode::OK,
            StatusCode::MOVED_PERMANENTLY,
        ] {
            assert!(Arc::ptr_eq(&router.for_code(code), &five_hundred));
        }
    }

    #[test]
    fn child_overrides_parent() {
        let overridden = page("child 404");
        let parent_universal = page("parent");
        let parent = Arc::new(Router {
            universal: Some(parent_universal.clone()),
            ..Router::default()
        });
        let child = Router {
            specific: Routes::from([(StatusCode::NOT_FOUND, overridden.clone())]),
            parent: Some(parent),
            ..Router::default()
        };

        assert!(Arc::ptr_eq(
            &child.for_code(StatusCode::NOT_FOUND),
            &overridden
        ));
        assert!(Arc::ptr_eq(
            &child.for_code(StatusCode::FORBIDDEN),
            &parent_universal
        ));
    }

    #[test]
    fn parent_specific_entries_stay_reachable() {
        let parent_404 = page("parent 404");
        let parent = Arc::new(Router {
            specific: Routes::from([(StatusCode::NOT_FOUND, parent_404.clone())]),
            ..Router::default()
        });
        let child = Router {
            parent: Some(parent),
            ..Router::default()
        };

        assert!(Arc::ptr_eq(
            &child.for_code(StatusCode::NOT_FOUND),
            &parent_404
        ));
    }

    #[test]
    fn zero_value_router_uses_the_fallback() {
        let router = Router::default();
        for code in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            assert!(Arc::ptr_eq(&router.for_code(code), &router.fallback));
        }
    }

    #[test]
    fn absurdly_deep_chains_fail_closed() {
        let mut router = Router::default();
        for _ in 0..(2 * MAX_CHAIN_DEPTH) {
            router = Router {
                parent: Some(Arc::new(router)),
                ..Router::default()
            };
        }

        // the walk gives up before reaching the end of the chain and serves
        // the starting router's fallback
        assert!(Arc::ptr_eq(
            &router.for_code(StatusCode::NOT_FOUND),
            &router.fallback
        ));
    }

    #[tokio::test]
    async fn zero_value_router_renders_plain_text() {
        let router = Router::default();
        let response = router.respond(&parts(), StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf8"
        );
        assert_eq!(body_text(response).await, "Not Found\n");
    }

    #[tokio::test]
    async fn respond_forwards_the_code_as_given() {
        let router = Router {
            universal: Some(Arc::new(|_: &Parts, code: StatusCode| {
                Response::new(Body::from(format!("got {}", code.as_u16())))
            })),
            ..Router::default()
        };

        // lookup corrected 301 to 500 to find a handler, but the handler
        // still sees the code the caller passed
        let response = router.respond(&parts(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(body_text(response).await, "got 301");
    }
}
