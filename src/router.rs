//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler, and every handler sees the same shared state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use tracing::info;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup around the shared state; pass it to
/// [`Server::serve`](crate::Server::serve). Each [`Router::on`] call returns
/// `self` so registrations chain naturally.
pub struct Router<S> {
    state: Arc<S>,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn with_state(state: Arc<S>) -> Self {
        Self { state, routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one fully-read request and produces one response.
    ///
    /// A path registered only under other methods gets `405`, as does an
    /// unknown method. A path nothing matches gets `404`. Both are bodiless.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let raw_method = parts.method.clone();
        let path = parts.uri.path().to_owned();

        let response = match Method::try_from(&parts.method) {
            Err(()) => Response::status(Status::MethodNotAllowed),
            Ok(method) => match self.lookup(method, &path) {
                Some((handler, params)) => {
                    let req = Request::new(parts, body, params);
                    handler.call(Arc::clone(&self.state), req).await
                }
                None if self.matches_any_method(&path) => {
                    Response::status(Status::MethodNotAllowed)
                }
                None => Response::status(Status::NotFound),
            },
        };

        info!(
            method = %raw_method,
            path = %path,
            status = response.status_code(),
            micros = started.elapsed().as_micros() as u64,
            "request"
        );
        response
    }

    fn matches_any_method(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}
