//! Route handlers.
//!
//! A handler is a pure function of the request context and the bindings
//! captured by the router. It never sees the raw request body.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::Bindings;

/// Request facts made available to handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub request_id: String,
}

/// A plain-text response produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TextResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }
}

impl IntoResponse for TextResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Produces a response for a matched route.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &RequestContext, bindings: &Bindings) -> TextResponse;
}

impl<F> Handler for F
where
    F: Fn(&RequestContext, &Bindings) -> TextResponse + Send + Sync + 'static,
{
    fn call(&self, ctx: &RequestContext, bindings: &Bindings) -> TextResponse {
        self(ctx, bindings)
    }
}

/// Handler reference stored in the route table.
pub type SharedHandler = Arc<dyn Handler>;

/// Responds with a fixed status and a body template.
///
/// `{name}` in the template is replaced by the binding `name`. Unknown
/// placeholders are left as written.
#[derive(Debug, Clone)]
pub struct TextHandler {
    status: StatusCode,
    template: String,
}

impl TextHandler {
    pub fn new(status: StatusCode, template: impl Into<String>) -> Self {
        Self {
            status,
            template: template.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn render(&self, bindings: &Bindings) -> String {
        if bindings.is_empty() || !self.template.contains('{') {
            return self.template.clone();
        }

        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match bindings.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Handler for TextHandler {
    fn call(&self, _ctx: &RequestContext, bindings: &Bindings) -> TextResponse {
        TextResponse {
            status: self.status,
            body: self.render(bindings),
        }
    }
}
