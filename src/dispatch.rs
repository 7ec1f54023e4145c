//! Turns a request into a response through the url configuration.

use crate::error::ViewError;
use crate::http::handler::ViewResult;
use crate::http::request::{Request, RequestContext};
use crate::http::{Response, not_found, server_error};
use crate::urls::UrlConf;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Resolves the request path and calls the matching handler.
///
/// One leading `/` is dropped before matching, so patterns are written
/// without it (`^$` is the site root).
pub fn path_to_response(urlconf: &UrlConf, request: &Request) -> ViewResult {
    let full_path = request.path();
    let path = full_path.strip_prefix('/').unwrap_or(&*full_path);

    let Some(m) = urlconf.resolve(path)? else {
        debug!(path, "no url pattern matched");
        return Err(ViewError::NotFound);
    };

    let ctx = RequestContext::new(request, m.args, m.kwargs);
    (m.func)(&ctx)
}

/// Like [`path_to_response`], but never fails: not found becomes a 404,
/// anything else (including a panicking handler) a 500.
pub fn application(urlconf: &UrlConf, request: &Request) -> Response {
    let result = panic::catch_unwind(AssertUnwindSafe(|| path_to_response(urlconf, request)));

    match result {
        Ok(Ok(response)) => response,
        Ok(Err(ViewError::NotFound)) => not_found(),
        Ok(Err(e)) => {
            error!(url = %request.url, error = %e, "handler failed");
            server_error()
        }
        Err(payload) => {
            error!(
                url = %request.url,
                panic = panic_message(payload.as_ref()),
                "handler panicked"
            );
            server_error()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
