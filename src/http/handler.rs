use crate::error::ViewError;
use crate::http::Response;
use crate::http::request::RequestContext;

pub type ViewResult = Result<Response, ViewError>;

pub type HandlerFunc = Box<dyn Fn(&RequestContext) -> ViewResult + Sync + Send>;

/// Boxes a closure or fn as a handler.
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&RequestContext) -> ViewResult + Sync + Send + 'static,
{
    Box::new(f)
}
