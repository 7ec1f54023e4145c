//! Demo site served by the binary.

use crate::error::{ConfigResult, ViewError};
use crate::http::cookie::CookieOptions;
use crate::http::handler::{ViewResult, handler};
use crate::http::Response;
use crate::http::method::Method;
use crate::http::request::RequestContext;
use crate::http::status::Status;
use crate::urls::{UrlConf, UrlPattern, UrlRegistry, url};
use anyhow::Context;

pub fn index(_ctx: &RequestContext) -> ViewResult {
    Ok("<h1>root path</h1>".into())
}

pub fn show_path(ctx: &RequestContext) -> ViewResult {
    let n = ctx.arg(0).ok_or(ViewError::NotFound)?;
    Ok(format!("<p>get path{} information</p>", n).into())
}

pub fn root_index(ctx: &RequestContext) -> ViewResult {
    let root = ctx.kwarg("root").ok_or(ViewError::NotFound)?;
    Ok(format!("<h1>sub path with root number: {}</h1>", root).into())
}

pub fn root_path(ctx: &RequestContext) -> ViewResult {
    let path = ctx.arg(0).ok_or(ViewError::NotFound)?;
    let root = ctx.kwarg("root").unwrap_or("?");
    Ok(format!("<p>get sub /root{}/path{} information</p>", root, path).into())
}

pub fn root_dpath(ctx: &RequestContext) -> ViewResult {
    Ok(format!(
        "<p>get sub /root{}/dpath{} information</p>",
        ctx.kwarg("root").unwrap_or("?"),
        ctx.kwarg("dpath").unwrap_or("?"),
    )
    .into())
}

pub fn subdpath(ctx: &RequestContext) -> ViewResult {
    let n = ctx.kwarg("subdpath").ok_or(ViewError::NotFound)?;
    Ok(format!("<p>sub dpath number: {}</p>", n).into())
}

/// Remembers the last visit in a cookie.
pub fn visit(ctx: &RequestContext) -> ViewResult {
    let seen = ctx
        .get_header("cookie")
        .map(|c| c.split(';').any(|p| p.trim_start().starts_with("visited=")))
        .unwrap_or(false);

    let mut resp = Response::new(if seen {
        "<p>welcome back</p>"
    } else {
        "<p>first visit</p>"
    });
    resp.set_cookie(
        "visited",
        "1",
        CookieOptions {
            max_age: Some(3600),
            http_only: true,
            ..CookieOptions::default()
        },
    )
    .context("Can't set visited cookie")?;
    resp.set_header("Cache-Control", "no-store")
        .context("Can't set Cache-Control")?;
    Ok(resp)
}

pub fn forget(_ctx: &RequestContext) -> ViewResult {
    let mut resp = Response::new("<p>forgotten</p>");
    resp.delete_cookie("visited", None, None)
        .context("Can't delete visited cookie")?;
    Ok(resp)
}

/// Echoes a posted note back as plain text with `201 Created`.
pub fn create_note(ctx: &RequestContext) -> ViewResult {
    let request = ctx.request();
    if request.method != Method::POST {
        return Err(ViewError::NotFound);
    }

    let resp = Response::from_parts(
        Status::CREATED,
        vec![("Content-Type", "text/plain; charset=utf-8"), ("Location", "/notes")],
        Some(request.content.clone()),
    )
    .context("Can't build note response")?;
    Ok(resp)
}

fn sub_sub_patterns(_: &UrlRegistry) -> ConfigResult<Vec<UrlPattern>> {
    Ok(vec![
        url(r"^$", handler(root_dpath))?,
        url(r"^subdpath(?P<subdpath>[1,2])$", handler(subdpath))?,
    ])
}

fn sub_patterns(registry: &UrlRegistry) -> ConfigResult<Vec<UrlPattern>> {
    Ok(vec![
        url(r"^$", handler(root_index))?,
        url(r"^path([1,2])$", handler(root_path))?,
        url(r"^dpath(?P<dpath>[1,2])$", handler(root_dpath))?,
        url(r"^sdpath(?P<dpath>[1,2])/", registry.include("demo.sub.sub")?)?,
    ])
}

pub fn registry() -> UrlRegistry {
    let mut registry = UrlRegistry::new();
    registry
        .register("demo.sub", sub_patterns)
        .register("demo.sub.sub", sub_sub_patterns);
    registry
}

pub fn urlconf(registry: &UrlRegistry) -> ConfigResult<UrlConf> {
    Ok(UrlConf::new(vec![
        url(r"^$", handler(index))?,
        url(r"^path([1,2])$", handler(show_path))?,
        url(r"^visit$", handler(visit))?,
        url(r"^forget$", handler(forget))?,
        url(r"^notes$", handler(create_note))?,
        url(r"^root(?P<root>[1,2])/", registry.include("demo.sub")?)?,
    ]))
}
