use crate::http::cookie::{Cookie, CookieOptions, EPOCH_EXPIRES, Expires};
use crate::http::headers::{HeaderError, Headers, check_value};
use crate::http::status::Status;
use bytes::BytesMut;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod cookie;
pub mod handler;
pub mod headers;
pub mod method;
pub mod request;
pub mod server;
pub mod status;

pub const BUFFER_SIZE: usize = 1024;

pub const DEFAULT_CHARSET: &str = "utf-8";

static CHARSET_FROM_CONTENT_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i);\s*charset=(?P<charset>[^\s;]+)").expect("constant regex compiles")
});

#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    reason: Option<String>,
    charset: Option<String>,
    pub headers: Headers,
    cookies: Vec<Cookie>,
    content: BytesMut,
}

impl Response {
    pub fn new(content: impl AsRef<[u8]>) -> Response {
        Self::with_status(Status::OK, content)
    }

    pub fn with_status(status: Status, content: impl AsRef<[u8]>) -> Response {
        let content_type = format!("text/html; charset={}", DEFAULT_CHARSET);
        let headers = Headers::from_trusted(vec![("Content-Type", content_type)]);

        Response {
            status,
            reason: None,
            charset: None,
            headers,
            cookies: Vec::new(),
            content: BytesMut::from(content.as_ref()),
        }
    }

    /// A response with exactly the given headers (no default content type).
    pub fn from_parts(
        status: Status,
        headers: Vec<(&str, &str)>,
        content: Option<Vec<u8>>,
    ) -> Result<Response, HeaderError> {
        let mut resp = Self::with_status(status, content.unwrap_or_default());
        resp.headers = Headers::new();
        for (k, v) in headers {
            resp.headers.set(k, v)?;
        }
        Ok(resp)
    }

    pub fn reason_phrase(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => self.status.message,
        }
    }

    /// Goes out on the status line, so it is held to the header value rules.
    pub fn set_reason_phrase(&mut self, reason: impl Into<String>) -> Result<(), HeaderError> {
        let reason = reason.into();
        check_value(&reason)?;
        self.reason = Some(reason);
        Ok(())
    }

    /// The explicit charset, else the one named in `Content-Type`, else utf-8.
    pub fn charset(&self) -> String {
        if let Some(charset) = &self.charset {
            return charset.clone();
        }

        self.headers
            .get("Content-Type")
            .and_then(|ct| CHARSET_FROM_CONTENT_TYPE_RE.captures(ct))
            .and_then(|c| c.name("charset"))
            .map(|m| m.as_str().replace('"', ""))
            .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = Some(charset.into());
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.headers.set(name, value)
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn set_content(&mut self, content: impl AsRef<[u8]>) {
        self.content.clear();
        self.content.extend_from_slice(content.as_ref());
    }

    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        self.content.extend_from_slice(chunk.as_ref());
    }

    pub fn tell(&self) -> usize {
        self.content.len()
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Sets a cookie, replacing an earlier one with the same name in place.
    pub fn set_cookie(
        &mut self,
        name: &str,
        value: &str,
        opts: CookieOptions,
    ) -> Result<(), HeaderError> {
        let cookie = Cookie::new(name, value, opts)?;
        match self.cookies.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
        Ok(())
    }

    pub fn delete_cookie(
        &mut self,
        name: &str,
        path: Option<&str>,
        domain: Option<&str>,
    ) -> Result<(), HeaderError> {
        let opts = CookieOptions {
            max_age: Some(0),
            expires: Some(Expires::Raw(EPOCH_EXPIRES.to_string())),
            path: Some(path.unwrap_or("/").to_string()),
            domain: domain.map(String::from),
            ..CookieOptions::default()
        };
        self.set_cookie(name, "", opts)
    }
}

impl From<&str> for Response {
    fn from(body: &str) -> Self {
        Response::new(body)
    }
}

impl From<String> for Response {
    fn from(body: String) -> Self {
        Response::new(body)
    }
}

pub fn ok() -> Response {
    Response::with_status(Status::OK, "")
}

pub fn not_found() -> Response {
    Response::with_status(
        Status::NOT_FOUND,
        "<h1>Not Found</h1><p>The requested resource was not found on this server.</p>",
    )
}

pub fn server_error() -> Response {
    Response::with_status(
        Status::INTERNAL_SERVER_ERROR,
        "<h1>Server Error (500)</h1>",
    )
}

pub fn bad_request() -> Response {
    Response::with_status(Status::BAD_REQUEST, "<h1>Bad Request (400)</h1>")
}
