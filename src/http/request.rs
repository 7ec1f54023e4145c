use crate::http::method::Method;
use crate::urls::Kwargs;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug)]
pub struct RequestContext<'a> {
    request: &'a Request,
    args: Vec<String>,
    kwargs: Kwargs,
}

impl<'a> RequestContext<'a> {
    pub fn new(request: &'a Request, args: Vec<String>, kwargs: Kwargs) -> RequestContext<'a> {
        RequestContext {
            request,
            args,
            kwargs,
        }
    }

    /// Positional capture `i` of the resolved url.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(|v| v.as_str())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Named capture of the resolved url.
    pub fn kwarg(&self, k: &str) -> Option<&str> {
        self.kwargs.get(k)
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.request.get_header(k)
    }

    pub fn request(&self) -> &Request {
        self.request
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub content: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Request {
        Request {
            method,
            url: url.to_string(),
            headers: HashMap::new(),
            content: Vec::new(),
        }
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers.get(&k.to_lowercase()).map(|v| v.as_str())
    }

    /// The decoded path of the request target, without the query string.
    pub fn path(&self) -> Cow<'_, str> {
        let raw = match self.url.split_once('?') {
            Some((path, _)) => path,
            None => &self.url,
        };
        percent_decode_str(raw).decode_utf8_lossy()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }
}
