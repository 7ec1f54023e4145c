use crate::concurrency::ThreadPool;
use crate::dispatch::application;
use crate::http::method::Method;
use crate::http::request::Request;
use crate::http::{BUFFER_SIZE, Response, bad_request};
use crate::urls::UrlConf;
use anyhow::{Context, anyhow, bail};
use bytes::{BufMut, BytesMut};
use std::cmp::min;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REQUEST_LINE: usize = 65536;
const MAX_HEADERS: usize = 100;

pub struct Server {
    listener: TcpListener,
    urlconf: Arc<UrlConf>,
    pool: ThreadPool,
}

impl Server {
    fn new(listener: TcpListener, num_workers: usize, urlconf: Arc<UrlConf>) -> anyhow::Result<Server> {
        Ok(Server {
            listener,
            urlconf,
            pool: ThreadPool::new(num_workers)?,
        })
    }

    pub fn from_tcp_addr(
        addr: &str,
        num_workers: usize,
        urlconf: Arc<UrlConf>,
    ) -> anyhow::Result<Server> {
        let listener =
            TcpListener::bind(addr).with_context(|| format!("Can't bind address {}", addr))?;
        Server::new(listener, num_workers, urlconf)
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr().context("Can't get local address")
    }

    pub fn run(self) -> anyhow::Result<()> {
        info!(
            addr = %self.local_addr()?,
            workers = self.pool.size(),
            "serving"
        );

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };
            let urlconf = Arc::clone(&self.urlconf);
            self.pool
                .execute(move || process_incoming(&urlconf, stream))?;
        }
        Ok(())
    }
}

fn process_incoming(urlconf: &UrlConf, mut stream: TcpStream) {
    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
        warn!(error = %e, "can't set read timeout");
        return;
    }

    debug!(peer = ?stream.peer_addr().ok(), "accepted new connection");

    let (response, method, url) = match read_request(&mut stream) {
        Ok(request) => {
            let response = application(urlconf, &request);
            (response, request.method.to_string(), request.url)
        }
        Err(e) => {
            debug!(error = %e, "malformed request");
            (bad_request(), "-".to_string(), "-".to_string())
        }
    };

    let bytes = serialize_response(&response, method != "HEAD");

    info!(
        target: "access",
        method = %method,
        url = %url,
        status = response.status.code_num,
        bytes = response.content().len(),
        "request"
    );

    if let Err(e) = stream.write_all(&bytes).and_then(|_| stream.flush()) {
        if e.kind() == ErrorKind::BrokenPipe || e.kind() == ErrorKind::ConnectionReset {
            debug!(error = %e, "client went away");
        } else {
            warn!(error = %e, "failed to write response");
        }
    }
}

pub(crate) fn read_request(readable: &mut impl Read) -> anyhow::Result<Request> {
    let mut rdr = BufReader::new(readable);

    let mut first_line = String::new();
    rdr.by_ref()
        .take(MAX_REQUEST_LINE as u64 + 1)
        .read_line(&mut first_line)
        .context("Error while reading line")?;
    if first_line.len() > MAX_REQUEST_LINE {
        bail!("Request line too long");
    }
    let first_line = first_line.trim_ascii();

    let first_line_parts: Vec<&str> = first_line.split(' ').collect();

    let (method, url) = match first_line_parts[..] {
        [method_raw, target, version] => {
            let method = Method::from_str(method_raw).context("Unknown HTTP method")?;

            if version != "HTTP/1.1" && version != "HTTP/1.0" {
                bail!("Unsupported HTTP version");
            }

            (method, String::from(target))
        }
        _ => {
            bail!("Bad start-line");
        }
    };

    let mut headers: HashMap<String, String> = HashMap::new();
    let mut line = String::new();

    for count in 0.. {
        line.clear();
        let n = rdr
            .by_ref()
            .take(MAX_REQUEST_LINE as u64 + 1)
            .read_line(&mut line)
            .context("Can't read line")?;
        if n > MAX_REQUEST_LINE {
            bail!("Header line too long");
        }

        if n == 0 || line.trim_ascii().is_empty() {
            break;
        }
        if count == MAX_HEADERS {
            bail!("Too many headers");
        }

        let (k, v) = line
            .trim_ascii()
            .split_once(':')
            .ok_or(anyhow!("Invalid header"))?;
        let k = k.trim_ascii();

        // "x_forwarded_for" and "x-forwarded-for" look the same to handlers
        if k.contains('_') {
            debug!(header = k, "dropping header with underscore");
            continue;
        }
        headers.insert(k.to_lowercase(), String::from(v.trim_ascii()));
    }

    let content = if let Some(content_length_raw) = headers.get("content-length") {
        let content_length: usize = content_length_raw
            .parse()
            .context("Invalid header value")?;
        read_content(&mut rdr, content_length)?
    } else {
        Vec::default()
    };

    Ok(Request {
        method,
        url,
        headers,
        content,
    })
}

fn read_content(
    rdr: &mut BufReader<&mut impl Read>,
    mut content_length: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(min(content_length, BUFFER_SIZE * 64));
    while content_length > 0 {
        let mut buf: [u8; BUFFER_SIZE] = [0u8; BUFFER_SIZE];
        let slice_to_read = &mut buf[..min(BUFFER_SIZE, content_length)];

        let bytes_read = rdr
            .read(slice_to_read)
            .context("Error while reading content")?;
        if bytes_read == 0 {
            break;
        }
        content.extend_from_slice(&slice_to_read[..bytes_read]);
        content_length -= bytes_read;
    }
    Ok(content)
}

/// Header values may hold latin-1 characters, sent as single bytes.
fn put_latin1(buf: &mut BytesMut, s: &str) {
    buf.extend(s.chars().map(|c| c as u32 as u8));
}

pub fn serialize_response(response: &Response, with_body: bool) -> BytesMut {
    let content = response.content();
    let mut buf = BytesMut::with_capacity(content.len() + (response.headers.len() + 2) * 32);

    buf.put(
        format!(
            "HTTP/1.1 {} {}\r\n",
            response.status.code_num,
            response.reason_phrase()
        )
        .as_bytes(),
    );

    for (key, value) in response.headers.iter() {
        if key.eq_ignore_ascii_case("content-length") {
            continue;
        }
        put_latin1(&mut buf, key);
        buf.put_slice(b": ");
        put_latin1(&mut buf, value);
        buf.put_slice(b"\r\n");
    }

    for cookie in response.cookies() {
        buf.put(format!("Set-Cookie: {}\r\n", cookie).as_bytes());
    }

    buf.put(format!("Content-Length: {}\r\n", content.len()).as_bytes());
    buf.put_slice(b"\r\n");
    if with_body {
        buf.put_slice(content);
    }

    buf
}
