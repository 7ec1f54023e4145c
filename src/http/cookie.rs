use crate::http::headers::HeaderError;
use chrono::{DateTime, Utc};
use std::fmt;

pub const EPOCH_EXPIRES: &str = "Thu, 01-Jan-1970 00:00:00 GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expires {
    /// Already formatted cookie date, sent as is.
    Raw(String),
    /// Converted to a `Max-Age` relative to the moment the cookie is set.
    At(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age: Option<i64>,
    pub expires: Option<Expires>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        CookieOptions {
            max_age: None,
            expires: None,
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            http_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub max_age: Option<i64>,
    pub expires: Option<String>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    /// Fails when the name or an attribute would break the `Set-Cookie` line.
    /// The value itself is quoted and escaped on output.
    pub fn new(name: &str, value: &str, opts: CookieOptions) -> Result<Self, HeaderError> {
        Self::new_at(name, value, opts, Utc::now())
    }

    pub(crate) fn new_at(
        name: &str,
        value: &str,
        opts: CookieOptions,
        now: DateTime<Utc>,
    ) -> Result<Self, HeaderError> {
        if name.is_empty() || name.contains([' ', ',', '=', '"']) {
            return Err(HeaderError::CookieAttribute(name.to_string()));
        }
        check_attribute(name)?;
        for attr in [&opts.path, &opts.domain].into_iter().flatten() {
            check_attribute(attr)?;
        }
        if let Some(Expires::Raw(raw)) = &opts.expires {
            check_attribute(raw)?;
        }

        let mut max_age = opts.max_age;
        let expires = match opts.expires {
            Some(Expires::Raw(raw)) => Some(raw),
            Some(Expires::At(at)) => {
                // the extra second makes up for what is lost between `now` and sending
                let delta = at.signed_duration_since(now).num_seconds() + 1;
                max_age = Some(delta.max(0));
                None
            }
            None => None,
        };

        Ok(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            max_age,
            expires,
            path: opts.path,
            domain: opts.domain,
            secure: opts.secure,
            http_only: opts.http_only,
        })
    }
}

fn check_attribute(attr: &str) -> Result<(), HeaderError> {
    if attr.chars().any(|c| c == ';' || c.is_control()) {
        return Err(HeaderError::CookieAttribute(attr.to_string()));
    }
    Ok(())
}

/// Renders the `Set-Cookie` header value.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, quote_value(&self.value))?;
        if let Some(expires) = &self.expires {
            write!(f, "; expires={}", expires)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        Ok(())
    }
}

fn quote_value(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| matches!(c, ' ' | ',' | ';' | '"' | '\\') || c.is_control());
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            // control characters go out as three digit octal escapes
            c if c.is_control() => quoted.push_str(&format!("\\{:03o}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn renders_defaults() {
        let cookie = Cookie::new("session", "abc", CookieOptions::default()).unwrap();
        assert_eq!(cookie.to_string(), "session=abc; Path=/");
    }

    #[test]
    fn renders_all_attributes() {
        let opts = CookieOptions {
            max_age: Some(3600),
            expires: Some(Expires::Raw("Wed, 21-Oct-2026 07:28:00 GMT".to_string())),
            path: Some("/app".to_string()),
            domain: Some("example.com".to_string()),
            secure: true,
            http_only: true,
        };
        let cookie = Cookie::new("id", "42", opts).unwrap();
        assert_eq!(
            cookie.to_string(),
            "id=42; expires=Wed, 21-Oct-2026 07:28:00 GMT; Domain=example.com; \
             Max-Age=3600; Path=/app; Secure; HttpOnly"
        );
    }

    #[test]
    fn datetime_expiry_becomes_max_age() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let opts = CookieOptions {
            expires: Some(Expires::At(now + Duration::seconds(60))),
            ..CookieOptions::default()
        };
        let cookie = Cookie::new_at("a", "b", opts, now).unwrap();

        assert_eq!(cookie.max_age, Some(61));
        assert_eq!(cookie.expires, None);
    }

    #[test]
    fn past_expiry_clamps_to_zero() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let opts = CookieOptions {
            expires: Some(Expires::At(now - Duration::days(2))),
            ..CookieOptions::default()
        };
        assert_eq!(Cookie::new_at("a", "b", opts, now).unwrap().max_age, Some(0));
    }

    #[test]
    fn quotes_values_with_separators() {
        let cookie = Cookie::new("msg", "a b;\"c\"", CookieOptions::default()).unwrap();
        assert_eq!(cookie.to_string(), "msg=\"a b;\\\"c\\\"\"; Path=/");
    }

    #[test]
    fn escapes_control_characters_in_values() {
        let cookie = Cookie::new("sid", "a\r\nX-Injected: yes", CookieOptions::default()).unwrap();
        let rendered = cookie.to_string();

        assert_eq!(rendered, "sid=\"a\\015\\012X-Injected: yes\"; Path=/");
        assert!(!rendered.contains(['\r', '\n']));
    }

    #[test]
    fn rejects_attributes_that_split_the_header() {
        assert!(matches!(
            Cookie::new("a\r\nb", "1", CookieOptions::default()),
            Err(HeaderError::CookieAttribute(_))
        ));
        assert!(Cookie::new("a;b", "1", CookieOptions::default()).is_err());
        assert!(Cookie::new("a=b", "1", CookieOptions::default()).is_err());
        assert!(Cookie::new("", "1", CookieOptions::default()).is_err());

        let with = |opts: CookieOptions| Cookie::new("a", "1", opts);
        assert!(with(CookieOptions {
            path: Some("/x\nSet-Cookie: y=2".to_string()),
            ..CookieOptions::default()
        })
        .is_err());
        assert!(with(CookieOptions {
            domain: Some("example.com; Secure".to_string()),
            ..CookieOptions::default()
        })
        .is_err());
        assert!(with(CookieOptions {
            expires: Some(Expires::Raw("never\r\n".to_string())),
            ..CookieOptions::default()
        })
        .is_err());
    }
}
