use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header name {0:?} is not ASCII")]
    NonAsciiName(String),
    #[error("header values can't contain newlines (got {0:?})")]
    Newline(String),
    #[error("header value {0:?} is not representable in latin-1")]
    NonLatin1Value(String),
    #[error("cookie attribute {0:?} can't contain control characters or ';'")]
    CookieAttribute(String),
}

/// Response headers. Lookups ignore case, output keeps the case the header
/// was first set with and the order headers were first set in.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers built from names and values already known to be valid.
    pub(crate) fn from_trusted(entries: Vec<(&str, String)>) -> Self {
        Headers {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        check_name(name)?;
        check_value(value)?;

        match self.position(name) {
            Some(i) => self.entries[i] = (name.to_string(), value.to_string()),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Sets a header unless it has already been set.
    pub fn set_default(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        if self.contains(name) {
            return Ok(());
        }
        self.set(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

fn check_name(name: &str) -> Result<(), HeaderError> {
    if !name.is_ascii() {
        return Err(HeaderError::NonAsciiName(name.to_string()));
    }
    if name.contains(['\r', '\n']) {
        return Err(HeaderError::Newline(name.to_string()));
    }
    Ok(())
}

pub(crate) fn check_value(value: &str) -> Result<(), HeaderError> {
    if value.contains(['\r', '\n']) {
        return Err(HeaderError::Newline(value.to_string()));
    }
    if value.chars().any(|c| c as u32 > 0xFF) {
        return Err(HeaderError::NonLatin1Value(value.to_string()));
    }
    Ok(())
}
