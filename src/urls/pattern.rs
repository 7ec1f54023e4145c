use crate::error::{ConfigResult, ImproperlyConfigured};
use crate::http::handler::HandlerFunc;
use crate::urls::resolver::{ResolverMatch, merge_captures, split_captures};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use tracing::trace;

/// A regular expression compiled the first time it is needed.
///
/// A failed compilation is not cached: every attempt reports the error again.
pub struct LazyRegex {
    source: String,
    compiled: OnceCell<Regex>,
}

impl LazyRegex {
    pub fn new(source: impl Into<String>) -> LazyRegex {
        LazyRegex {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn get(&self) -> ConfigResult<&Regex> {
        self.compiled.get_or_try_init(|| {
            Regex::new(&self.source).map_err(|e| {
                ImproperlyConfigured(format!(
                    "{:?} is not a valid regular expression: {}",
                    self.source, e
                ))
            })
        })
    }
}

impl fmt::Debug for LazyRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.source)
    }
}

pub enum Target {
    /// Leaf: the handler serving paths this pattern matches.
    View(HandlerFunc),
    /// Composite: patterns tried against what is left after the prefix.
    Include(Vec<UrlPattern>),
}

impl From<HandlerFunc> for Target {
    fn from(f: HandlerFunc) -> Self {
        Target::View(f)
    }
}

impl From<Vec<UrlPattern>> for Target {
    fn from(patterns: Vec<UrlPattern>) -> Self {
        Target::Include(patterns)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::View(_) => write!(f, "View"),
            Target::Include(patterns) => f.debug_tuple("Include").field(patterns).finish(),
        }
    }
}

#[derive(Debug)]
pub struct UrlPattern {
    regex: LazyRegex,
    target: Target,
}

impl UrlPattern {
    pub fn new(regex: &str, target: impl Into<Target>) -> ConfigResult<UrlPattern> {
        if regex.is_empty() {
            return Err(ImproperlyConfigured(format!(
                "{:?} is empty or invalid",
                regex
            )));
        }

        let target = target.into();
        if let Target::Include(patterns) = &target {
            if patterns.is_empty() {
                return Err(ImproperlyConfigured(format!(
                    "url pattern {:?} includes no patterns",
                    regex
                )));
            }
        }

        Ok(UrlPattern {
            regex: LazyRegex::new(regex),
            target,
        })
    }

    pub fn source(&self) -> &str {
        self.regex.source()
    }

    pub fn regex(&self) -> ConfigResult<&Regex> {
        self.regex.get()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Matches `path` against this pattern and, for an include, against its
    /// children with the matched prefix cut off. `Ok(None)` means no match.
    pub fn resolve(&self, path: &str) -> ConfigResult<Option<ResolverMatch<'_>>> {
        let regex = self.regex()?;
        let Some(caps) = regex.captures(path) else {
            return Ok(None);
        };
        let (args, kwargs) = split_captures(regex, &caps);

        match &self.target {
            Target::View(func) => {
                trace!(pattern = %self.source(), path, "matched view");
                Ok(Some(ResolverMatch { func, args, kwargs }))
            }
            Target::Include(patterns) => {
                let end = caps.get(0).map_or(0, |m| m.end());
                let rest = &path[end..];
                trace!(pattern = %self.source(), path, rest, "matched include prefix");

                for pattern in patterns {
                    if let Some(sub) = pattern.resolve(rest)? {
                        return Ok(Some(merge_captures(args, kwargs, sub)));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Compiles this pattern's expression and those of everything it includes.
    pub fn check(&self) -> ConfigResult<()> {
        self.regex()?;
        if let Target::Include(patterns) = &self.target {
            for pattern in patterns {
                pattern.check()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::View(_) => write!(f, "<UrlPattern {:?}>", self.source()),
            Target::Include(patterns) => write!(
                f,
                "<UrlPattern {:?} including {} patterns>",
                self.source(),
                patterns.len()
            ),
        }
    }
}
