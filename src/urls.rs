//! Url configuration: regex patterns mapped to handlers, nested through
//! includes, resolved first match wins.

use crate::error::ConfigResult;

pub mod pattern;
pub mod registry;
pub mod resolver;

pub use pattern::{LazyRegex, Target, UrlPattern};
pub use registry::{PatternsFactory, UrlRegistry};
pub use resolver::{Kwargs, ResolverMatch};

/// Builds a pattern routing `regex` to a handler, or to a list of patterns
/// when given one (usually from [`UrlRegistry::include`]).
pub fn url(regex: &str, target: impl Into<Target>) -> ConfigResult<UrlPattern> {
    UrlPattern::new(regex, target)
}

/// The top level pattern list.
#[derive(Debug, Default)]
pub struct UrlConf {
    patterns: Vec<UrlPattern>,
}

impl UrlConf {
    pub fn new(patterns: Vec<UrlPattern>) -> UrlConf {
        UrlConf { patterns }
    }

    pub fn patterns(&self) -> &[UrlPattern] {
        &self.patterns
    }

    /// The first pattern matching `path`, in registration order.
    pub fn resolve(&self, path: &str) -> ConfigResult<Option<ResolverMatch<'_>>> {
        for pattern in &self.patterns {
            if let Some(m) = pattern.resolve(path)? {
                return Ok(Some(m));
            }
        }
        Ok(None)
    }

    /// Compiles every expression up front so a broken configuration shows up
    /// before the first request does.
    pub fn check(&self) -> ConfigResult<()> {
        self.patterns.iter().try_for_each(UrlPattern::check)
    }
}

impl From<Vec<UrlPattern>> for UrlConf {
    fn from(patterns: Vec<UrlPattern>) -> Self {
        UrlConf::new(patterns)
    }
}
