use crate::http::handler::HandlerFunc;
use regex::{Captures, Regex};
use std::fmt;

/// Named url captures. Keys are unique and keep the order they were first
/// seen in; inserting an existing key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kwargs {
    entries: Vec<(String, String)>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overlays `other` onto `self`; `other` wins on collisions.
    pub fn overlay(&mut self, other: Kwargs) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kwargs = Kwargs::new();
        for (k, v) in iter {
            kwargs.insert(k, v);
        }
        kwargs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Kwargs {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A successful resolution: the handler to call and what the url captured
/// on the way down to it.
pub struct ResolverMatch<'a> {
    pub func: &'a HandlerFunc,
    pub args: Vec<String>,
    pub kwargs: Kwargs,
}

impl fmt::Debug for ResolverMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverMatch")
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .finish_non_exhaustive()
    }
}

/// Captures of a single pattern. An expression with any named group reports
/// only its named groups; otherwise every group is reported positionally.
/// Groups that took no part in the match come back as empty strings.
pub(crate) fn split_captures(regex: &Regex, caps: &Captures) -> (Vec<String>, Kwargs) {
    let mut names = regex.capture_names().flatten().peekable();

    if names.peek().is_some() {
        let kwargs: Kwargs = names
            .map(|name| (name, caps.name(name).map_or("", |m| m.as_str())))
            .collect();
        (Vec::new(), kwargs)
    } else {
        let args = caps
            .iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();
        (args, Kwargs::new())
    }
}

/// Combines what an include prefix captured with its child's match.
///
/// Named captures are merged, the child overriding the prefix. Positional
/// captures of the prefix survive only while no named capture exists at all;
/// as soon as one does, only the child's positional captures are kept.
pub(crate) fn merge_captures<'a>(
    mut args: Vec<String>,
    mut kwargs: Kwargs,
    child: ResolverMatch<'a>,
) -> ResolverMatch<'a> {
    kwargs.overlay(child.kwargs);

    let args = if kwargs.is_empty() {
        args.extend(child.args);
        args
    } else {
        child.args
    };

    ResolverMatch {
        func: child.func,
        args,
        kwargs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler;
    use crate::http::ok;

    fn captures_of(source: &str, path: &str) -> (Vec<String>, Kwargs) {
        let regex = Regex::new(source).unwrap();
        let caps = regex.captures(path).unwrap();
        split_captures(&regex, &caps)
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn kwargs_keep_first_seen_order() {
        let mut kwargs = Kwargs::new();
        kwargs.insert("b", "1");
        kwargs.insert("a", "2");
        kwargs.insert("b", "3");

        let all: Vec<_> = kwargs.iter().collect();
        assert_eq!(all, vec![("b", "3"), ("a", "2")]);
    }

    #[test]
    fn kwargs_overlay_prefers_other() {
        let mut own = Kwargs::from([("root", "1"), ("dpath", "1")]);
        own.overlay(Kwargs::from([("dpath", "2"), ("leaf", "x")]));

        assert_eq!(own, Kwargs::from([("root", "1"), ("dpath", "2"), ("leaf", "x")]));
        assert!(own.contains_key("leaf"));
        assert_eq!(own.keys().collect::<Vec<_>>(), vec!["root", "dpath", "leaf"]);
    }

    #[test]
    fn positional_only_expression() {
        let (args, kwargs) = captures_of(r"^(\d+)/(\w+)$", "12/ab");
        assert_eq!(args, strings(&["12", "ab"]));
        assert!(kwargs.is_empty());
    }

    #[test]
    fn named_groups_discard_positional() {
        let (args, kwargs) = captures_of(r"^(?P<year>\d{4})/(\d{2})$", "2026/10");
        assert!(args.is_empty());
        assert_eq!(kwargs, Kwargs::from([("year", "2026")]));
    }

    #[test]
    fn unmatched_groups_are_empty() {
        let (args, _) = captures_of(r"^a(b)?(c)$", "ac");
        assert_eq!(args, strings(&["", "c"]));

        let (_, kwargs) = captures_of(r"^a(?P<opt>b)?$", "a");
        assert_eq!(kwargs.get("opt"), Some(""));
    }

    #[test]
    fn no_groups_no_captures() {
        let (args, kwargs) = captures_of(r"^$", "");
        assert!(args.is_empty());
        assert!(kwargs.is_empty());
    }

    #[test]
    fn merge_concatenates_positional_without_names() {
        let func = handler(|_| Ok(ok()));
        let child = ResolverMatch {
            func: &func,
            args: strings(&["2"]),
            kwargs: Kwargs::new(),
        };

        let merged = merge_captures(strings(&["1"]), Kwargs::new(), child);
        assert_eq!(merged.args, strings(&["1", "2"]));
        assert!(merged.kwargs.is_empty());
    }

    #[test]
    fn merge_drops_own_positional_once_named_exist() {
        let func = handler(|_| Ok(ok()));
        let child = ResolverMatch {
            func: &func,
            args: strings(&["2"]),
            kwargs: Kwargs::from([("leaf", "x")]),
        };

        let merged = merge_captures(strings(&["1"]), Kwargs::new(), child);
        assert_eq!(merged.args, strings(&["2"]));
        assert_eq!(merged.kwargs, Kwargs::from([("leaf", "x")]));
    }

    #[test]
    fn merge_child_names_override() {
        let func = handler(|_| Ok(ok()));
        let child = ResolverMatch {
            func: &func,
            args: Vec::new(),
            kwargs: Kwargs::from([("id", "child")]),
        };

        let merged = merge_captures(Vec::new(), Kwargs::from([("id", "own"), ("x", "1")]), child);
        assert_eq!(merged.kwargs, Kwargs::from([("id", "child"), ("x", "1")]));
    }
}
