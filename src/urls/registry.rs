use crate::error::{ConfigResult, ImproperlyConfigured};
use crate::urls::pattern::UrlPattern;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds a fresh list of patterns. Gets the registry it was looked up in so
/// it can include further lists by name.
pub type PatternsFactory =
    Arc<dyn Fn(&UrlRegistry) -> ConfigResult<Vec<UrlPattern>> + Send + Sync>;

/// Pattern lists that can be included by name.
#[derive(Default, Clone)]
pub struct UrlRegistry {
    factories: Arc<HashMap<String, PatternsFactory>>,
    /// Names whose factories are running, outermost first.
    including: Vec<String>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(&UrlRegistry) -> ConfigResult<Vec<UrlPattern>> + Send + Sync + 'static,
    {
        if Arc::make_mut(&mut self.factories)
            .insert(name.to_string(), Arc::new(factory))
            .is_some()
        {
            warn!(name, "url patterns registered twice, keeping the latest");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The patterns registered under `name`, built now. A list that ends up
    /// including itself is an error.
    pub fn include(&self, name: &str) -> ConfigResult<Vec<UrlPattern>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            ImproperlyConfigured(format!("url patterns {:?} are not registered", name))
        })?;

        if self.including.iter().any(|n| n == name) {
            let mut chain = self.including.clone();
            chain.push(name.to_string());
            return Err(ImproperlyConfigured(format!(
                "circular include: {}",
                chain.join(" -> ")
            )));
        }

        debug!(name, "including url patterns");
        let mut nested = UrlRegistry {
            factories: Arc::clone(&self.factories),
            including: self.including.clone(),
        };
        nested.including.push(name.to_string());
        factory(&nested)
    }
}
