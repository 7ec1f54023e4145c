use thiserror::Error;

/// The url configuration is unusable: empty pattern source, empty include,
/// invalid regular expression or an include reference nobody registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ImproperlyConfigured(pub String);

impl ImproperlyConfigured {
    pub fn new(msg: impl Into<String>) -> Self {
        ImproperlyConfigured(msg.into())
    }
}

/// What a handler (or the resolver on its behalf) can fail with.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Improperly(#[from] ImproperlyConfigured),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ConfigResult<T> = Result<T, ImproperlyConfigured>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn improperly_configured_displays_message() {
        let err = ImproperlyConfigured::new("'' is empty or invalid");
        assert_eq!(err.to_string(), "'' is empty or invalid");
    }

    #[test]
    fn view_error_wraps_anyhow() {
        fn failing() -> Result<(), ViewError> {
            Err(anyhow!("disk on fire"))?;
            Ok(())
        }

        let err = failing().unwrap_err();
        assert!(matches!(err, ViewError::Other(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn view_error_wraps_configuration_error() {
        let err: ViewError = ImproperlyConfigured::new("bad").into();
        assert!(matches!(err, ViewError::Improperly(_)));
        assert_eq!(err.to_string(), "bad");
    }
}
