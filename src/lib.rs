pub mod concurrency;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod logging;
pub mod urls;
pub mod views;

pub use dispatch::{application, path_to_response};
pub use error::{ImproperlyConfigured, ViewError};
pub use urls::{UrlConf, UrlPattern, UrlRegistry, url};
