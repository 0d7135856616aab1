//! Origin status service library.

pub mod checks;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
