pub mod config;
pub mod framing;
pub mod metrics;
pub mod protocol;
pub mod render;
pub mod server;

pub use config::{ConfigError, ServiceConfig, Transport};
pub use server::ScoringServer;
