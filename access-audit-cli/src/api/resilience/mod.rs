//! Retry and timeout handling for directory requests

pub mod config;
pub mod retry;

pub use config::ResilienceConfig;
pub use retry::RetryPolicy;
