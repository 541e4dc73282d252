mod client;
mod config;
mod error;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, ClientResult};
