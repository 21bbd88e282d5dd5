//! Resource client: typed HTTP calls for projects, anexos, AI assistance, and the knowledge base.

pub mod api;
mod config;
mod error;
pub mod http;

pub use api::{AnexoUpdate, ResourceApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use http::ApiClient;
