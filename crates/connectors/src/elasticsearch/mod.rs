pub mod client;
pub mod config;
pub mod dsl;
pub mod response;

pub use client::ElasticsearchClient;
pub use config::{Auth, ElasticsearchConfig};
