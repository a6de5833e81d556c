pub mod api;
pub mod client;
pub mod config;

pub use client::StoreClient;
pub use config::ClientConfig;
