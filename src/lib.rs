// Budget Tracker client - library root

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod request;

pub use error::{ApiError, Result};
pub use http_client::{AuthGateway, GatewayOptions};
pub use request::ApiRequest;
