//! HTTP marshalling helpers for CC services
//!
//! Extension traits over [`reqwest`] that fill in request headers and
//! bodies, and read JSON responses into a target type with a default-value
//! fallback that still reports why the fallback happened.
//!
//! # Example
//!
//! ```no_run
//! use cc_http_client::{HttpClient, JsonOutcome, RequestExt, ResponseExt};
//! use reqwest::Method;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewOrder {
//!     sku: String,
//!     quantity: u32,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct OrderCreated {
//!     id: u64,
//! }
//!
//! async fn example() -> cc_http_client::Response<u64> {
//!     let client = HttpClient::new();
//!     let mut request = client.request(Method::POST, "https://api.example.com/orders")?;
//!     request
//!         .add_header("X-Tenant", "inventory")
//!         .set_json_body(
//!             Some(&NewOrder {
//!                 sku: "A-1".to_string(),
//!                 quantity: 2,
//!             }),
//!             None,
//!             None,
//!         )?;
//!
//!     let response = client.execute(request).await?;
//!     let outcome: JsonOutcome<OrderCreated> = response.deserialize_response(None).await;
//!     Ok(outcome.into_value().id)
//! }
//! ```

mod client;
mod config;
mod error;
mod headers;
mod request_ext;
mod response;

pub use cc_json::{ContractResolver, InterfaceContractResolver, JsonSettings};
pub use client::{HttpClient, HttpClientBuilder};
pub use config::HttpClientSettings;
pub use error::HttpError;
pub use request_ext::{RequestExt, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
pub use response::{accepts_body, parse_body, JsonOutcome, Response, ResponseExt};
