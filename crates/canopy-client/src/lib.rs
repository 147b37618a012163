//! HTTP client SDK for the Canopy monitoring platform.
//!
//! The heart of the crate is its error layer: every failure a request can
//! produce (transport errors, gateway error pages, content-type mismatches,
//! structured validation errors, undecodable bodies) is normalized into the
//! single [`Error`] type, which callers match on by status code with
//! [`has_status`] and [`is_not_found`].
//!
//! # Example
//!
//! ```no_run
//! use canopy_client::{is_not_found, CanopyClient, MonitorTokenCreateOptions};
//!
//! # async fn example() -> canopy_client::Result<()> {
//! let client = CanopyClient::builder()
//!     .base_url("https://api.canopy.example")
//!     .auth_token("secret")
//!     .build()?;
//!
//! let opts = MonitorTokenCreateOptions {
//!     entity_ids: vec![187468, 188020],
//! };
//! match client.monitor().create_service_token("dbaas", opts).await {
//!     Ok(token) => println!("token: {}", token.token),
//!     Err(err) if is_not_found(&err) => println!("no such service type"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error normalization
//!
//! Failure values of any origin can be fed through [`normalize`]; each
//! origin is identified by its [`ErrorCode`]:
//!
//! - HTTP responses carry their real status code and the API's reported
//!   reasons, joined into one message
//! - transport and other error values normalize to [`ErrorCode::FromError`]
//! - plain strings normalize to [`ErrorCode::FromString`]
//! - display-only values normalize to [`ErrorCode::FromDisplay`]

pub mod api;
pub mod client;
pub mod error;
pub mod response;
pub mod types;

pub use api::MonitorApi;
pub use client::{CanopyClient, ClientBuilder};
pub use error::{
    has_status, is_not_found, normalize, Error, ErrorCode, ErrorEnvelope, ErrorReason, Failure,
    Result,
};
pub use response::{classify, classify_response, RawResponse};
pub use types::*;
