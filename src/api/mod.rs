//! Backend API client.
//!
//! - [`transport`]: the [`Transport`] seam and the `ureq` implementation
//! - [`types`]: request and response bodies
//! - [`client`]: [`ApiClient`], one typed method per endpoint
//! - [`error`]: [`ApiError`], the failure taxonomy coordinators react to
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{Body, FilePart, HttpTransport, Method, Reply, Transport};
