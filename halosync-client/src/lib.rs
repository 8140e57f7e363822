//! # halosync-client
//!
//! Blocking REST client for a Halo 2.x site.
//!
//! [`HaloClient`] implements [`halosync_core::RemotePostApi`] and
//! [`halosync_core::ReferenceApi`] for one configured site. All I/O goes
//! through the [`HttpTransport`] trait; [`UreqTransport`] is the production
//! implementation.

pub mod client;
mod error;
pub mod transport;

pub use client::HaloClient;
pub use error::HttpError;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
