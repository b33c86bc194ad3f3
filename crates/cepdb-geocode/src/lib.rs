//! Geocoding resolver: turns a CEP into coordinates and a canonical address.
//!
//! Wraps `reqwest` with provider-specific error handling and normalizes each
//! supported provider's response shape into one [`GeocodeResult`] so callers
//! never see raw provider JSON. One outbound call per invocation, no caching,
//! no automatic retry.

mod client;
mod error;
mod provider;

pub use client::GeocodeClient;
pub use error::GeocodeError;
pub use provider::{GeocodeResult, Provider};
