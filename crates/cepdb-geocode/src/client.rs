//! HTTP client for the configured geocoding provider.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use cepdb_core::is_valid_cep;

use crate::error::GeocodeError;
use crate::provider::{GeocodeResult, Provider};

/// Client for a single geocoding provider endpoint.
///
/// Holds the HTTP client, API key, and base URL. Use
/// [`GeocodeClient::new`] for production or point `base_url` at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    provider: Provider,
    base_url: Url,
    api_key: String,
    timeout_secs: u64,
}

impl GeocodeClient {
    /// Creates a client for `provider` at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Unavailable`] if the underlying
    /// `reqwest::Client` cannot be constructed or `base_url` is not a
    /// valid URL.
    pub fn new(
        provider: Provider,
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent("cepdb/0.1 (store-registry)")
            .build()
            .map_err(|e| GeocodeError::Unavailable {
                reason: e.to_string(),
            })?;

        let base_url = Url::parse(base_url).map_err(|e| GeocodeError::Unavailable {
            reason: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            provider,
            base_url,
            api_key: api_key.to_owned(),
            timeout_secs,
        })
    }

    /// Resolve a CEP to coordinates and a canonical address.
    ///
    /// Makes exactly one outbound call; repeated calls for the same code
    /// re-query the provider.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::InvalidFormat`] for a malformed CEP (no call made).
    /// - [`GeocodeError::NotFound`] when the provider has no candidate.
    /// - [`GeocodeError::Timeout`] past the configured bound.
    /// - [`GeocodeError::Auth`] / [`GeocodeError::BadRequest`] /
    ///   [`GeocodeError::Unavailable`] for provider-reported failures.
    /// - [`GeocodeError::Deserialize`] for unparseable bodies.
    pub async fn resolve(&self, cep: &str) -> Result<GeocodeResult, GeocodeError> {
        if !is_valid_cep(cep) {
            return Err(GeocodeError::InvalidFormat {
                cep: cep.to_owned(),
            });
        }

        let params = self.provider.query_params(cep, &self.api_key);
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await
            .map_err(|e| GeocodeError::from_transport(&e, self.timeout_secs))?;

        match response.status() {
            StatusCode::FORBIDDEN => return Err(GeocodeError::Auth),
            StatusCode::BAD_REQUEST => return Err(GeocodeError::BadRequest),
            status if !status.is_success() => {
                return Err(GeocodeError::Unavailable {
                    reason: format!("unexpected HTTP status {status}"),
                })
            }
            _ => {}
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GeocodeError::from_transport(&e, self.timeout_secs))?;

        let result = self.provider.normalize(cep, &body)?;
        tracing::debug!(
            cep,
            provider = ?self.provider,
            latitude = result.coordinates.latitude,
            longitude = result.coordinates.longitude,
            "geocoded postal code"
        );
        Ok(result)
    }
}
