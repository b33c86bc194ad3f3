use thiserror::Error;

/// Failures of a single geocoding resolution.
///
/// Transport and provider-status failures are collapsed into the variants
/// the service layer can act on; raw `reqwest` errors never escape.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid postal code format '{cep}': expected exactly 8 digits")]
    InvalidFormat { cep: String },

    #[error("postal code {cep} not found by the geocoding provider")]
    NotFound { cep: String },

    #[error("geocoding provider did not respond within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("geocoding provider rejected the API key (HTTP 403)")]
    Auth,

    #[error("geocoding provider rejected the request as malformed (HTTP 400)")]
    BadRequest,

    #[error("geocoding provider unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("unexpected geocoding response shape: {reason}")]
    Deserialize { reason: String },
}

impl GeocodeError {
    /// Map a transport-level failure, distinguishing the timeout bound
    /// from everything else.
    pub(crate) fn from_transport(error: &reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Unavailable {
                reason: error.to_string(),
            }
        }
    }
}
