use cepdb_core::RepositoryError;
use cepdb_geocode::GeocodeError;
use thiserror::Error;

/// Every public operation of the service layer returns exactly one of
/// these — raw transport or database errors never escape.
///
/// Input-validation and resource variants carry the offending field or
/// key and are safe to show to callers verbatim; dependency and
/// repository variants keep their detail for logs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the '{field}' field is required")]
    MissingField { field: &'static str },

    #[error("invalid postal code '{cep}': expected exactly 8 digits")]
    InvalidPostalCode { cep: String },

    #[error("address fields pending and must be supplied: {}", fields.join(", "))]
    PendingFields { fields: Vec<String> },

    #[error("operating info update must supply hours or days")]
    EmptyUpdate,

    #[error("store not found")]
    NotFound,

    #[error("a store is already registered for postal code {cep}")]
    DuplicateStore { cep: String },

    #[error("no stores registered")]
    NoStores,

    #[error("no store found within {radius_km} km")]
    NoMatchInRadius { radius_km: f64 },

    #[error("no address found for postal code {cep}")]
    AddressNotFound { cep: String },

    #[error("coordinates could not be resolved for this postal code; supply manual coordinates")]
    MissingCoordinates,

    #[error("operating info with hours and days is required")]
    MissingOperatingInfo,

    #[error(transparent)]
    Geocode(GeocodeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
