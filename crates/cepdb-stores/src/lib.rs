//! Store registry and proximity search.
//!
//! Orchestrates the create/update/delete/list lifecycle of store records
//! (validation, address reconciliation, coordinate resolution, duplicate
//! detection) and answers "which stores are within range of a CEP".
//! Persistence is reached through [`cepdb_core::StoreRepository`] and
//! geocoding through [`cepdb_geocode::GeocodeClient`].

mod error;
mod registry;
mod search;

pub use error::StoreError;
pub use registry::{CreateAddressInput, CreateStoreInput, OperatingInfoInput, StoreRegistry};
pub use search::{
    evaluate_distances, DistanceOutcome, NearbyStore, SearchMode, DEFAULT_RADIUS_KM,
};
