//! Persistence port for store records.
//!
//! The service layer is written against this trait so it can run on the
//! Postgres implementation in `cepdb-db` or an in-memory double in tests.
//! Single-record operations are assumed atomic by the implementation;
//! postal-code uniqueness must be backstopped by a storage-level
//! constraint because the service's duplicate check is read-then-create.

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::store::{NewStore, StoreRecord};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store not found")]
    NotFound,
    #[error("a store with this postal code already exists")]
    DuplicatePostalCode,
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub trait StoreRepository: Send + Sync {
    /// Look up a store by its exact postal code.
    fn find_by_postal_code(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = Result<Option<StoreRecord>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<StoreRecord>, RepositoryError>> + Send;

    /// All stores, in stable creation order.
    fn list(&self) -> impl Future<Output = Result<Vec<StoreRecord>, RepositoryError>> + Send;

    /// Persist a new store, assigning its id and timestamps.
    ///
    /// Fails with [`RepositoryError::DuplicatePostalCode`] when the
    /// uniqueness backstop rejects the insert.
    fn create(
        &self,
        store: NewStore,
    ) -> impl Future<Output = Result<StoreRecord, RepositoryError>> + Send;

    /// Write back a modified record, bumping `updated_at`.
    fn save(
        &self,
        store: StoreRecord,
    ) -> impl Future<Output = Result<StoreRecord, RepositoryError>> + Send;

    /// Delete by id, returning the removed record if one existed.
    fn delete_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<StoreRecord>, RepositoryError>> + Send;
}
