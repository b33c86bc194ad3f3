//! Postgres-backed implementation of the store repository port.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cepdb_core::{
    Address, Coordinates, NewStore, OperatingInfo, RepositoryError, StoreRecord, StoreRepository,
};

const STORE_COLUMNS: &str = "id, name, street, neighborhood, city, state, number, postal_code, \
     latitude, longitude, hours, days, created_at, updated_at";

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    name: String,
    street: String,
    neighborhood: String,
    city: String,
    state: String,
    number: String,
    postal_code: String,
    latitude: f64,
    longitude: f64,
    hours: String,
    days: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for StoreRecord {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: Address {
                street: row.street,
                neighborhood: row.neighborhood,
                city: row.city,
                state: row.state,
                number: row.number,
                postal_code: row.postal_code,
            },
            coordinates: Coordinates::new(row.latitude, row.longitude),
            operating_info: OperatingInfo {
                hours: row.hours,
                days: row.days,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Store repository backed by the `stores` table.
#[derive(Debug, Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE for unique-constraint violations; raised by the
/// `stores_postal_code_key` index when a concurrent create slips past the
/// service layer's duplicate check.
const UNIQUE_VIOLATION: &str = "23505";

fn map_sqlx(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &error {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepositoryError::DuplicatePostalCode;
        }
    }
    RepositoryError::Backend(Box::new(error))
}

impl StoreRepository for PgStoreRepository {
    async fn find_by_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<StoreRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE postal_code = $1"
        ))
        .bind(postal_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(StoreRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(StoreRecord::from))
    }

    async fn list(&self) -> Result<Vec<StoreRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(StoreRecord::from).collect())
    }

    async fn create(&self, store: NewStore) -> Result<StoreRecord, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "INSERT INTO stores \
                 (name, street, neighborhood, city, state, number, postal_code, \
                  latitude, longitude, hours, days) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(&store.name)
        .bind(&store.address.street)
        .bind(&store.address.neighborhood)
        .bind(&store.address.city)
        .bind(&store.address.state)
        .bind(&store.address.number)
        .bind(&store.address.postal_code)
        .bind(store.coordinates.latitude)
        .bind(store.coordinates.longitude)
        .bind(&store.operating_info.hours)
        .bind(&store.operating_info.days)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.into())
    }

    async fn save(&self, store: StoreRecord) -> Result<StoreRecord, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE stores SET \
                 name = $2, street = $3, neighborhood = $4, city = $5, state = $6, \
                 number = $7, postal_code = $8, latitude = $9, longitude = $10, \
                 hours = $11, days = $12, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.address.street)
        .bind(&store.address.neighborhood)
        .bind(&store.address.city)
        .bind(&store.address.state)
        .bind(&store.address.number)
        .bind(&store.address.postal_code)
        .bind(store.coordinates.latitude)
        .bind(store.coordinates.longitude)
        .bind(&store.operating_info.hours)
        .bind(&store.operating_info.days)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(StoreRecord::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<StoreRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "DELETE FROM stores WHERE id = $1 RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(StoreRecord::from))
    }
}
