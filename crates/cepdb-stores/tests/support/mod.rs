//! Shared test doubles: an in-memory repository and geocoding mocks.
#![allow(dead_code)] // each integration binary uses a different subset

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cepdb_core::{NewStore, RepositoryError, StoreRecord, StoreRepository};
use cepdb_geocode::{GeocodeClient, Provider};
use cepdb_stores::StoreRegistry;

/// In-memory stand-in for the Postgres repository, including the
/// postal-code uniqueness backstop.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    stores: Mutex<Vec<StoreRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(stores: Vec<StoreRecord>) -> Self {
        Self {
            stores: Mutex::new(stores),
        }
    }
}

fn lock_poisoned() -> RepositoryError {
    RepositoryError::Backend("test repository lock poisoned".into())
}

impl StoreRepository for InMemoryRepository {
    async fn find_by_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<StoreRecord>, RepositoryError> {
        let stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        Ok(stores
            .iter()
            .find(|s| s.address.postal_code == postal_code)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreRecord>, RepositoryError> {
        let stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        Ok(stores.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<StoreRecord>, RepositoryError> {
        let stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        Ok(stores.clone())
    }

    async fn create(&self, store: NewStore) -> Result<StoreRecord, RepositoryError> {
        let mut stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        if stores
            .iter()
            .any(|s| s.address.postal_code == store.address.postal_code)
        {
            return Err(RepositoryError::DuplicatePostalCode);
        }
        let now = Utc::now();
        let record = StoreRecord {
            id: Uuid::new_v4(),
            name: store.name,
            address: store.address,
            coordinates: store.coordinates,
            operating_info: store.operating_info,
            created_at: now,
            updated_at: now,
        };
        stores.push(record.clone());
        Ok(record)
    }

    async fn save(&self, store: StoreRecord) -> Result<StoreRecord, RepositoryError> {
        let mut stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        let Some(slot) = stores.iter_mut().find(|s| s.id == store.id) else {
            return Err(RepositoryError::NotFound);
        };
        let mut updated = store;
        updated.updated_at = Utc::now();
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<StoreRecord>, RepositoryError> {
        let mut stores = self.stores.lock().map_err(|_| lock_poisoned())?;
        let index = stores.iter().position(|s| s.id == id);
        Ok(index.map(|i| stores.remove(i)))
    }
}

pub fn registry(server: &MockServer, repo: InMemoryRepository) -> StoreRegistry<InMemoryRepository> {
    let geocoder = GeocodeClient::new(Provider::OpenCage, &server.uri(), "test-key", 5)
        .expect("client construction should not fail");
    StoreRegistry::new(repo, geocoder)
}

/// Mount an OpenCage-shaped candidate for `cep` with full components.
pub async fn mock_geocode(server: &MockServer, cep: &str, lat: f64, lng: f64) {
    mock_geocode_with_components(
        server,
        cep,
        lat,
        lng,
        serde_json::json!({
            "road": "Avenida Paulista",
            "suburb": "Bela Vista",
            "city": "São Paulo",
            "state_code": "SP"
        }),
    )
    .await;
}

pub async fn mock_geocode_with_components(
    server: &MockServer,
    cep: &str,
    lat: f64,
    lng: f64,
    components: serde_json::Value,
) {
    let body = serde_json::json!({
        "results": [{
            "formatted": format!("CEP {cep}, Brazil"),
            "geometry": { "lat": lat, "lng": lng },
            "components": components
        }],
        "status": { "code": 200, "message": "OK" }
    });

    Mock::given(method("GET"))
        .and(query_param("q", cep))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

/// Mount a candidate whose geometry is absent, which normalizes to the
/// unresolved sentinel.
pub async fn mock_geocode_unresolved(server: &MockServer, cep: &str) {
    let body = serde_json::json!({
        "results": [{
            "formatted": format!("CEP {cep}, Brazil"),
            "components": {
                "road": "Avenida Paulista",
                "suburb": "Bela Vista",
                "city": "São Paulo",
                "state_code": "SP"
            }
        }],
        "status": { "code": 200, "message": "OK" }
    });

    Mock::given(method("GET"))
        .and(query_param("q", cep))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

/// Mount an empty candidate list for `cep`.
pub async fn mock_geocode_not_found(server: &MockServer, cep: &str) {
    let body = serde_json::json!({
        "results": [],
        "status": { "code": 200, "message": "OK" }
    });

    Mock::given(method("GET"))
        .and(query_param("q", cep))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}
