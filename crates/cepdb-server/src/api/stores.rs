//! Store CRUD and proximity-search handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cepdb_core::{StorePatch, StoreRecord};
use cepdb_stores::{CreateStoreInput, NearbyStore, SearchMode};

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// One proximity-search hit on the wire.
#[derive(Debug, Serialize)]
pub struct NearbyStoreItem {
    pub store: StoreRecord,
    pub distance_km: f64,
}

impl From<NearbyStore> for NearbyStoreItem {
    fn from(nearby: NearbyStore) -> Self {
        Self {
            store: nearby.store,
            distance_km: nearby.distance_km,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocateQuery {
    pub mode: Option<String>,
    pub radius_km: Option<f64>,
}

pub async fn create_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(input): Json<CreateStoreInput>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .registry
        .create(input)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: record,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<StoreRecord>>>, ApiError> {
    let stores = state
        .registry
        .list()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: stores,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StoreRecord>>, ApiError> {
    let record = state
        .registry
        .get(id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub async fn update_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StorePatch>,
) -> Result<Json<ApiResponse<StoreRecord>>, ApiError> {
    let record = state
        .registry
        .update(id, patch)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub async fn delete_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .delete(id)
        .await
        .map_err(|e| map_store_error(req_id.0, &e))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn locate_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cep): Path<String>,
    Query(query): Query<LocateQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyStoreItem>>>, ApiError> {
    let mode = parse_mode(query.mode.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    let radius_km = normalize_radius(query.radius_km, state.default_radius_km)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let matches = state
        .registry
        .locate(&cep, mode, radius_km)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: matches.into_iter().map(NearbyStoreItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn parse_mode(mode: Option<&str>) -> Result<SearchMode, String> {
    match mode {
        None | Some("nearest") => Ok(SearchMode::Nearest),
        Some("all") => Ok(SearchMode::AllWithinRadius),
        Some(other) => Err(format!(
            "unknown mode '{other}': expected 'nearest' or 'all'"
        )),
    }
}

fn normalize_radius(radius_km: Option<f64>, default_radius_km: f64) -> Result<f64, String> {
    match radius_km {
        None => Ok(default_radius_km),
        Some(r) if r.is_finite() && r > 0.0 => Ok(r),
        Some(r) => Err(format!(
            "radius_km must be a positive number of kilometers, got {r}"
        )),
    }
}
