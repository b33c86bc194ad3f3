mod stores;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use cepdb_db::PgStoreRepository;
use cepdb_geocode::GeocodeError;
use cepdb_stores::{StoreError, StoreRegistry};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: StoreRegistry<PgStoreRepository>,
    pub default_radius_km: f64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                fields: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "provider_error" => StatusCode::BAD_GATEWAY,
            "provider_timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translate a service-layer failure into the wire error envelope.
///
/// Validation and resource errors surface their message verbatim;
/// repository failures keep their detail in the logs and return a
/// generic body.
pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::MissingField { .. }
        | StoreError::InvalidPostalCode { .. }
        | StoreError::EmptyUpdate
        | StoreError::MissingOperatingInfo => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        StoreError::PendingFields { fields } => {
            let mut api_error = ApiError::new(request_id, "validation_error", error.to_string());
            api_error.error.fields = Some(fields.clone());
            api_error
        }
        StoreError::AddressNotFound { .. } | StoreError::MissingCoordinates => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
        StoreError::NotFound | StoreError::NoStores | StoreError::NoMatchInRadius { .. } => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        StoreError::DuplicateStore { .. } => {
            ApiError::new(request_id, "conflict", error.to_string())
        }
        StoreError::Geocode(geocode) => {
            tracing::error!(error = %geocode, "geocoding provider failure");
            match geocode {
                GeocodeError::Timeout { .. } => {
                    ApiError::new(request_id, "provider_timeout", geocode.to_string())
                }
                _ => ApiError::new(request_id, "provider_error", "geocoding provider failed"),
            }
        }
        StoreError::Repository(repo) => {
            tracing::error!(error = %repo, "repository failure");
            ApiError::new(request_id, "internal_error", "storage operation failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/stores",
            get(stores::list_stores).post(stores::create_store),
        )
        .route(
            "/api/v1/stores/{id}",
            get(stores::get_store)
                .patch(stores::update_store)
                .delete(stores::delete_store),
        )
        .route("/api/v1/stores/nearby/{cep}", get(stores::locate_stores))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match cepdb_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
