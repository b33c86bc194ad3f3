//! Integration tests for `GeocodeClient` using wiremock HTTP mocks.

use std::time::Duration;

use cepdb_geocode::{GeocodeClient, GeocodeError, Provider};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn opencage_client(base_url: &str, timeout_secs: u64) -> GeocodeClient {
    GeocodeClient::new(Provider::OpenCage, base_url, "test-key", timeout_secs)
        .expect("client construction should not fail")
}

fn opencage_body(lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "formatted": "Avenida Paulista, Bela Vista, São Paulo - SP, Brazil",
            "geometry": { "lat": lat, "lng": lng },
            "components": {
                "road": "Avenida Paulista",
                "suburb": "Bela Vista",
                "city": "São Paulo",
                "state_code": "SP"
            }
        }],
        "status": { "code": 200, "message": "OK" }
    })
}

#[tokio::test]
async fn resolves_opencage_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "01310100"))
        .and(query_param("key", "test-key"))
        .and(query_param("countrycode", "br"))
        .respond_with(ResponseTemplate::new(200).set_body_json(opencage_body(-23.5614, -46.6559)))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let result = client.resolve("01310100").await.expect("should resolve");

    assert!((result.coordinates.latitude - (-23.5614)).abs() < 1e-9);
    assert!((result.coordinates.longitude - (-46.6559)).abs() < 1e-9);
    assert_eq!(result.components.street.as_deref(), Some("Avenida Paulista"));
    assert_eq!(result.components.state.as_deref(), Some("SP"));
}

#[tokio::test]
async fn resolves_google_nested_geometry() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [{
            "formatted_address": "Av. Paulista - Bela Vista, São Paulo - SP, Brazil",
            "geometry": { "location": { "lat": -23.5614, "lng": -46.6559 } },
            "address_components": [
                { "long_name": "Avenida Paulista", "short_name": "Av. Paulista", "types": ["route"] },
                { "long_name": "São Paulo", "short_name": "SP", "types": ["administrative_area_level_1"] }
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(query_param("address", "01310100"))
        .and(query_param("region", "br"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = GeocodeClient::new(Provider::GoogleMaps, &server.uri(), "test-key", 5)
        .expect("client construction should not fail");
    let result = client.resolve("01310100").await.expect("should resolve");

    assert!((result.coordinates.longitude - (-46.6559)).abs() < 1e-9);
    assert_eq!(result.components.street.as_deref(), Some("Avenida Paulista"));
}

#[tokio::test]
async fn malformed_cep_fails_without_calling_provider() {
    // No mock mounted: a request would 404 and surface as Unavailable,
    // so an InvalidFormat error proves the provider was never called.
    let server = MockServer::start().await;
    let client = opencage_client(&server.uri(), 5);

    let err = client.resolve("01310-100").await.expect_err("should fail");
    assert!(matches!(err, GeocodeError::InvalidFormat { ref cep } if cep == "01310-100"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn zero_candidates_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [],
            "status": { "code": 200, "message": "OK" }
        })))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let err = client.resolve("99999999").await.expect_err("should fail");
    assert!(matches!(err, GeocodeError::NotFound { ref cep } if cep == "99999999"));
}

#[tokio::test]
async fn http_403_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let err = client.resolve("01310100").await.expect_err("should fail");
    assert!(matches!(err, GeocodeError::Auth));
}

#[tokio::test]
async fn http_400_is_bad_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let err = client.resolve("01310100").await.expect_err("should fail");
    assert!(matches!(err, GeocodeError::BadRequest));
}

#[tokio::test]
async fn http_500_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let err = client.resolve("01310100").await.expect_err("should fail");
    assert!(matches!(err, GeocodeError::Unavailable { .. }));
}

#[tokio::test]
async fn slow_provider_surfaces_timeout_not_generic_error() {
    let server = MockServer::start().await;

    // 1-second client bound against a 3-second response delay keeps the
    // test fast while exercising the same timeout path as the 5s default.
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(opencage_body(-23.5, -46.6))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 1);
    let err = client.resolve("01310100").await.expect_err("should fail");
    assert!(
        matches!(err, GeocodeError::Timeout { timeout_secs: 1 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_deserialize_or_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = opencage_client(&server.uri(), 5);
    let err = client.resolve("01310100").await.expect_err("should fail");
    // reqwest surfaces body-decode failures as transport errors.
    assert!(matches!(err, GeocodeError::Unavailable { .. }), "got {err:?}");
}
