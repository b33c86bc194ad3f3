//! Per-provider response normalization.
//!
//! Each supported provider returns candidates in its own shape (OpenCage
//! puts coordinates in a flat `geometry {lat, lng}` object, Google Maps
//! nests them under `geometry.location` and spreads address fields over a
//! typed `address_components` array). One [`Provider`] variant per shape,
//! each mapping raw JSON to the uniform [`GeocodeResult`].

use cepdb_core::{Coordinates, GeocodeProviderKind, PartialAddress};
use serde_json::Value;

use crate::error::GeocodeError;

/// Normalized geocoding output. Transient — produced per request, never
/// persisted as-is.
#[derive(Debug, Clone)]
pub struct GeocodeResult {
    pub formatted_address: String,
    /// [`Coordinates::UNRESOLVED`] when the candidate carried no usable
    /// geometry; callers must fall back to manual coordinates.
    pub coordinates: Coordinates,
    /// Descriptive address fields extracted from the candidate, feeding
    /// reconciliation against user-supplied overrides.
    pub components: PartialAddress,
}

/// A supported geocoding provider response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenCage,
    GoogleMaps,
}

impl From<GeocodeProviderKind> for Provider {
    fn from(kind: GeocodeProviderKind) -> Self {
        match kind {
            GeocodeProviderKind::OpenCage => Self::OpenCage,
            GeocodeProviderKind::GoogleMaps => Self::GoogleMaps,
        }
    }
}

impl Provider {
    /// Query parameters for a forward-geocode of `cep`, in this
    /// provider's dialect. Both are constrained to Brazil and a single
    /// candidate.
    pub(crate) fn query_params(self, cep: &str, api_key: &str) -> Vec<(&'static str, String)> {
        match self {
            Self::OpenCage => vec![
                ("q", cep.to_owned()),
                ("key", api_key.to_owned()),
                ("countrycode", "br".to_owned()),
                ("limit", "1".to_owned()),
                ("no_annotations", "1".to_owned()),
            ],
            Self::GoogleMaps => vec![
                ("address", cep.to_owned()),
                ("key", api_key.to_owned()),
                ("region", "br".to_owned()),
            ],
        }
    }

    /// Map a raw provider body to [`GeocodeResult`].
    ///
    /// # Errors
    ///
    /// [`GeocodeError::NotFound`] when the provider returned zero
    /// candidates, [`GeocodeError::Deserialize`] when the body does not
    /// have the provider's documented shape.
    pub fn normalize(self, cep: &str, body: &Value) -> Result<GeocodeResult, GeocodeError> {
        match self {
            Self::OpenCage => normalize_opencage(cep, body),
            Self::GoogleMaps => normalize_google(cep, body),
        }
    }
}

fn first_result<'a>(cep: &str, body: &'a Value) -> Result<&'a Value, GeocodeError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| GeocodeError::Deserialize {
            reason: "missing 'results' array".to_owned(),
        })?;

    results.first().ok_or_else(|| GeocodeError::NotFound {
        cep: cep.to_owned(),
    })
}

fn normalize_opencage(cep: &str, body: &Value) -> Result<GeocodeResult, GeocodeError> {
    let candidate = first_result(cep, body)?;

    let formatted_address = candidate
        .get("formatted")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let coordinates = match (
        candidate.pointer("/geometry/lat").and_then(Value::as_f64),
        candidate.pointer("/geometry/lng").and_then(Value::as_f64),
    ) {
        (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
        _ => Coordinates::UNRESOLVED,
    };

    let components = candidate.get("components");
    let field = |keys: &[&str]| -> Option<String> {
        let obj = components?;
        keys.iter()
            .find_map(|k| obj.get(k).and_then(Value::as_str))
            .map(ToOwned::to_owned)
    };

    Ok(GeocodeResult {
        formatted_address,
        coordinates,
        components: PartialAddress {
            street: field(&["road", "street"]),
            neighborhood: field(&["suburb", "neighbourhood", "city_district"]),
            city: field(&["city", "town", "village", "municipality"]),
            state: field(&["state_code", "state"]),
        },
    })
}

fn normalize_google(cep: &str, body: &Value) -> Result<GeocodeResult, GeocodeError> {
    // Google signals "no candidates" through the status field as well as
    // an empty results array; treat both as not found.
    if body.get("status").and_then(Value::as_str) == Some("ZERO_RESULTS") {
        return Err(GeocodeError::NotFound {
            cep: cep.to_owned(),
        });
    }

    let candidate = first_result(cep, body)?;

    let formatted_address = candidate
        .get("formatted_address")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let coordinates = match (
        candidate
            .pointer("/geometry/location/lat")
            .and_then(Value::as_f64),
        candidate
            .pointer("/geometry/location/lng")
            .and_then(Value::as_f64),
    ) {
        (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
        _ => Coordinates::UNRESOLVED,
    };

    let components = candidate
        .get("address_components")
        .and_then(Value::as_array);
    let field = |wanted: &str, short: bool| -> Option<String> {
        let name_key = if short { "short_name" } else { "long_name" };
        components?.iter().find_map(|c| {
            let types = c.get("types")?.as_array()?;
            if types.iter().any(|t| t.as_str() == Some(wanted)) {
                c.get(name_key)?.as_str().map(ToOwned::to_owned)
            } else {
                None
            }
        })
    };

    Ok(GeocodeResult {
        formatted_address,
        coordinates,
        components: PartialAddress {
            street: field("route", false),
            neighborhood: field("sublocality", false).or_else(|| field("neighborhood", false)),
            city: field("locality", false)
                .or_else(|| field("administrative_area_level_2", false)),
            state: field("administrative_area_level_1", true),
        },
    })
}
