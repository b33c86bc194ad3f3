//! Address types and provider/user field reconciliation.

use serde::{Deserialize, Serialize};

/// A complete store address. Every field is required on a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub number: String,
    /// Exactly 8 ASCII digits — see [`crate::cep::is_valid_cep`].
    pub postal_code: String,
}

/// The descriptive address fields, each possibly absent.
///
/// Used both for user-supplied overrides on create and for the fields a
/// geocoding provider returns alongside coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAddress {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Merge provider-fetched and user-provided address fields.
///
/// For each of street/neighborhood/city/state the fetched value wins when
/// present and non-empty, otherwise the provided value is used. A field
/// with neither source is "pending": `Err` lists the pending field names
/// and no address is produced.
///
/// `postal_code` and `number` always come from user input — the provider
/// supplies canonical addressing text but cannot know the unit number,
/// and its echoed postal code is not authoritative.
///
/// # Errors
///
/// Returns the names of fields left empty by both sources.
pub fn reconcile_address(
    provided: &PartialAddress,
    fetched: &PartialAddress,
    postal_code: &str,
    number: &str,
) -> Result<Address, Vec<&'static str>> {
    let mut pending = Vec::new();

    let street = take(
        "street",
        fetched.street.as_deref(),
        provided.street.as_deref(),
        &mut pending,
    );
    let neighborhood = take(
        "neighborhood",
        fetched.neighborhood.as_deref(),
        provided.neighborhood.as_deref(),
        &mut pending,
    );
    let city = take(
        "city",
        fetched.city.as_deref(),
        provided.city.as_deref(),
        &mut pending,
    );
    let state = take(
        "state",
        fetched.state.as_deref(),
        provided.state.as_deref(),
        &mut pending,
    );

    if !pending.is_empty() {
        return Err(pending);
    }

    Ok(Address {
        street,
        neighborhood,
        city,
        state,
        number: number.to_owned(),
        postal_code: postal_code.to_owned(),
    })
}

/// Provider value wins when non-empty; user value is the fallback.
/// Records the field name as pending when both sources are empty.
fn take(
    name: &'static str,
    fetched: Option<&str>,
    provided: Option<&str>,
    pending: &mut Vec<&'static str>,
) -> String {
    match non_empty(fetched).or_else(|| non_empty(provided)) {
        Some(value) => value,
        None => {
            pending.push(name);
            String::new()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}
