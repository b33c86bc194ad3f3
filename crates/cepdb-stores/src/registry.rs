//! Store registry: validation, reconciliation, and lifecycle orchestration.

use serde::Deserialize;
use uuid::Uuid;

use cepdb_core::{
    is_valid_cep, reconcile_address, Coordinates, NewStore, OperatingInfo, PartialAddress,
    RepositoryError, StorePatch, StoreRecord, StoreRepository,
};
use cepdb_geocode::{GeocodeClient, GeocodeError};

use crate::error::StoreError;

/// Create-request payload, exactly as received from the routing layer.
/// All fields optional so the registry (not the deserializer) owns the
/// required-field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStoreInput {
    pub name: Option<String>,
    #[serde(default)]
    pub address: CreateAddressInput,
    /// Fallback used only when the provider resolves the CEP without
    /// usable coordinates.
    pub manual_coordinates: Option<Coordinates>,
    pub operating_info: Option<OperatingInfoInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAddressInput {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub number: Option<String>,
    pub postal_code: Option<String>,
}

impl CreateAddressInput {
    fn overrides(&self) -> PartialAddress {
        PartialAddress {
            street: self.street.clone(),
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatingInfoInput {
    pub hours: Option<String>,
    pub days: Option<String>,
}

/// Orchestrates store CRUD over a repository and the geocoding resolver.
///
/// Holds no cross-request state of its own; each call stands alone.
#[derive(Debug, Clone)]
pub struct StoreRegistry<R> {
    pub(crate) repo: R,
    pub(crate) geocoder: GeocodeClient,
}

impl<R: StoreRepository> StoreRegistry<R> {
    pub fn new(repo: R, geocoder: GeocodeClient) -> Self {
        Self { repo, geocoder }
    }

    /// Register a new store.
    ///
    /// Validates input, rejects duplicates by postal code, geocodes the
    /// CEP, reconciles provider and user address fields, resolves
    /// coordinates (manual fallback for unresolved geometry), and
    /// persists the assembled record.
    ///
    /// # Errors
    ///
    /// See [`StoreError`]; every step of the pipeline has a dedicated
    /// variant.
    pub async fn create(&self, input: CreateStoreInput) -> Result<StoreRecord, StoreError> {
        let name = required_text(input.name.as_deref(), "name")?;

        let cep = input.address.postal_code.clone().unwrap_or_default();
        if !is_valid_cep(&cep) {
            tracing::warn!(cep, "rejected store create with invalid postal code");
            return Err(StoreError::InvalidPostalCode { cep });
        }

        let number = required_text(input.address.number.as_deref(), "number")?;

        if self.repo.find_by_postal_code(&cep).await?.is_some() {
            tracing::warn!(cep, "rejected duplicate store registration");
            return Err(StoreError::DuplicateStore { cep });
        }

        let geocoded = match self.geocoder.resolve(&cep).await {
            Ok(result) => result,
            Err(GeocodeError::NotFound { .. } | GeocodeError::InvalidFormat { .. }) => {
                return Err(StoreError::AddressNotFound { cep });
            }
            Err(e) => return Err(StoreError::Geocode(e)),
        };

        let address = reconcile_address(&input.address.overrides(), &geocoded.components, &cep, &number)
            .map_err(|pending| {
                tracing::warn!(cep, ?pending, "address fields unresolved after reconciliation");
                StoreError::PendingFields {
                    fields: pending.iter().map(ToString::to_string).collect(),
                }
            })?;

        let coordinates = resolve_coordinates(geocoded.coordinates, input.manual_coordinates)?;
        let operating_info = required_operating_info(input.operating_info.as_ref())?;

        let record = self
            .repo
            .create(NewStore {
                name,
                address,
                coordinates,
                operating_info,
            })
            .await
            .map_err(|e| match e {
                // The unique-index backstop caught a concurrent create.
                RepositoryError::DuplicatePostalCode => StoreError::DuplicateStore {
                    cep: cep.clone(),
                },
                other => StoreError::Repository(other),
            })?;

        tracing::info!(store_id = %record.id, cep, "store registered");
        Ok(record)
    }

    /// Fetch one store by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no record matches.
    pub async fn get(&self, id: Uuid) -> Result<StoreRecord, StoreError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// All registered stores.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoStores`] when the collection is empty.
    pub async fn list(&self) -> Result<Vec<StoreRecord>, StoreError> {
        let stores = self.repo.list().await?;
        if stores.is_empty() {
            return Err(StoreError::NoStores);
        }
        Ok(stores)
    }

    /// Apply a partial update to an existing store.
    ///
    /// A supplied name overwrites directly; address and operating-info
    /// sub-fields patch individually. Supplied name and address values
    /// must be non-blank — persisted records never carry empty required
    /// fields. A changed postal code is re-validated and re-geocoded,
    /// and coordinates are only replaced once resolution succeeds.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown id, [`StoreError::EmptyUpdate`]
    /// for an operating-info patch with no sub-fields, plus the postal-code
    /// and coordinate errors of [`StoreRegistry::create`].
    pub async fn update(&self, id: Uuid, patch: StorePatch) -> Result<StoreRecord, StoreError> {
        let mut store = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = patch.name {
            store.name = required_text(Some(name.as_str()), "name")?;
        }

        if let Some(address_patch) = patch.address {
            if let Some(cep) = address_patch.postal_code {
                if !is_valid_cep(&cep) {
                    return Err(StoreError::InvalidPostalCode { cep });
                }
                if cep != store.address.postal_code {
                    let geocoded = match self.geocoder.resolve(&cep).await {
                        Ok(result) => result,
                        Err(GeocodeError::NotFound { .. } | GeocodeError::InvalidFormat { .. }) => {
                            return Err(StoreError::AddressNotFound { cep });
                        }
                        Err(e) => return Err(StoreError::Geocode(e)),
                    };
                    store.coordinates =
                        resolve_coordinates(geocoded.coordinates, patch.manual_coordinates)?;
                }
                store.address.postal_code = cep;
            }
            if let Some(street) = address_patch.street {
                store.address.street = required_text(Some(street.as_str()), "street")?;
            }
            if let Some(neighborhood) = address_patch.neighborhood {
                store.address.neighborhood = required_text(Some(neighborhood.as_str()), "neighborhood")?;
            }
            if let Some(city) = address_patch.city {
                store.address.city = required_text(Some(city.as_str()), "city")?;
            }
            if let Some(state) = address_patch.state {
                store.address.state = required_text(Some(state.as_str()), "state")?;
            }
            if let Some(number) = address_patch.number {
                store.address.number = required_text(Some(number.as_str()), "number")?;
            }
        }

        if let Some(info_patch) = patch.operating_info {
            if info_patch.is_empty() {
                return Err(StoreError::EmptyUpdate);
            }
            if let Some(hours) = info_patch.hours {
                store.operating_info.hours = hours;
            }
            if let Some(days) = info_patch.days {
                store.operating_info.days = days;
            }
        }

        let cep = store.address.postal_code.clone();
        let saved = self.repo.save(store).await.map_err(|e| match e {
            RepositoryError::NotFound => StoreError::NotFound,
            RepositoryError::DuplicatePostalCode => StoreError::DuplicateStore { cep },
            other => StoreError::Repository(other),
        })?;

        tracing::info!(store_id = %saved.id, "store updated");
        Ok(saved)
    }

    /// Delete a store by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no record matches.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        match self.repo.delete_by_id(id).await? {
            Some(removed) => {
                tracing::info!(store_id = %removed.id, "store deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, StoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(StoreError::MissingField { field }),
    }
}

/// Pick the store's coordinates. A supplied manual override wins; the
/// geocoded value is used otherwise; an unresolved geocode with no valid
/// override is an error the caller can fix by supplying coordinates.
fn resolve_coordinates(
    geocoded: Coordinates,
    manual: Option<Coordinates>,
) -> Result<Coordinates, StoreError> {
    if let Some(manual) = manual.filter(|c| c.is_finite() && !c.is_unresolved()) {
        return Ok(manual);
    }
    if geocoded.is_unresolved() || !geocoded.is_finite() {
        return Err(StoreError::MissingCoordinates);
    }
    Ok(geocoded)
}

fn required_operating_info(input: Option<&OperatingInfoInput>) -> Result<OperatingInfo, StoreError> {
    let Some(input) = input else {
        return Err(StoreError::MissingOperatingInfo);
    };
    let filled = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    };
    match (filled(&input.hours), filled(&input.days)) {
        (Some(hours), Some(days)) => Ok(OperatingInfo { hours, days }),
        _ => Err(StoreError::MissingOperatingInfo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_coordinates_win_when_supplied() {
        let geocoded = Coordinates::new(-23.5, -46.6);
        let manual = Coordinates::new(-22.9, -43.2);
        let chosen = resolve_coordinates(geocoded, Some(manual)).expect("should resolve");
        assert_eq!(chosen, manual);
    }

    #[test]
    fn geocoded_coordinates_used_without_override() {
        let geocoded = Coordinates::new(-23.5, -46.6);
        let chosen = resolve_coordinates(geocoded, None).expect("should resolve");
        assert_eq!(chosen, geocoded);
    }

    #[test]
    fn sentinel_geocode_without_manual_fails() {
        let err = resolve_coordinates(Coordinates::UNRESOLVED, None).expect_err("should fail");
        assert!(matches!(err, StoreError::MissingCoordinates));
    }

    #[test]
    fn sentinel_manual_override_does_not_count() {
        let err = resolve_coordinates(Coordinates::UNRESOLVED, Some(Coordinates::UNRESOLVED))
            .expect_err("should fail");
        assert!(matches!(err, StoreError::MissingCoordinates));
    }

    #[test]
    fn sentinel_geocode_with_valid_manual_succeeds() {
        let manual = Coordinates::new(-23.5, -46.6);
        let chosen =
            resolve_coordinates(Coordinates::UNRESOLVED, Some(manual)).expect("should resolve");
        assert_eq!(chosen, manual);
    }

    #[test]
    fn blank_name_is_missing() {
        assert!(matches!(
            required_text(Some("   "), "name"),
            Err(StoreError::MissingField { field: "name" })
        ));
        assert!(matches!(
            required_text(None, "number"),
            Err(StoreError::MissingField { field: "number" })
        ));
    }

    #[test]
    fn operating_info_requires_both_fields() {
        let only_hours = OperatingInfoInput {
            hours: Some("08:00-18:00".to_owned()),
            days: None,
        };
        assert!(matches!(
            required_operating_info(Some(&only_hours)),
            Err(StoreError::MissingOperatingInfo)
        ));
        assert!(matches!(
            required_operating_info(None),
            Err(StoreError::MissingOperatingInfo)
        ));

        let full = OperatingInfoInput {
            hours: Some("08:00-18:00".to_owned()),
            days: Some("seg-sab".to_owned()),
        };
        let info = required_operating_info(Some(&full)).expect("should build");
        assert_eq!(info.hours, "08:00-18:00");
        assert_eq!(info.days, "seg-sab");
    }
}
