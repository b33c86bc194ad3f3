//! Proximity search over registered stores.
//!
//! Resolves the query CEP once, then evaluates every stored record
//! against the persisted coordinates — stored records are never
//! re-geocoded at query time. Per-record failures become explicit
//! [`DistanceOutcome::Skipped`] entries instead of aborting the search.

use cepdb_core::{distance_km, is_valid_cep, Coordinates, StoreRecord, StoreRepository};
use cepdb_geocode::GeocodeError;

use crate::error::StoreError;
use crate::registry::StoreRegistry;

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;

/// Which answer a locate request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// The single nearest in-range store (first-encountered wins ties).
    Nearest,
    /// All in-range stores, ascending by distance.
    AllWithinRadius,
}

/// A store together with its great-circle distance from the query point.
#[derive(Debug, Clone)]
pub struct NearbyStore {
    pub store: StoreRecord,
    pub distance_km: f64,
}

/// Outcome of evaluating one stored record against the query point.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceOutcome {
    Resolved(f64),
    /// The record could not be evaluated (e.g. malformed persisted
    /// coordinates); the search continues without it.
    Skipped { reason: &'static str },
}

/// Evaluate every record's distance from `origin`, one outcome per record
/// in input order.
#[must_use]
pub fn evaluate_distances(origin: Coordinates, stores: &[StoreRecord]) -> Vec<DistanceOutcome> {
    stores
        .iter()
        .map(|store| {
            if !store.coordinates.is_finite() {
                return DistanceOutcome::Skipped {
                    reason: "non-finite persisted coordinates",
                };
            }
            if store.coordinates.is_unresolved() {
                return DistanceOutcome::Skipped {
                    reason: "unresolved persisted coordinates",
                };
            }
            DistanceOutcome::Resolved(distance_km(origin, store.coordinates))
        })
        .collect()
}

impl<R: StoreRepository> StoreRegistry<R> {
    /// Find stores within `radius_km` of the query CEP.
    ///
    /// Returns the single nearest match in [`SearchMode::Nearest`], or
    /// all matches ascending by distance in [`SearchMode::AllWithinRadius`].
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidPostalCode`] for a malformed query,
    /// [`StoreError::AddressNotFound`] when the provider does not know
    /// the query CEP, [`StoreError::Geocode`] for other provider
    /// failures, [`StoreError::NoStores`] when nothing is registered,
    /// and [`StoreError::NoMatchInRadius`] when nothing is in range.
    pub async fn locate(
        &self,
        cep: &str,
        mode: SearchMode,
        radius_km: f64,
    ) -> Result<Vec<NearbyStore>, StoreError> {
        if !is_valid_cep(cep) {
            return Err(StoreError::InvalidPostalCode {
                cep: cep.to_owned(),
            });
        }

        let origin = match self.geocoder.resolve(cep).await {
            Ok(result) => result.coordinates,
            Err(GeocodeError::NotFound { .. } | GeocodeError::InvalidFormat { .. }) => {
                return Err(StoreError::AddressNotFound {
                    cep: cep.to_owned(),
                });
            }
            Err(e) => return Err(StoreError::Geocode(e)),
        };

        let stores = self.repo.list().await?;
        if stores.is_empty() {
            return Err(StoreError::NoStores);
        }

        let outcomes = evaluate_distances(origin, &stores);
        let mut matches: Vec<NearbyStore> = Vec::new();
        for (store, outcome) in stores.into_iter().zip(outcomes) {
            match outcome {
                DistanceOutcome::Resolved(distance) if distance <= radius_km => {
                    matches.push(NearbyStore {
                        store,
                        distance_km: distance,
                    });
                }
                DistanceOutcome::Resolved(_) => {}
                DistanceOutcome::Skipped { reason } => {
                    tracing::warn!(store_id = %store.id, reason, "skipped store during proximity search");
                }
            }
        }

        if matches.is_empty() {
            tracing::info!(cep, radius_km, "no stores within search radius");
            return Err(StoreError::NoMatchInRadius { radius_km });
        }

        match mode {
            SearchMode::Nearest => {
                // Strict less-than keeps the first-encountered record on ties.
                let mut nearest = 0;
                for (i, candidate) in matches.iter().enumerate().skip(1) {
                    if candidate.distance_km < matches[nearest].distance_km {
                        nearest = i;
                    }
                }
                let winner = matches.swap_remove(nearest);
                Ok(vec![winner])
            }
            SearchMode::AllWithinRadius => {
                matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
                Ok(matches)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepdb_core::{Address, OperatingInfo};
    use chrono::Utc;
    use uuid::Uuid;

    fn store_at(latitude: f64, longitude: f64) -> StoreRecord {
        StoreRecord {
            id: Uuid::new_v4(),
            name: "Loja".to_owned(),
            address: Address {
                street: "Rua A".to_owned(),
                neighborhood: "Centro".to_owned(),
                city: "São Paulo".to_owned(),
                state: "SP".to_owned(),
                number: "1".to_owned(),
                postal_code: "01310100".to_owned(),
            },
            coordinates: Coordinates::new(latitude, longitude),
            operating_info: OperatingInfo {
                hours: "08:00-18:00".to_owned(),
                days: "seg-sab".to_owned(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn evaluates_distance_per_record_in_order() {
        let origin = Coordinates::new(0.0, 0.0);
        // ~111 km and ~222 km north of the origin.
        let stores = vec![store_at(1.0, 0.0), store_at(2.0, 0.0)];

        let outcomes = evaluate_distances(origin, &stores);
        assert_eq!(outcomes.len(), 2);
        let DistanceOutcome::Resolved(first) = outcomes[0] else {
            panic!("expected resolved outcome");
        };
        let DistanceOutcome::Resolved(second) = outcomes[1] else {
            panic!("expected resolved outcome");
        };
        assert!((first - 111.19).abs() < 1.0, "got {first}");
        assert!((second - 222.39).abs() < 1.0, "got {second}");
    }

    #[test]
    fn sentinel_coordinates_are_skipped_not_fatal() {
        let origin = Coordinates::new(-23.5, -46.6);
        let stores = vec![store_at(0.0, 0.0), store_at(-23.6, -46.7)];

        let outcomes = evaluate_distances(origin, &stores);
        assert!(matches!(
            outcomes[0],
            DistanceOutcome::Skipped {
                reason: "unresolved persisted coordinates"
            }
        ));
        assert!(matches!(outcomes[1], DistanceOutcome::Resolved(_)));
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let origin = Coordinates::new(-23.5, -46.6);
        let stores = vec![store_at(f64::NAN, -46.6)];

        let outcomes = evaluate_distances(origin, &stores);
        assert!(matches!(
            outcomes[0],
            DistanceOutcome::Skipped {
                reason: "non-finite persisted coordinates"
            }
        ));
    }
}
