//! Store record and patch types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;
use crate::geo::Coordinates;

/// Opening hours and days, both required on a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingInfo {
    pub hours: String,
    pub days: String,
}

/// A persisted store. `id` is assigned by the persistence layer at
/// creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: Uuid,
    pub name: String,
    pub address: Address,
    pub coordinates: Coordinates,
    pub operating_info: OperatingInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated store ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub address: Address,
    pub coordinates: Coordinates,
    pub operating_info: OperatingInfo,
}

/// Partial address update. Only the supplied sub-fields are overwritten.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub number: Option<String>,
    pub postal_code: Option<String>,
}

/// Partial operating-info update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatingInfoPatch {
    pub hours: Option<String>,
    pub days: Option<String>,
}

impl OperatingInfoPatch {
    /// A patch that supplies neither sub-field is an empty update.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.hours) && blank(&self.days)
    }
}

/// Update request for an existing store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorePatch {
    pub name: Option<String>,
    pub address: Option<AddressPatch>,
    /// Fallback coordinates, consulted only when a changed postal code
    /// geocodes to the unresolved sentinel.
    pub manual_coordinates: Option<Coordinates>,
    pub operating_info: Option<OperatingInfoPatch>,
}
