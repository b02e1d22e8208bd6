//! Storage abstraction for pharmacy records.
//!
//! Handlers and services talk to the [`PharmacyStore`] trait rather than a
//! concrete database handle, so tests can substitute an in-memory fake.
//! Failures carry an explicit kind: duplicate-key conflicts name the
//! offending field instead of leaking driver error codes upward.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::pharmacies::models::{District, GeoPoint, OperatingHours, Pharmacy};

pub use postgres::PgPharmacyStore;

/// Earth's radius in meters (for Haversine formula)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated; `field` is the wire-level field name
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Equality filters applied to list queries
#[derive(Debug, Clone, Default)]
pub struct PharmacyFilter {
    pub district: Option<District>,
    pub is_active: Option<bool>,
    pub name: Option<String>,
    pub pharmacist_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    District,
    PharmacistName,
    CreatedAt,
    UpdatedAt,
}

/// Sort order parsed from a `sort` query value such as `name` or `-createdAt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl Sort {
    /// Parse a sort expression; unknown field names fall back to the default
    /// (`-createdAt`).
    pub fn parse(raw: &str) -> Self {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let field = match name {
            "name" => Some(SortField::Name),
            "district" => Some(SortField::District),
            "pharmacistName" => Some(SortField::PharmacistName),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        };

        match field {
            Some(field) => Self { field, descending },
            None => Self::default(),
        }
    }
}

/// Limit/offset window for list queries
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

/// Field values for inserting a new pharmacy record
#[derive(Debug, Clone)]
pub struct NewPharmacy {
    pub name: String,
    pub district: District,
    pub location: GeoPoint,
    pub contact_number: String,
    pub email: String,
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub pharmacist_name: String,
}

/// Partial set of field changes; only present fields are applied
#[derive(Debug, Clone, Default)]
pub struct PharmacyUpdate {
    pub name: Option<String>,
    pub district: Option<District>,
    pub location: Option<GeoPoint>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub operating_hours: Option<OperatingHours>,
    pub pharmacist_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Storage operations over the pharmacy record shape
#[async_trait]
pub trait PharmacyStore: Send + Sync {
    async fn find(
        &self,
        filter: &PharmacyFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Pharmacy>, StoreError>;

    async fn count(&self, filter: &PharmacyFilter) -> Result<i64, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>, StoreError>;

    /// Find any record (active or inactive) within `radius_meters` of `point`,
    /// excluding `exclude` when given. Returns the first conflicting record.
    async fn find_within_radius(
        &self,
        point: GeoPoint,
        radius_meters: f64,
        exclude: Option<Uuid>,
    ) -> Result<Option<Pharmacy>, StoreError>;

    /// Case-insensitive substring match over name OR pharmacist name,
    /// optionally restricted to a district, newest first, capped at `limit`.
    async fn search(
        &self,
        term: &str,
        district: Option<District>,
        limit: i64,
    ) -> Result<Vec<Pharmacy>, StoreError>;

    async fn insert(&self, data: NewPharmacy) -> Result<Pharmacy, StoreError>;

    /// Apply `changes` and return the updated record, or `None` when no
    /// record has the given id.
    async fn update(
        &self,
        id: Uuid,
        changes: PharmacyUpdate,
    ) -> Result<Option<Pharmacy>, StoreError>;

    /// Returns true when a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Returns the number of records removed
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError>;
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}
