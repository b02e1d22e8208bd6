use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::pharmacies::models::{
    validate_geo_point, District, GeoPoint, OperatingHours, Pharmacy,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::CONTACT_NUMBER_REGEX;

/// Request DTO for creating a pharmacy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePharmacyDto {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,

    pub district: District,

    #[validate(custom(function = validate_geo_point))]
    pub location: GeoPoint,

    #[validate(regex(
        path = *CONTACT_NUMBER_REGEX,
        message = "Please enter a valid Sri Lankan phone number (10 digits starting with 0)"
    ))]
    pub contact_number: String,

    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(nested)]
    pub operating_hours: OperatingHours,

    /// Defaults to true when omitted
    #[serde(default)]
    pub is_active: Option<bool>,

    #[validate(length(min = 1, message = "Pharmacist name is required"))]
    pub pharmacist_name: String,
}

/// Request DTO for full update (PUT). Carries exactly the updatable
/// allow-list; any other submitted field is dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePharmacyDto {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<District>,

    #[validate(custom(function = validate_geo_point))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    #[validate(regex(
        path = *CONTACT_NUMBER_REGEX,
        message = "Please enter a valid Sri Lankan phone number (10 digits starting with 0)"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,

    #[validate(email(message = "Please enter a valid email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,

    #[validate(length(min = 1, message = "Pharmacist name is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pharmacist_name: Option<String>,
}

/// Request DTO for partial update (PATCH). Unlike the PUT allow-list this
/// also accepts `isActive`, so callers can flip soft-delete state directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchPharmacyDto {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<District>,

    #[validate(custom(function = validate_geo_point))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    #[validate(regex(
        path = *CONTACT_NUMBER_REGEX,
        message = "Please enter a valid Sri Lankan phone number (10 digits starting with 0)"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,

    #[validate(email(message = "Please enter a valid email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pharmacist_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Query params for listing pharmacies
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPharmaciesQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,

    /// Sort field, prefix with `-` for descending (default: `-createdAt`)
    pub sort: Option<String>,

    pub district: Option<District>,

    /// Defaults to true, hiding soft-deleted pharmacies
    pub is_active: Option<bool>,

    pub name: Option<String>,

    pub pharmacist_name: Option<String>,

    pub email: Option<String>,

    pub contact_number: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListPharmaciesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort: None,
            district: None,
            is_active: None,
            name: None,
            pharmacist_name: None,
            email: None,
            contact_number: None,
        }
    }
}

impl ListPharmaciesQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Query params for the free-text search endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchPharmaciesQuery {
    /// Substring matched against name and pharmacist name (required)
    pub query: Option<String>,

    /// Optional exact district filter
    pub district: Option<District>,
}

/// Request DTO for bulk hard-delete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteDto {
    #[validate(length(min = 1, message = "Please provide an array of pharmacy IDs"))]
    pub ids: Vec<String>,
}

/// Response DTO for a deleted batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponseDto {
    pub deleted_count: i64,
}

/// Response DTO for pharmacy
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyResponseDto {
    pub id: Uuid,
    pub name: String,
    pub district: District,
    pub location: GeoPoint,
    pub contact_number: String,
    pub email: String,
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub pharmacist_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pharmacy> for PharmacyResponseDto {
    fn from(p: Pharmacy) -> Self {
        Self {
            id: p.id,
            name: p.name,
            district: p.district,
            location: p.location,
            contact_number: p.contact_number,
            email: p.email,
            operating_hours: p.operating_hours,
            is_active: p.is_active,
            pharmacist_name: p.pharmacist_name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
