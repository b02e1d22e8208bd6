use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::pharmacies::dtos::{
    BulkDeleteDto, BulkDeleteResponseDto, CreatePharmacyDto, ListPharmaciesQuery, PatchPharmacyDto,
    PharmacyResponseDto, SearchPharmaciesQuery, UpdatePharmacyDto,
};
use crate::features::pharmacies::models::District;
use crate::features::pharmacies::services::PharmacyService;
use crate::shared::types::{ApiResponse, PaginationQuery};
use crate::shared::validation::validation_messages;

/// List pharmacies
///
/// Equality filters, pagination and sorting via query params. Soft-deleted
/// pharmacies are hidden unless `isActive` is passed explicitly.
#[utoipa::path(
    get,
    path = "/api/pharmacies",
    params(ListPharmaciesQuery),
    responses(
        (status = 200, description = "Paginated list of pharmacies", body = ApiResponse<Vec<PharmacyResponseDto>>),
    ),
    tag = "pharmacies"
)]
pub async fn list_pharmacies(
    State(service): State<Arc<PharmacyService>>,
    Query(query): Query<ListPharmaciesQuery>,
) -> Result<Json<ApiResponse<Vec<PharmacyResponseDto>>>> {
    let (pharmacies, pagination) = service.list(&query).await?;
    let results = pharmacies.len() as i64;
    Ok(Json(ApiResponse::list(pharmacies, results, Some(pagination))))
}

/// Search pharmacies by name or pharmacist name
#[utoipa::path(
    get,
    path = "/api/pharmacies/search",
    params(SearchPharmaciesQuery),
    responses(
        (status = 200, description = "Matching pharmacies (max 20)", body = ApiResponse<Vec<PharmacyResponseDto>>),
        (status = 400, description = "Missing search query")
    ),
    tag = "pharmacies"
)]
pub async fn search_pharmacies(
    State(service): State<Arc<PharmacyService>>,
    Query(query): Query<SearchPharmaciesQuery>,
) -> Result<Json<ApiResponse<Vec<PharmacyResponseDto>>>> {
    let term = query.query.unwrap_or_default();
    let pharmacies = service.search(&term, query.district).await?;
    let results = pharmacies.len() as i64;
    Ok(Json(ApiResponse::list(pharmacies, results, None)))
}

/// List pharmacies in one district
#[utoipa::path(
    get,
    path = "/api/pharmacies/district/{district}",
    params(
        ("district" = String, Path, description = "District name"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Pharmacies in the district", body = ApiResponse<Vec<PharmacyResponseDto>>),
        (status = 400, description = "Unknown district")
    ),
    tag = "pharmacies"
)]
pub async fn list_pharmacies_by_district(
    State(service): State<Arc<PharmacyService>>,
    Path(district): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PharmacyResponseDto>>>> {
    let district = District::from_str(&district).map_err(AppError::Validation)?;
    let (pharmacies, pagination) = service.list_by_district(district, &pagination).await?;
    let results = pharmacies.len() as i64;
    Ok(Json(ApiResponse::list(pharmacies, results, Some(pagination))))
}

/// Get pharmacy by id
#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}",
    params(("id" = String, Path, description = "Pharmacy id")),
    responses(
        (status = 200, description = "Pharmacy found", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn get_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(pharmacy), None)))
}

/// Create a pharmacy
///
/// Rejected with 409 when another pharmacy sits within 1km of the new
/// location, or when name/contactNumber/email is already taken.
#[utoipa::path(
    post,
    path = "/api/pharmacies",
    request_body = CreatePharmacyDto,
    responses(
        (status = 201, description = "Pharmacy created", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Uniqueness or proximity conflict")
    ),
    tag = "pharmacies"
)]
pub async fn create_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    AppJson(dto): AppJson<CreatePharmacyDto>,
) -> Result<(StatusCode, Json<ApiResponse<PharmacyResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let pharmacy = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(pharmacy), None)),
    ))
}

/// Full update of a pharmacy
///
/// Only `name`, `district`, `location`, `contactNumber`, `email`,
/// `operatingHours` and `pharmacistName` are applied; anything else in the
/// body is dropped. A new location re-runs the proximity guard.
#[utoipa::path(
    put,
    path = "/api/pharmacies/{id}",
    params(("id" = String, Path, description = "Pharmacy id")),
    request_body = UpdatePharmacyDto,
    responses(
        (status = 200, description = "Pharmacy updated", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Validation error or malformed id"),
        (status = 404, description = "Pharmacy not found"),
        (status = 409, description = "Uniqueness or proximity conflict")
    ),
    tag = "pharmacies"
)]
pub async fn update_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdatePharmacyDto>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let pharmacy = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some("Pharmacy updated successfully".to_string()),
    )))
}

/// Partial update of a pharmacy
#[utoipa::path(
    patch,
    path = "/api/pharmacies/{id}",
    params(("id" = String, Path, description = "Pharmacy id")),
    request_body = PatchPharmacyDto,
    responses(
        (status = 200, description = "Pharmacy updated", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Validation error or malformed id"),
        (status = 404, description = "Pharmacy not found"),
        (status = 409, description = "Uniqueness or proximity conflict")
    ),
    tag = "pharmacies"
)]
pub async fn patch_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchPharmacyDto>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let pharmacy = service.patch(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some("Pharmacy updated successfully".to_string()),
    )))
}

/// Toggle active status
#[utoipa::path(
    patch,
    path = "/api/pharmacies/{id}/toggle-status",
    params(("id" = String, Path, description = "Pharmacy id")),
    responses(
        (status = 200, description = "Status flipped", body = ApiResponse<PharmacyResponseDto>),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn toggle_pharmacy_status(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.toggle_status(&id).await?;
    let message = if pharmacy.is_active {
        "Pharmacy activated"
    } else {
        "Pharmacy deactivated"
    };
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some(message.to_string()),
    )))
}

/// Restore a soft-deleted pharmacy
#[utoipa::path(
    patch,
    path = "/api/pharmacies/{id}/restore",
    params(("id" = String, Path, description = "Pharmacy id")),
    responses(
        (status = 200, description = "Pharmacy restored", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Pharmacy is already active"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn restore_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.restore(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some("Pharmacy restored successfully".to_string()),
    )))
}

/// Soft-delete a pharmacy (mark inactive)
#[utoipa::path(
    delete,
    path = "/api/pharmacies/{id}/soft",
    params(("id" = String, Path, description = "Pharmacy id")),
    responses(
        (status = 200, description = "Pharmacy deactivated", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Pharmacy is already inactive"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn soft_delete_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.soft_delete(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some("Pharmacy soft-deleted successfully".to_string()),
    )))
}

/// Permanently delete a pharmacy
#[utoipa::path(
    delete,
    path = "/api/pharmacies/{id}",
    params(("id" = String, Path, description = "Pharmacy id")),
    responses(
        (status = 200, description = "Pharmacy deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn delete_pharmacy(
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.hard_delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Pharmacy deleted permanently".to_string()),
    )))
}

/// Permanently delete a batch of pharmacies
///
/// Reports the number of records actually removed; 404 when none of the
/// provided ids match.
#[utoipa::path(
    post,
    path = "/api/pharmacies/bulk-delete",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Pharmacies deleted", body = ApiResponse<BulkDeleteResponseDto>),
        (status = 400, description = "Empty id list or malformed id"),
        (status = 404, description = "No pharmacies matched")
    ),
    tag = "pharmacies"
)]
pub async fn bulk_delete_pharmacies(
    State(service): State<Arc<PharmacyService>>,
    AppJson(dto): AppJson<BulkDeleteDto>,
) -> Result<Json<ApiResponse<BulkDeleteResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let deleted_count = service.bulk_delete(&dto.ids).await?;
    Ok(Json(ApiResponse::success(
        Some(BulkDeleteResponseDto { deleted_count }),
        Some(format!("{} pharmacies deleted", deleted_count)),
    )))
}
