use utoipa::{Modify, OpenApi};

use crate::features::pharmacies::{dtos as pharmacies_dtos, handlers as pharmacies_handlers};
use crate::features::pharmacies::models as pharmacies_models;
use crate::shared::types::{ApiResponse, Pagination, ResponseStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        pharmacies_handlers::list_pharmacies,
        pharmacies_handlers::search_pharmacies,
        pharmacies_handlers::list_pharmacies_by_district,
        pharmacies_handlers::get_pharmacy,
        pharmacies_handlers::create_pharmacy,
        pharmacies_handlers::update_pharmacy,
        pharmacies_handlers::patch_pharmacy,
        pharmacies_handlers::toggle_pharmacy_status,
        pharmacies_handlers::restore_pharmacy,
        pharmacies_handlers::soft_delete_pharmacy,
        pharmacies_handlers::delete_pharmacy,
        pharmacies_handlers::bulk_delete_pharmacies,
    ),
    components(
        schemas(
            // Shared
            ResponseStatus,
            Pagination,
            // Pharmacies
            pharmacies_models::District,
            pharmacies_models::GeoPoint,
            pharmacies_models::PointType,
            pharmacies_models::OperatingHours,
            pharmacies_dtos::CreatePharmacyDto,
            pharmacies_dtos::UpdatePharmacyDto,
            pharmacies_dtos::PatchPharmacyDto,
            pharmacies_dtos::BulkDeleteDto,
            pharmacies_dtos::BulkDeleteResponseDto,
            pharmacies_dtos::PharmacyResponseDto,
            ApiResponse<pharmacies_dtos::PharmacyResponseDto>,
            ApiResponse<Vec<pharmacies_dtos::PharmacyResponseDto>>,
            ApiResponse<pharmacies_dtos::BulkDeleteResponseDto>,
        )
    ),
    tags(
        (name = "pharmacies", description = "Pharmacy directory (public)"),
    ),
    info(
        title = "MediReach API",
        version = "0.1.0",
        description = "API documentation for the MediReach pharmacy directory",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
