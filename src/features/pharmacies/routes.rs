use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::pharmacies::handlers;
use crate::features::pharmacies::services::PharmacyService;

/// Create routes for the pharmacies feature
///
/// Note: this feature is public (no authentication required)
pub fn routes(service: Arc<PharmacyService>) -> Router {
    Router::new()
        .route(
            "/api/pharmacies",
            get(handlers::list_pharmacies).post(handlers::create_pharmacy),
        )
        .route("/api/pharmacies/search", get(handlers::search_pharmacies))
        .route(
            "/api/pharmacies/district/{district}",
            get(handlers::list_pharmacies_by_district),
        )
        .route(
            "/api/pharmacies/bulk-delete",
            post(handlers::bulk_delete_pharmacies),
        )
        .route(
            "/api/pharmacies/{id}",
            get(handlers::get_pharmacy)
                .put(handlers::update_pharmacy)
                .patch(handlers::patch_pharmacy)
                .delete(handlers::delete_pharmacy),
        )
        .route(
            "/api/pharmacies/{id}/toggle-status",
            patch(handlers::toggle_pharmacy_status),
        )
        .route(
            "/api/pharmacies/{id}/restore",
            patch(handlers::restore_pharmacy),
        )
        .route(
            "/api/pharmacies/{id}/soft",
            delete(handlers::soft_delete_pharmacy),
        )
        .with_state(service)
}
