use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::pharmacies::dtos::{
    CreatePharmacyDto, ListPharmaciesQuery, PatchPharmacyDto, PharmacyResponseDto,
    UpdatePharmacyDto,
};
use crate::features::pharmacies::models::{District, GeoPoint};
use crate::features::pharmacies::store::{
    NewPharmacy, PageRequest, PharmacyFilter, PharmacyStore, PharmacyUpdate, Sort,
};
use crate::shared::constants::{MIN_PHARMACY_DISTANCE_METERS, SEARCH_RESULT_LIMIT};
use crate::shared::types::{Pagination, PaginationQuery};

/// Service for pharmacy directory operations
pub struct PharmacyService {
    store: Arc<dyn PharmacyStore>,
}

impl PharmacyService {
    pub fn new(store: Arc<dyn PharmacyStore>) -> Self {
        Self { store }
    }

    /// List pharmacies with equality filters, sorting and pagination.
    /// Soft-deleted records are hidden unless `isActive` is passed explicitly.
    pub async fn list(
        &self,
        query: &ListPharmaciesQuery,
    ) -> Result<(Vec<PharmacyResponseDto>, Pagination)> {
        let filter = PharmacyFilter {
            district: query.district,
            is_active: Some(query.is_active.unwrap_or(true)),
            name: query.name.clone(),
            pharmacist_name: query.pharmacist_name.clone(),
            email: query.email.clone(),
            contact_number: query.contact_number.clone(),
        };
        let sort = query
            .sort
            .as_deref()
            .map(Sort::parse)
            .unwrap_or_default();

        self.find_page(filter, sort, &query.pagination()).await
    }

    /// List pharmacies in one district, newest first
    pub async fn list_by_district(
        &self,
        district: District,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PharmacyResponseDto>, Pagination)> {
        let filter = PharmacyFilter {
            district: Some(district),
            is_active: Some(true),
            ..PharmacyFilter::default()
        };

        self.find_page(filter, Sort::default(), pagination).await
    }

    async fn find_page(
        &self,
        filter: PharmacyFilter,
        sort: Sort,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PharmacyResponseDto>, Pagination)> {
        let page = PageRequest {
            limit: pagination.limit(),
            offset: pagination.offset(),
        };

        let pharmacies = self.store.find(&filter, sort, page).await?;
        let total = self.store.count(&filter).await?;

        let meta = Pagination::new(pagination.page.max(1), pagination.limit(), total);
        Ok((
            pharmacies.into_iter().map(Into::into).collect(),
            meta,
        ))
    }

    /// Case-insensitive substring search over name and pharmacist name,
    /// optionally narrowed to a district, capped at 20 hits.
    pub async fn search(
        &self,
        term: &str,
        district: Option<District>,
    ) -> Result<Vec<PharmacyResponseDto>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::BadRequest("Search query is required".to_string()));
        }

        let pharmacies = self
            .store
            .search(term, district, SEARCH_RESULT_LIMIT)
            .await?;
        Ok(pharmacies.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> Result<PharmacyResponseDto> {
        let id = parse_id(id)?;
        let pharmacy = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;
        Ok(pharmacy.into())
    }

    pub async fn create(&self, dto: CreatePharmacyDto) -> Result<PharmacyResponseDto> {
        self.guard_proximity(dto.location, None).await?;

        let pharmacy = self
            .store
            .insert(NewPharmacy {
                name: dto.name.trim().to_string(),
                district: dto.district,
                location: dto.location,
                contact_number: dto.contact_number,
                email: dto.email.to_lowercase(),
                operating_hours: dto.operating_hours,
                is_active: dto.is_active.unwrap_or(true),
                pharmacist_name: dto.pharmacist_name,
            })
            .await?;

        Ok(pharmacy.into())
    }

    /// Full update, restricted to the updatable allow-list
    pub async fn update(&self, id: &str, dto: UpdatePharmacyDto) -> Result<PharmacyResponseDto> {
        let changes = PharmacyUpdate {
            name: dto.name.map(|n| n.trim().to_string()),
            district: dto.district,
            location: dto.location,
            contact_number: dto.contact_number,
            email: dto.email.map(|e| e.to_lowercase()),
            operating_hours: dto.operating_hours,
            pharmacist_name: dto.pharmacist_name,
            is_active: None,
        };
        self.apply_update(id, changes).await
    }

    /// Partial update; unlike the PUT allow-list this may also flip `isActive`
    pub async fn patch(&self, id: &str, dto: PatchPharmacyDto) -> Result<PharmacyResponseDto> {
        let changes = PharmacyUpdate {
            name: dto.name.map(|n| n.trim().to_string()),
            district: dto.district,
            location: dto.location,
            contact_number: dto.contact_number,
            email: dto.email.map(|e| e.to_lowercase()),
            operating_hours: dto.operating_hours,
            pharmacist_name: dto.pharmacist_name,
            is_active: dto.is_active,
        };
        self.apply_update(id, changes).await
    }

    async fn apply_update(&self, id: &str, changes: PharmacyUpdate) -> Result<PharmacyResponseDto> {
        let id = parse_id(id)?;

        if let Some(location) = changes.location {
            self.guard_proximity(location, Some(id)).await?;
        }

        let pharmacy = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;
        Ok(pharmacy.into())
    }

    /// Flip the active flag unconditionally
    pub async fn toggle_status(&self, id: &str) -> Result<PharmacyResponseDto> {
        let id = parse_id(id)?;
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

        let pharmacy = self
            .store
            .update(
                id,
                PharmacyUpdate {
                    is_active: Some(!current.is_active),
                    ..PharmacyUpdate::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;
        Ok(pharmacy.into())
    }

    /// Mark a pharmacy inactive; fails if it is already inactive
    pub async fn soft_delete(&self, id: &str) -> Result<PharmacyResponseDto> {
        self.set_active_state(id, false, "Pharmacy is already inactive")
            .await
    }

    /// Reactivate a soft-deleted pharmacy; fails if it is already active
    pub async fn restore(&self, id: &str) -> Result<PharmacyResponseDto> {
        self.set_active_state(id, true, "Pharmacy is already active")
            .await
    }

    async fn set_active_state(
        &self,
        id: &str,
        active: bool,
        already_message: &str,
    ) -> Result<PharmacyResponseDto> {
        let id = parse_id(id)?;
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

        if current.is_active == active {
            return Err(AppError::BadRequest(already_message.to_string()));
        }

        let pharmacy = self
            .store
            .update(
                id,
                PharmacyUpdate {
                    is_active: Some(active),
                    ..PharmacyUpdate::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;
        Ok(pharmacy.into())
    }

    /// Permanently remove a record
    pub async fn hard_delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        let removed = self.store.delete(id).await?;
        if !removed {
            return Err(AppError::NotFound("Pharmacy not found".to_string()));
        }
        Ok(())
    }

    /// Permanently remove a batch of records, reporting how many matched.
    /// Zero matches is reported as not-found rather than an empty success.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<i64> {
        let ids = ids
            .iter()
            .map(|raw| parse_id(raw))
            .collect::<Result<Vec<Uuid>>>()?;

        let deleted = self.store.delete_many(&ids).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(
                "No pharmacies found with the provided IDs".to_string(),
            ));
        }
        Ok(deleted as i64)
    }

    /// Reject writes that would place a pharmacy within 1km of another.
    /// The check and the subsequent write are two separate store calls, so
    /// concurrent writes may both pass; last-writer wins.
    async fn guard_proximity(&self, location: GeoPoint, exclude: Option<Uuid>) -> Result<()> {
        let conflict = self
            .store
            .find_within_radius(location, MIN_PHARMACY_DISTANCE_METERS, exclude)
            .await?;

        if let Some(existing) = conflict {
            tracing::info!(
                "Proximity conflict with pharmacy {} at ({}, {})",
                existing.id,
                existing.location.longitude(),
                existing.location.latitude()
            );
            return Err(AppError::ProximityConflict(
                "A pharmacy already exists within 1km of this location".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(format!("Invalid pharmacy ID: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pharmacies::dtos::{
        ListPharmaciesQuery, PatchPharmacyDto, UpdatePharmacyDto,
    };
    use crate::shared::test_helpers::{create_pharmacy_dto, memory_pharmacy_service};

    #[tokio::test]
    async fn test_create_defaults_to_active() {
        let service = memory_pharmacy_service();
        let created = service
            .create(create_pharmacy_dto("Central Pharmacy", 79.86, 6.93))
            .await
            .unwrap();
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn test_create_lowercases_email() {
        let service = memory_pharmacy_service();
        let mut dto = create_pharmacy_dto("Central Pharmacy", 79.86, 6.93);
        dto.email = "Staff@Example.COM".to_string();
        let created = service.create(dto).await.unwrap();
        assert_eq!(created.email, "staff@example.com");
    }

    #[tokio::test]
    async fn test_create_within_1km_conflicts() {
        let service = memory_pharmacy_service();
        service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();

        // ~130m away
        let err = service
            .create(create_pharmacy_dto("Pharmacy B", 79.861, 6.931))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProximityConflict(_)));

        // Far enough away
        service
            .create(create_pharmacy_dto("Pharmacy C", 80.5, 7.5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_proximity_guard_considers_inactive_records() {
        let service = memory_pharmacy_service();
        let existing = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        service.soft_delete(&existing.id.to_string()).await.unwrap();

        let err = service
            .create(create_pharmacy_dto("Pharmacy B", 79.861, 6.931))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProximityConflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_unique_fields_name_the_field() {
        let service = memory_pharmacy_service();
        let original = create_pharmacy_dto("Pharmacy A", 79.86, 6.93);
        service.create(original.clone()).await.unwrap();

        let mut dup_name = create_pharmacy_dto("Pharmacy A", 80.5, 7.5);
        dup_name.name = original.name.clone();
        let err = service.create(dup_name).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConflict { ref field } if field == "name"));

        let mut dup_contact = create_pharmacy_dto("Pharmacy B", 80.5, 7.5);
        dup_contact.contact_number = original.contact_number.clone();
        let err = service.create(dup_contact).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConflict { ref field } if field == "contactNumber"));

        let mut dup_email = create_pharmacy_dto("Pharmacy C", 80.5, 7.5);
        dup_email.email = original.email.clone();
        let err = service.create(dup_email).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConflict { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_and_unknown_ids() {
        let service = memory_pharmacy_service();

        let err = service.get("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));

        let err = service.get(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_hides_inactive_by_default() {
        let service = memory_pharmacy_service();
        service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let other = service
            .create(create_pharmacy_dto("Pharmacy B", 80.5, 7.5))
            .await
            .unwrap();
        service.soft_delete(&other.id.to_string()).await.unwrap();

        let (visible, _) = service.list(&ListPharmaciesQuery::default()).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Pharmacy A");

        let (hidden, _) = service
            .list(&ListPharmaciesQuery {
                is_active: Some(false),
                ..ListPharmaciesQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].name, "Pharmacy B");
    }

    #[tokio::test]
    async fn test_list_pagination_metadata() {
        let service = memory_pharmacy_service();
        for (i, lat) in [6.0, 6.5, 7.0].iter().enumerate() {
            service
                .create(create_pharmacy_dto(&format!("Pharmacy {}", i), 80.0, *lat))
                .await
                .unwrap();
        }

        let (page, meta) = service
            .list(&ListPharmaciesQuery {
                limit: 2,
                ..ListPharmaciesQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(meta.total_items, 3);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
    }

    #[tokio::test]
    async fn test_list_sorts_by_name_ascending() {
        let service = memory_pharmacy_service();
        service
            .create(create_pharmacy_dto("Zebra Pharmacy", 80.0, 6.0))
            .await
            .unwrap();
        service
            .create(create_pharmacy_dto("Alpha Pharmacy", 80.0, 7.0))
            .await
            .unwrap();

        let (sorted, _) = service
            .list(&ListPharmaciesQuery {
                sort: Some("name".to_string()),
                ..ListPharmaciesQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(sorted[0].name, "Alpha Pharmacy");
        assert_eq!(sorted[1].name, "Zebra Pharmacy");
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore_guards() {
        let service = memory_pharmacy_service();
        let created = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let id = created.id.to_string();

        let err = service.restore(&id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let deleted = service.soft_delete(&id).await.unwrap();
        assert!(!deleted.is_active);

        let err = service.soft_delete(&id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let restored = service.restore(&id).await.unwrap();
        assert!(restored.is_active);
    }

    #[tokio::test]
    async fn test_toggle_status_flips_unconditionally() {
        let service = memory_pharmacy_service();
        let created = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let id = created.id.to_string();

        let toggled = service.toggle_status(&id).await.unwrap();
        assert!(!toggled.is_active);
        let toggled = service.toggle_status(&id).await.unwrap();
        assert!(toggled.is_active);
    }

    #[tokio::test]
    async fn test_full_update_cannot_flip_active_but_patch_can() {
        let service = memory_pharmacy_service();
        let created = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let id = created.id.to_string();
        service.soft_delete(&id).await.unwrap();

        // PUT carries only the allow-listed fields; active state is untouched
        let updated = service
            .update(
                &id,
                UpdatePharmacyDto {
                    name: Some("Renamed Pharmacy".to_string()),
                    ..UpdatePharmacyDto::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed Pharmacy");
        assert!(!updated.is_active);

        // PATCH may flip it directly
        let patched = service
            .patch(
                &id,
                PatchPharmacyDto {
                    is_active: Some(true),
                    ..PatchPharmacyDto::default()
                },
            )
            .await
            .unwrap();
        assert!(patched.is_active);
    }

    #[tokio::test]
    async fn test_update_location_excludes_self_from_guard() {
        let service = memory_pharmacy_service();
        let a = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        service
            .create(create_pharmacy_dto("Pharmacy B", 80.5, 7.5))
            .await
            .unwrap();

        // Nudging A within its own radius is fine
        let moved = service
            .update(
                &a.id.to_string(),
                UpdatePharmacyDto {
                    location: Some(GeoPoint::new(79.8601, 6.9301)),
                    ..UpdatePharmacyDto::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.location.longitude(), 79.8601);

        // Moving A next to B is not
        let err = service
            .update(
                &a.id.to_string(),
                UpdatePharmacyDto {
                    location: Some(GeoPoint::new(80.5001, 7.5001)),
                    ..UpdatePharmacyDto::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProximityConflict(_)));
    }

    #[tokio::test]
    async fn test_hard_delete_then_not_found() {
        let service = memory_pharmacy_service();
        let created = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let id = created.id.to_string();

        service.hard_delete(&id).await.unwrap();
        let err = service.hard_delete(&id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bulk_delete_reports_matched_count_only() {
        let service = memory_pharmacy_service();
        let a = service
            .create(create_pharmacy_dto("Pharmacy A", 79.86, 6.93))
            .await
            .unwrap();
        let b = service
            .create(create_pharmacy_dto("Pharmacy B", 80.5, 7.5))
            .await
            .unwrap();

        let deleted = service
            .bulk_delete(&[
                a.id.to_string(),
                b.id.to_string(),
                Uuid::new_v4().to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_zero_matches_is_not_found() {
        let service = memory_pharmacy_service();
        let err = service
            .bulk_delete(&[Uuid::new_v4().to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bulk_delete_rejects_malformed_ids() {
        let service = memory_pharmacy_service();
        let err = service
            .bulk_delete(&["not-a-uuid".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_search_requires_a_query() {
        let service = memory_pharmacy_service();
        let err = service.search("  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_search_matches_name_and_pharmacist_case_insensitively() {
        let service = memory_pharmacy_service();
        service
            .create(create_pharmacy_dto("Sunrise Pharmacy", 79.86, 6.93))
            .await
            .unwrap();
        let mut dto = create_pharmacy_dto("City Meds", 80.5, 7.5);
        dto.pharmacist_name = "Sunil Perera".to_string();
        service.create(dto).await.unwrap();

        let hits = service.search("SUNRISE", None).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = service.search("sunil", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "City Meds");
    }

    #[tokio::test]
    async fn test_search_intersects_with_district() {
        let service = memory_pharmacy_service();
        let mut in_kandy = create_pharmacy_dto("Hill Pharmacy", 80.63, 7.29);
        in_kandy.district = District::Kandy;
        service.create(in_kandy).await.unwrap();
        service
            .create(create_pharmacy_dto("Hill Drugstore", 79.86, 6.93))
            .await
            .unwrap();

        let hits = service.search("hill", Some(District::Kandy)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Hill Pharmacy");
    }

    #[tokio::test]
    async fn test_search_caps_results_at_twenty() {
        let service = memory_pharmacy_service();
        // Spaced ~5.5km apart so the proximity guard stays quiet
        for i in 0..25 {
            service
                .create(create_pharmacy_dto(
                    &format!("MediSearch {}", i),
                    80.0,
                    5.0 + i as f64 * 0.05,
                ))
                .await
                .unwrap();
        }

        let hits = service.search("medisearch", None).await.unwrap();
        assert_eq!(hits.len(), 20);
    }
}
