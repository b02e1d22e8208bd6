//! In-memory [`PharmacyStore`] fake for tests. Mirrors the Postgres
//! implementation's observable behavior: uniqueness conflicts name the
//! wire-level field, listing applies filter/sort/pagination, and the
//! proximity lookup uses the same Haversine check.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::features::pharmacies::models::{District, GeoPoint, Pharmacy};
use crate::features::pharmacies::store::{
    haversine_distance, NewPharmacy, PageRequest, PharmacyFilter, PharmacyStore, PharmacyUpdate,
    Sort, SortField, StoreError,
};

#[derive(Default)]
pub struct InMemoryPharmacyStore {
    records: Mutex<HashMap<Uuid, Pharmacy>>,
}

impl InMemoryPharmacyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(record: &Pharmacy, filter: &PharmacyFilter) -> bool {
        if let Some(district) = filter.district {
            if record.district != district {
                return false;
            }
        }
        if let Some(is_active) = filter.is_active {
            if record.is_active != is_active {
                return false;
            }
        }
        if let Some(ref name) = filter.name {
            if &record.name != name {
                return false;
            }
        }
        if let Some(ref pharmacist_name) = filter.pharmacist_name {
            if &record.pharmacist_name != pharmacist_name {
                return false;
            }
        }
        if let Some(ref email) = filter.email {
            if &record.email != email {
                return false;
            }
        }
        if let Some(ref contact_number) = filter.contact_number {
            if &record.contact_number != contact_number {
                return false;
            }
        }
        true
    }

    fn sort_records(records: &mut [Pharmacy], sort: Sort) {
        records.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::Name => a.name.cmp(&b.name),
                SortField::District => a.district.as_str().cmp(b.district.as_str()),
                SortField::PharmacistName => a.pharmacist_name.cmp(&b.pharmacist_name),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    /// Reject values that collide with another record's unique fields
    fn check_unique(
        records: &HashMap<Uuid, Pharmacy>,
        name: Option<&str>,
        contact_number: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<(), StoreError> {
        for record in records.values() {
            if Some(record.id) == exclude {
                continue;
            }
            if name == Some(record.name.as_str()) {
                return Err(StoreError::Duplicate {
                    field: "name".to_string(),
                });
            }
            if contact_number == Some(record.contact_number.as_str()) {
                return Err(StoreError::Duplicate {
                    field: "contactNumber".to_string(),
                });
            }
            if email == Some(record.email.as_str()) {
                return Err(StoreError::Duplicate {
                    field: "email".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PharmacyStore for InMemoryPharmacyStore {
    async fn find(
        &self,
        filter: &PharmacyFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Pharmacy>, StoreError> {
        let records = self.records.lock().unwrap();
        let mut matched: Vec<Pharmacy> = records
            .values()
            .filter(|r| Self::matches(r, filter))
            .cloned()
            .collect();
        Self::sort_records(&mut matched, sort);

        let offset = page.offset.max(0) as usize;
        let limit = page.limit.max(0) as usize;
        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &PharmacyFilter) -> Result<i64, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.values().filter(|r| Self::matches(r, filter)).count() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&id).cloned())
    }

    async fn find_within_radius(
        &self,
        point: GeoPoint,
        radius_meters: f64,
        exclude: Option<Uuid>,
    ) -> Result<Option<Pharmacy>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| Some(r.id) != exclude)
            .find(|r| {
                haversine_distance(
                    point.latitude(),
                    point.longitude(),
                    r.location.latitude(),
                    r.location.longitude(),
                ) <= radius_meters
            })
            .cloned())
    }

    async fn search(
        &self,
        term: &str,
        district: Option<District>,
        limit: i64,
    ) -> Result<Vec<Pharmacy>, StoreError> {
        let needle = term.to_lowercase();
        let records = self.records.lock().unwrap();
        let mut matched: Vec<Pharmacy> = records
            .values()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.pharmacist_name.to_lowercase().contains(&needle)
            })
            .filter(|r| district.map_or(true, |d| r.district == d))
            .cloned()
            .collect();
        Self::sort_records(&mut matched, Sort::default());
        matched.truncate(limit.max(0) as usize);
        Ok(matched)
    }

    async fn insert(&self, data: NewPharmacy) -> Result<Pharmacy, StoreError> {
        let mut records = self.records.lock().unwrap();
        Self::check_unique(
            &records,
            Some(&data.name),
            Some(&data.contact_number),
            Some(&data.email),
            None,
        )?;

        let now = Utc::now();
        let pharmacy = Pharmacy {
            id: Uuid::new_v4(),
            name: data.name,
            district: data.district,
            location: data.location,
            contact_number: data.contact_number,
            email: data.email,
            operating_hours: data.operating_hours,
            is_active: data.is_active,
            pharmacist_name: data.pharmacist_name,
            created_at: now,
            updated_at: now,
        };
        records.insert(pharmacy.id, pharmacy.clone());
        Ok(pharmacy)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: PharmacyUpdate,
    ) -> Result<Option<Pharmacy>, StoreError> {
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&id) {
            return Ok(None);
        }

        Self::check_unique(
            &records,
            changes.name.as_deref(),
            changes.contact_number.as_deref(),
            changes.email.as_deref(),
            Some(id),
        )?;

        let record = records.get_mut(&id).unwrap();
        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(district) = changes.district {
            record.district = district;
        }
        if let Some(location) = changes.location {
            record.location = location;
        }
        if let Some(contact_number) = changes.contact_number {
            record.contact_number = contact_number;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(operating_hours) = changes.operating_hours {
            record.operating_hours = operating_hours;
        }
        if let Some(pharmacist_name) = changes.pharmacist_name {
            record.pharmacist_name = pharmacist_name;
        }
        if let Some(is_active) = changes.is_active {
            record.is_active = is_active;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut records = self.records.lock().unwrap();
        let mut removed = 0;
        for id in ids {
            if records.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
