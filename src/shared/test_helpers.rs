#[cfg(test)]
use std::sync::atomic::{AtomicU32, Ordering};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use fake::faker::name::en::Name;
#[cfg(test)]
use fake::Fake;

#[cfg(test)]
use crate::features::pharmacies::dtos::CreatePharmacyDto;
#[cfg(test)]
use crate::features::pharmacies::models::{District, GeoPoint, OperatingHours};
#[cfg(test)]
use crate::features::pharmacies::store::memory::InMemoryPharmacyStore;
#[cfg(test)]
use crate::features::pharmacies::PharmacyService;

#[cfg(test)]
static SEQ: AtomicU32 = AtomicU32::new(0);

/// Service wired to a fresh in-memory store
#[cfg(test)]
pub fn memory_pharmacy_service() -> Arc<PharmacyService> {
    Arc::new(PharmacyService::new(Arc::new(InMemoryPharmacyStore::new())))
}

/// Valid create payload with unique contact number and email per call
#[cfg(test)]
pub fn create_pharmacy_dto(name: &str, longitude: f64, latitude: f64) -> CreatePharmacyDto {
    let n = SEQ.fetch_add(1, Ordering::Relaxed);
    let pharmacist_name: String = Name().fake();

    CreatePharmacyDto {
        name: name.to_string(),
        district: District::Colombo,
        location: GeoPoint::new(longitude, latitude),
        contact_number: format!("07{:08}", n),
        email: format!("pharmacy{}@example.com", n),
        operating_hours: OperatingHours {
            open: "08:00".to_string(),
            close: "22:00".to_string(),
        },
        is_active: None,
        pharmacist_name,
    }
}
