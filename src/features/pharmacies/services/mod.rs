mod pharmacy_service;

pub use pharmacy_service::PharmacyService;
