pub mod pharmacies;
