//! Pharmacy directory feature: listing, search, geofenced creation and
//! soft-delete lifecycle for pharmacy records.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/pharmacies` | List with filters/pagination/sort |
//! | GET | `/api/pharmacies/search` | Text + district search |
//! | GET | `/api/pharmacies/district/{district}` | List by district |
//! | GET | `/api/pharmacies/{id}` | Fetch one |
//! | POST | `/api/pharmacies` | Create (1km proximity guard) |
//! | PUT | `/api/pharmacies/{id}` | Full update (allow-listed fields) |
//! | PATCH | `/api/pharmacies/{id}` | Partial update |
//! | PATCH | `/api/pharmacies/{id}/toggle-status` | Flip active flag |
//! | PATCH | `/api/pharmacies/{id}/restore` | Reactivate |
//! | DELETE | `/api/pharmacies/{id}` | Hard delete |
//! | DELETE | `/api/pharmacies/{id}/soft` | Soft delete |
//! | POST | `/api/pharmacies/bulk-delete` | Hard delete many |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::PharmacyService;
