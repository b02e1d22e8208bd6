/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum number of hits returned by the free-text search endpoint
pub const SEARCH_RESULT_LIMIT: i64 = 20;

/// Minimum allowed distance between two pharmacy locations, in meters
pub const MIN_PHARMACY_DISTANCE_METERS: f64 = 1000.0;
