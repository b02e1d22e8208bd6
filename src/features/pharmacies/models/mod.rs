mod pharmacy;

pub use pharmacy::{
    validate_geo_point, District, GeoPoint, OperatingHours, Pharmacy, PointType,
};
