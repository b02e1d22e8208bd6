use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::shared::validation::TIME_OF_DAY_REGEX;

/// Administrative district enum matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "district")]
pub enum District {
    Colombo,
    Gampaha,
    Kalutara,
    Kandy,
    Galle,
    Matara,
    Jaffna,
    Kurunegala,
    Badulla,
}

impl District {
    pub const ALL: [District; 9] = [
        District::Colombo,
        District::Gampaha,
        District::Kalutara,
        District::Kandy,
        District::Galle,
        District::Matara,
        District::Jaffna,
        District::Kurunegala,
        District::Badulla,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            District::Colombo => "Colombo",
            District::Gampaha => "Gampaha",
            District::Kalutara => "Kalutara",
            District::Kandy => "Kandy",
            District::Galle => "Galle",
            District::Matara => "Matara",
            District::Jaffna => "Jaffna",
            District::Kurunegala => "Kurunegala",
            District::Badulla => "Badulla",
        }
    }
}

impl std::fmt::Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for District {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        District::ALL
            .iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                let allowed: Vec<&str> = District::ALL.iter().map(|d| d.as_str()).collect();
                format!("District must be one of: {}", allowed.join(", "))
            })
    }
}

/// GeoJSON-style point: `{"type": "Point", "coordinates": [longitude, latitude]}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_type")]
    #[schema(example = "Point")]
    pub kind: PointType,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PointType {
    Point,
}

fn point_type() -> PointType {
    PointType::Point
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: PointType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Validator hook for coordinate ranges, used by the request DTOs
pub fn validate_geo_point(point: &GeoPoint) -> Result<(), ValidationError> {
    let (lon, lat) = (point.longitude(), point.latitude());
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::new("coordinates").with_message("Invalid coordinates".into()));
    }
    Ok(())
}

/// Daily opening window in 24-hour HH:mm strings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OperatingHours {
    #[validate(regex(path = *TIME_OF_DAY_REGEX, message = "Use format HH:mm (e.g., 08:00)"))]
    #[schema(example = "08:00")]
    pub open: String,

    #[validate(regex(path = *TIME_OF_DAY_REGEX, message = "Use format HH:mm (e.g., 22:00)"))]
    #[schema(example = "22:00")]
    pub close: String,
}

/// Domain model for a pharmacy record
#[derive(Debug, Clone)]
pub struct Pharmacy {
    pub id: Uuid,
    pub name: String,
    pub district: District,
    pub location: GeoPoint,
    pub contact_number: String,
    pub email: String,
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub pharmacist_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
