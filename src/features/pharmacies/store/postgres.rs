use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::features::pharmacies::models::{
    District, GeoPoint, OperatingHours, Pharmacy, PointType,
};
use crate::features::pharmacies::store::{
    haversine_distance, NewPharmacy, PageRequest, PharmacyFilter, PharmacyStore, PharmacyUpdate,
    Sort, SortField, StoreError,
};
use async_trait::async_trait;

const COLUMNS: &str = "id, name, district, longitude, latitude, contact_number, email, \
     open_time, close_time, is_active, pharmacist_name, created_at, updated_at";

/// Flat row shape for the pharmacies table
#[derive(Debug, Clone, FromRow)]
struct PharmacyRow {
    id: Uuid,
    name: String,
    district: District,
    longitude: f64,
    latitude: f64,
    contact_number: String,
    email: String,
    open_time: String,
    close_time: String,
    is_active: bool,
    pharmacist_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PharmacyRow> for Pharmacy {
    fn from(row: PharmacyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            district: row.district,
            location: GeoPoint {
                kind: PointType::Point,
                coordinates: [row.longitude, row.latitude],
            },
            contact_number: row.contact_number,
            email: row.email,
            operating_hours: OperatingHours {
                open: row.open_time,
                close: row.close_time,
            },
            is_active: row.is_active,
            pharmacist_name: row.pharmacist_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed pharmacy store
pub struct PgPharmacyStore {
    pool: PgPool,
}

impl PgPharmacyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PharmacyFilter) {
        if let Some(district) = filter.district {
            builder.push(" AND district = ").push_bind(district);
        }
        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ").push_bind(is_active);
        }
        if let Some(ref name) = filter.name {
            builder.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(ref pharmacist_name) = filter.pharmacist_name {
            builder
                .push(" AND pharmacist_name = ")
                .push_bind(pharmacist_name.clone());
        }
        if let Some(ref email) = filter.email {
            builder.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(ref contact_number) = filter.contact_number {
            builder
                .push(" AND contact_number = ")
                .push_bind(contact_number.clone());
        }
    }

    fn sort_column(field: SortField) -> &'static str {
        match field {
            SortField::Name => "name",
            SortField::District => "district",
            SortField::PharmacistName => "pharmacist_name",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Translate unique-constraint violations into a typed conflict naming
    /// the wire-level field; everything else stays a database error.
    fn map_write_error(e: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(ref db) = e {
            if db.is_unique_violation() {
                let field = match db.constraint() {
                    Some("pharmacies_name_key") => Some("name"),
                    Some("pharmacies_contact_number_key") => Some("contactNumber"),
                    Some("pharmacies_email_key") => Some("email"),
                    _ => None,
                };
                if let Some(field) = field {
                    return StoreError::Duplicate {
                        field: field.to_string(),
                    };
                }
            }
        }
        StoreError::Database(e)
    }
}

#[async_trait]
impl PharmacyStore for PgPharmacyStore {
    async fn find(
        &self,
        filter: &PharmacyFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Pharmacy>, StoreError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM pharmacies WHERE 1=1"));
        Self::push_filter(&mut builder, filter);

        builder.push(format!(
            " ORDER BY {} {}",
            Self::sort_column(sort.field),
            if sort.descending { "DESC" } else { "ASC" }
        ));
        builder.push(" LIMIT ").push_bind(page.limit);
        builder.push(" OFFSET ").push_bind(page.offset);

        let rows: Vec<PharmacyRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list pharmacies: {:?}", e);
                StoreError::Database(e)
            })?;

        Ok(rows.into_iter().map(Pharmacy::from).collect())
    }

    async fn count(&self, filter: &PharmacyFilter) -> Result<i64, StoreError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM pharmacies WHERE 1=1");
        Self::push_filter(&mut builder, filter);

        builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count pharmacies: {:?}", e);
                StoreError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>, StoreError> {
        let row = sqlx::query_as::<_, PharmacyRow>(&format!(
            "SELECT {COLUMNS} FROM pharmacies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get pharmacy by id: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(row.map(Pharmacy::from))
    }

    async fn find_within_radius(
        &self,
        point: GeoPoint,
        radius_meters: f64,
        exclude: Option<Uuid>,
    ) -> Result<Option<Pharmacy>, StoreError> {
        let (lon, lat) = (point.longitude(), point.latitude());

        // Bounding box prefilter; 1 degree of latitude is approximately 111km.
        // Longitude degrees shrink with latitude, clamped to avoid blowup at
        // the poles.
        let lat_delta = (radius_meters / 111_000.0) * 2.0;
        let lon_delta = lat_delta / lat.to_radians().cos().abs().max(0.01);

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM pharmacies WHERE latitude BETWEEN "));
        builder.push_bind(lat - lat_delta);
        builder.push(" AND ").push_bind(lat + lat_delta);
        builder.push(" AND longitude BETWEEN ").push_bind(lon - lon_delta);
        builder.push(" AND ").push_bind(lon + lon_delta);
        if let Some(exclude) = exclude {
            builder.push(" AND id != ").push_bind(exclude);
        }

        let rows: Vec<PharmacyRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find nearby pharmacies: {:?}", e);
                StoreError::Database(e)
            })?;

        // Exact distance check using Haversine
        Ok(rows
            .into_iter()
            .find(|row| {
                haversine_distance(lat, lon, row.latitude, row.longitude) <= radius_meters
            })
            .map(Pharmacy::from))
    }

    async fn search(
        &self,
        term: &str,
        district: Option<District>,
        limit: i64,
    ) -> Result<Vec<Pharmacy>, StoreError> {
        let pattern = format!("%{}%", term);

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM pharmacies WHERE (name ILIKE "
        ));
        builder.push_bind(pattern.clone());
        builder.push(" OR pharmacist_name ILIKE ").push_bind(pattern);
        builder.push(")");
        if let Some(district) = district {
            builder.push(" AND district = ").push_bind(district);
        }
        builder.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit);

        let rows: Vec<PharmacyRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search pharmacies: {:?}", e);
                StoreError::Database(e)
            })?;

        Ok(rows.into_iter().map(Pharmacy::from).collect())
    }

    async fn insert(&self, data: NewPharmacy) -> Result<Pharmacy, StoreError> {
        let row = sqlx::query_as::<_, PharmacyRow>(&format!(
            "INSERT INTO pharmacies \
                 (name, district, longitude, latitude, contact_number, email, \
                  open_time, close_time, is_active, pharmacist_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.district)
        .bind(data.location.longitude())
        .bind(data.location.latitude())
        .bind(data.contact_number)
        .bind(data.email)
        .bind(data.operating_hours.open)
        .bind(data.operating_hours.close)
        .bind(data.is_active)
        .bind(data.pharmacist_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert pharmacy: {:?}", e);
            Self::map_write_error(e)
        })?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: PharmacyUpdate,
    ) -> Result<Option<Pharmacy>, StoreError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE pharmacies SET updated_at = now()");

        if let Some(name) = changes.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(district) = changes.district {
            builder.push(", district = ").push_bind(district);
        }
        if let Some(location) = changes.location {
            builder.push(", longitude = ").push_bind(location.longitude());
            builder.push(", latitude = ").push_bind(location.latitude());
        }
        if let Some(contact_number) = changes.contact_number {
            builder.push(", contact_number = ").push_bind(contact_number);
        }
        if let Some(email) = changes.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(operating_hours) = changes.operating_hours {
            builder.push(", open_time = ").push_bind(operating_hours.open);
            builder.push(", close_time = ").push_bind(operating_hours.close);
        }
        if let Some(pharmacist_name) = changes.pharmacist_name {
            builder.push(", pharmacist_name = ").push_bind(pharmacist_name);
        }
        if let Some(is_active) = changes.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {COLUMNS}"));

        let row: Option<PharmacyRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update pharmacy {}: {:?}", id, e);
                Self::map_write_error(e)
            })?;

        Ok(row.map(Pharmacy::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM pharmacies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete pharmacy {}: {:?}", id, e);
                StoreError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM pharmacies WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to bulk delete pharmacies: {:?}", e);
                StoreError::Database(e)
            })?;

        Ok(result.rows_affected())
    }
}
