/// Unit model and database operations
///
/// A unit is a rentable subdivision of a property (apartment, suite, bay).
/// Single-family properties typically have one unit or none at all; tenants
/// may attach to a unit or directly to the property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Rentable unit within a property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Unit {
    /// Unique unit ID
    pub id: Uuid,

    /// Property this unit belongs to
    pub property_id: Uuid,

    /// Short label (e.g., "2B", "Suite 104")
    pub label: String,

    /// Number of bedrooms
    pub bedrooms: Option<i32>,

    /// Number of bathrooms
    pub bathrooms: Option<i32>,

    /// Floor area in square feet
    pub square_feet: Option<i32>,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the unit was created
    pub created_at: DateTime<Utc>,

    /// When the unit was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnit {
    /// Property this unit belongs to
    pub property_id: Uuid,

    /// Short label
    pub label: String,

    /// Number of bedrooms
    pub bedrooms: Option<i32>,

    /// Number of bathrooms
    pub bathrooms: Option<i32>,

    /// Floor area in square feet
    pub square_feet: Option<i32>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Input for updating a unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUnit {
    /// New label
    pub label: Option<String>,

    /// New bedroom count (use Some(None) to clear)
    pub bedrooms: Option<Option<i32>>,

    /// New bathroom count (use Some(None) to clear)
    pub bathrooms: Option<Option<i32>>,

    /// New floor area (use Some(None) to clear)
    pub square_feet: Option<Option<i32>>,

    /// New notes (use Some(None) to clear)
    pub notes: Option<Option<String>>,
}

impl Unit {
    /// Creates a new unit
    pub async fn create(pool: &PgPool, data: CreateUnit) -> Result<Self, sqlx::Error> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (property_id, label, bedrooms, bathrooms, square_feet, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, property_id, label, bedrooms, bathrooms, square_feet, notes,
                      created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.label)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .bind(data.square_feet)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(unit)
    }

    /// Finds a unit by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, label, bedrooms, bathrooms, square_feet, notes,
                   created_at, updated_at
            FROM units
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(unit)
    }

    /// Lists units of a property
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let units = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, label, bedrooms, bathrooms, square_feet, notes,
                   created_at, updated_at
            FROM units
            WHERE property_id = $1
            ORDER BY label ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(units)
    }

    /// Updates a unit
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUnit,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE units SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.label.is_some() {
            bind_count += 1;
            query.push_str(&format!(", label = ${}", bind_count));
        }
        if data.bedrooms.is_some() {
            bind_count += 1;
            query.push_str(&format!(", bedrooms = ${}", bind_count));
        }
        if data.bathrooms.is_some() {
            bind_count += 1;
            query.push_str(&format!(", bathrooms = ${}", bind_count));
        }
        if data.square_feet.is_some() {
            bind_count += 1;
            query.push_str(&format!(", square_feet = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", notes = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, property_id, label, bedrooms, bathrooms, square_feet, notes, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Unit>(&query).bind(id);

        if let Some(label) = data.label {
            q = q.bind(label);
        }
        if let Some(bedrooms_opt) = data.bedrooms {
            q = q.bind(bedrooms_opt);
        }
        if let Some(bathrooms_opt) = data.bathrooms {
            q = q.bind(bathrooms_opt);
        }
        if let Some(sqft_opt) = data.square_feet {
            q = q.bind(sqft_opt);
        }
        if let Some(notes_opt) = data.notes {
            q = q.bind(notes_opt);
        }

        let unit = q.fetch_optional(pool).await?;

        Ok(unit)
    }

    /// Deletes a unit
    ///
    /// Tenants attached to the unit keep their property link; their
    /// `unit_id` is set to NULL.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_unit_default() {
        let update = UpdateUnit::default();
        assert!(update.label.is_none());
        assert!(update.bedrooms.is_none());
        assert!(update.notes.is_none());
    }
}
