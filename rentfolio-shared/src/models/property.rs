/// Property model and database operations
///
/// Properties are the root of the record tree; every unit, tenant, lease,
/// payment, expense, renovation, and parking permit hangs off one.
///
/// A property is reachable by a user either directly through `user_id` or
/// through an owner entity link (`property_owners` + `user_owners`).
/// `list_for_user` unions both paths.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE property_kind AS ENUM ('single_family', 'multi_family', 'commercial');
///
/// CREATE TABLE properties (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     name VARCHAR(255) NOT NULL,
///     kind property_kind NOT NULL DEFAULT 'single_family',
///     street VARCHAR(255) NOT NULL,
///     city VARCHAR(128) NOT NULL,
///     state VARCHAR(64) NOT NULL,
///     postal_code VARCHAR(32) NOT NULL,
///     purchase_price_cents BIGINT,
///     purchased_on DATE,
///     notes TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Property classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Single-family house
    SingleFamily,

    /// Multi-unit residential building
    MultiFamily,

    /// Commercial property
    Commercial,
}

impl PropertyKind {
    /// Converts kind to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::SingleFamily => "single_family",
            PropertyKind::MultiFamily => "multi_family",
            PropertyKind::Commercial => "commercial",
        }
    }
}

/// Property model
///
/// Monetary amounts are stored in cents to avoid floating point rounding.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    /// Unique property ID
    pub id: Uuid,

    /// Direct owning user, if any (sole-proprietor access path)
    pub user_id: Option<Uuid>,

    /// Display name (e.g., "Maple Street Duplex")
    pub name: String,

    /// Property classification
    pub kind: PropertyKind,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State or province
    pub state: String,

    /// Postal code
    pub postal_code: String,

    /// Purchase price in cents, if recorded
    pub purchase_price_cents: Option<i64>,

    /// Purchase date, if recorded
    pub purchased_on: Option<NaiveDate>,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the property was created
    pub created_at: DateTime<Utc>,

    /// When the property was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProperty {
    /// Direct owning user
    pub user_id: Option<Uuid>,

    /// Display name
    pub name: String,

    /// Classification (defaults to SingleFamily)
    #[serde(default = "default_kind")]
    pub kind: PropertyKind,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State or province
    pub state: String,

    /// Postal code
    pub postal_code: String,

    /// Purchase price in cents
    pub purchase_price_cents: Option<i64>,

    /// Purchase date
    pub purchased_on: Option<NaiveDate>,

    /// Free-form notes
    pub notes: Option<String>,
}

fn default_kind() -> PropertyKind {
    PropertyKind::SingleFamily
}

/// Input for updating a property
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProperty {
    /// New display name
    pub name: Option<String>,

    /// New classification
    pub kind: Option<PropertyKind>,

    /// New street address
    pub street: Option<String>,

    /// New city
    pub city: Option<String>,

    /// New state
    pub state: Option<String>,

    /// New postal code
    pub postal_code: Option<String>,

    /// New purchase price in cents (use Some(None) to clear)
    pub purchase_price_cents: Option<Option<i64>>,

    /// New purchase date (use Some(None) to clear)
    pub purchased_on: Option<Option<NaiveDate>>,

    /// New notes (use Some(None) to clear)
    pub notes: Option<Option<String>>,
}

const PROPERTY_COLUMNS: &str = "id, user_id, name, kind, street, city, state, postal_code, \
                                purchase_price_cents, purchased_on, notes, created_at, updated_at";

impl Property {
    /// Creates a new property
    pub async fn create(pool: &PgPool, data: CreateProperty) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO properties (user_id, name, kind, street, city, state, postal_code,
                                    purchase_price_cents, purchased_on, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );

        let property = sqlx::query_as::<_, Property>(&query)
            .bind(data.user_id)
            .bind(data.name)
            .bind(data.kind)
            .bind(data.street)
            .bind(data.city)
            .bind(data.state)
            .bind(data.postal_code)
            .bind(data.purchase_price_cents)
            .bind(data.purchased_on)
            .bind(data.notes)
            .fetch_one(pool)
            .await?;

        Ok(property)
    }

    /// Finds a property by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);

        let property = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(property)
    }

    /// Lists every property the user can see
    ///
    /// Unions the direct path (`properties.user_id`) and the role path
    /// (`property_owners` joined through `user_owners`).
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT DISTINCT p.id, p.user_id, p.name, p.kind, p.street, p.city, p.state,
                   p.postal_code, p.purchase_price_cents, p.purchased_on, p.notes,
                   p.created_at, p.updated_at
            FROM properties p
            LEFT JOIN property_owners po ON po.property_id = p.id
            LEFT JOIN user_owners uo ON uo.owner_id = po.owner_id
            WHERE p.user_id = $1 OR uo.user_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }

    /// Updates a property
    ///
    /// Only non-None fields in `data` are written. `updated_at` is always
    /// refreshed.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProperty,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE properties SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.kind.is_some() {
            bind_count += 1;
            query.push_str(&format!(", kind = ${}", bind_count));
        }
        if data.street.is_some() {
            bind_count += 1;
            query.push_str(&format!(", street = ${}", bind_count));
        }
        if data.city.is_some() {
            bind_count += 1;
            query.push_str(&format!(", city = ${}", bind_count));
        }
        if data.state.is_some() {
            bind_count += 1;
            query.push_str(&format!(", state = ${}", bind_count));
        }
        if data.postal_code.is_some() {
            bind_count += 1;
            query.push_str(&format!(", postal_code = ${}", bind_count));
        }
        if data.purchase_price_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", purchase_price_cents = ${}", bind_count));
        }
        if data.purchased_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", purchased_on = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", notes = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", PROPERTY_COLUMNS));

        let mut q = sqlx::query_as::<_, Property>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(kind) = data.kind {
            q = q.bind(kind);
        }
        if let Some(street) = data.street {
            q = q.bind(street);
        }
        if let Some(city) = data.city {
            q = q.bind(city);
        }
        if let Some(state) = data.state {
            q = q.bind(state);
        }
        if let Some(postal_code) = data.postal_code {
            q = q.bind(postal_code);
        }
        if let Some(price_opt) = data.purchase_price_cents {
            q = q.bind(price_opt);
        }
        if let Some(date_opt) = data.purchased_on {
            q = q.bind(date_opt);
        }
        if let Some(notes_opt) = data.notes {
            q = q.bind(notes_opt);
        }

        let property = q.fetch_optional(pool).await?;

        Ok(property)
    }

    /// Deletes a property
    ///
    /// All child records (units, tenants, leases, payments, expenses,
    /// renovations, parking permits) are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
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
    fn test_property_kind_as_str() {
        assert_eq!(PropertyKind::SingleFamily.as_str(), "single_family");
        assert_eq!(PropertyKind::MultiFamily.as_str(), "multi_family");
        assert_eq!(PropertyKind::Commercial.as_str(), "commercial");
    }

    #[test]
    fn test_default_kind() {
        assert_eq!(default_kind(), PropertyKind::SingleFamily);
    }

    #[test]
    fn test_update_property_default() {
        let update = UpdateProperty::default();
        assert!(update.name.is_none());
        assert!(update.kind.is_none());
        assert!(update.purchase_price_cents.is_none());
    }
}
