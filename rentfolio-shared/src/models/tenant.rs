/// Tenant model and database operations
///
/// A tenant is a renter attached to a property and optionally to a specific
/// unit within it. Lease history lives in `models::lease`; deactivating a
/// tenant keeps the history intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tenant (renter) record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    /// Unique tenant ID
    pub id: Uuid,

    /// Property this tenant rents at
    pub property_id: Uuid,

    /// Specific unit, if assigned
    pub unit_id: Option<Uuid>,

    /// Full name
    pub name: String,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// Whether the tenant currently rents here
    pub is_active: bool,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Property this tenant rents at
    pub property_id: Uuid,

    /// Specific unit, if assigned
    pub unit_id: Option<Uuid>,

    /// Full name
    pub name: String,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone
    pub phone: Option<String>,
}

/// Input for updating a tenant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenant {
    /// New unit assignment (use Some(None) to detach from unit)
    pub unit_id: Option<Option<Uuid>>,

    /// New name
    pub name: Option<String>,

    /// New email (use Some(None) to clear)
    pub email: Option<Option<String>>,

    /// New phone (use Some(None) to clear)
    pub phone: Option<Option<String>>,

    /// Activate or deactivate the tenant
    pub is_active: Option<bool>,
}

impl Tenant {
    /// Creates a new tenant (active by default)
    pub async fn create(pool: &PgPool, data: CreateTenant) -> Result<Self, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (property_id, unit_id, name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, property_id, unit_id, name, email, phone, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.unit_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .fetch_one(pool)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, property_id, unit_id, name, email, phone, is_active,
                   created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }

    /// Lists tenants of a property, active first
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, property_id, unit_id, name, email, phone, is_active,
                   created_at, updated_at
            FROM tenants
            WHERE property_id = $1
            ORDER BY is_active DESC, name ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(tenants)
    }

    /// Updates a tenant
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTenant,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tenants SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.unit_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", unit_id = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, property_id, unit_id, name, email, phone, is_active, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Tenant>(&query).bind(id);

        if let Some(unit_opt) = data.unit_id {
            q = q.bind(unit_opt);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email_opt) = data.email {
            q = q.bind(email_opt);
        }
        if let Some(phone_opt) = data.phone {
            q = q.bind(phone_opt);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let tenant = q.fetch_optional(pool).await?;

        Ok(tenant)
    }

    /// Deletes a tenant
    ///
    /// Leases and payments under the tenant are removed by CASCADE. Prefer
    /// deactivating (`is_active = false`) when history should be kept.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
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
    fn test_update_tenant_default() {
        let update = UpdateTenant::default();
        assert!(update.unit_id.is_none());
        assert!(update.name.is_none());
        assert!(update.is_active.is_none());
    }
}
