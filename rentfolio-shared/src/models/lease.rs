/// Lease model and database operations
///
/// A lease records the rent terms between a tenant and the property. A
/// tenant has at most one active lease; creating a new lease deactivates
/// any previously active one in the same transaction, so renewals never
/// leave two active leases behind.
///
/// All monetary amounts are in cents.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE leases (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     rent_cents BIGINT NOT NULL,
///     deposit_cents BIGINT NOT NULL DEFAULT 0,
///     pet_deposit_cents BIGINT NOT NULL DEFAULT 0,
///     last_month_rent_cents BIGINT NOT NULL DEFAULT 0,
///     start_date DATE NOT NULL,
///     end_date DATE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lease agreement for a tenant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lease {
    /// Unique lease ID
    pub id: Uuid,

    /// Tenant this lease belongs to
    pub tenant_id: Uuid,

    /// Monthly rent in cents
    pub rent_cents: i64,

    /// Security deposit in cents
    pub deposit_cents: i64,

    /// Pet deposit in cents
    pub pet_deposit_cents: i64,

    /// Last month's rent held in cents
    pub last_month_rent_cents: i64,

    /// Lease start date
    pub start_date: NaiveDate,

    /// Lease end date (None for month-to-month)
    pub end_date: Option<NaiveDate>,

    /// Whether this is the tenant's current lease
    pub is_active: bool,

    /// When the lease was created
    pub created_at: DateTime<Utc>,

    /// When the lease was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new lease
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLease {
    /// Tenant this lease belongs to
    pub tenant_id: Uuid,

    /// Monthly rent in cents
    pub rent_cents: i64,

    /// Security deposit in cents
    #[serde(default)]
    pub deposit_cents: i64,

    /// Pet deposit in cents
    #[serde(default)]
    pub pet_deposit_cents: i64,

    /// Last month's rent held in cents
    #[serde(default)]
    pub last_month_rent_cents: i64,

    /// Lease start date
    pub start_date: NaiveDate,

    /// Lease end date (None for month-to-month)
    pub end_date: Option<NaiveDate>,
}

/// Input for updating a lease
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLease {
    /// New monthly rent in cents
    pub rent_cents: Option<i64>,

    /// New security deposit in cents
    pub deposit_cents: Option<i64>,

    /// New pet deposit in cents
    pub pet_deposit_cents: Option<i64>,

    /// New last month's rent in cents
    pub last_month_rent_cents: Option<i64>,

    /// New start date
    pub start_date: Option<NaiveDate>,

    /// New end date (use Some(None) to make month-to-month)
    pub end_date: Option<Option<NaiveDate>>,

    /// Activate or deactivate the lease
    pub is_active: Option<bool>,
}

const LEASE_COLUMNS: &str = "id, tenant_id, rent_cents, deposit_cents, pet_deposit_cents, \
                             last_month_rent_cents, start_date, end_date, is_active, \
                             created_at, updated_at";

impl Lease {
    /// Creates a new active lease for a tenant
    ///
    /// Any previously active lease for the same tenant is deactivated in
    /// the same transaction.
    pub async fn create(pool: &PgPool, data: CreateLease) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE leases
            SET is_active = FALSE, updated_at = NOW()
            WHERE tenant_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(data.tenant_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            r#"
            INSERT INTO leases (tenant_id, rent_cents, deposit_cents, pet_deposit_cents,
                                last_month_rent_cents, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            LEASE_COLUMNS
        );

        let lease = sqlx::query_as::<_, Lease>(&query)
            .bind(data.tenant_id)
            .bind(data.rent_cents)
            .bind(data.deposit_cents)
            .bind(data.pet_deposit_cents)
            .bind(data.last_month_rent_cents)
            .bind(data.start_date)
            .bind(data.end_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(lease)
    }

    /// Finds a lease by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM leases WHERE id = $1", LEASE_COLUMNS);

        let lease = sqlx::query_as::<_, Lease>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(lease)
    }

    /// Lists all leases of a tenant, newest first
    pub async fn list_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM leases WHERE tenant_id = $1 ORDER BY start_date DESC",
            LEASE_COLUMNS
        );

        let leases = sqlx::query_as::<_, Lease>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await?;

        Ok(leases)
    }

    /// Updates a lease
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateLease,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE leases SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.rent_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", rent_cents = ${}", bind_count));
        }
        if data.deposit_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", deposit_cents = ${}", bind_count));
        }
        if data.pet_deposit_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", pet_deposit_cents = ${}", bind_count));
        }
        if data.last_month_rent_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", last_month_rent_cents = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_date = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", LEASE_COLUMNS));

        let mut q = sqlx::query_as::<_, Lease>(&query).bind(id);

        if let Some(rent) = data.rent_cents {
            q = q.bind(rent);
        }
        if let Some(deposit) = data.deposit_cents {
            q = q.bind(deposit);
        }
        if let Some(pet_deposit) = data.pet_deposit_cents {
            q = q.bind(pet_deposit);
        }
        if let Some(last_month) = data.last_month_rent_cents {
            q = q.bind(last_month);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_opt) = data.end_date {
            q = q.bind(end_opt);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let lease = q.fetch_optional(pool).await?;

        Ok(lease)
    }

    /// Deletes a lease
    ///
    /// Payments under the lease are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leases WHERE id = $1")
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
    fn test_update_lease_default() {
        let update = UpdateLease::default();
        assert!(update.rent_cents.is_none());
        assert!(update.end_date.is_none());
        assert!(update.is_active.is_none());
    }
}
