/// Renovation project and line item models
///
/// A renovation is a project against a property with a status lifecycle and
/// an optional budget; its line items record individual purchases and labor
/// costs. Amounts are in cents.
///
/// # Status lifecycle
///
/// ```text
/// planned → in_progress → completed
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Renovation project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "renovation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RenovationStatus {
    /// Not yet started
    Planned,

    /// Work underway
    InProgress,

    /// Finished
    Completed,
}

impl RenovationStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            RenovationStatus::Planned => "planned",
            RenovationStatus::InProgress => "in_progress",
            RenovationStatus::Completed => "completed",
        }
    }
}

/// Renovation project on a property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Renovation {
    /// Unique renovation ID
    pub id: Uuid,

    /// Property being renovated
    pub property_id: Uuid,

    /// Project title (e.g., "Kitchen remodel")
    pub title: String,

    /// Current status
    pub status: RenovationStatus,

    /// When work started
    pub started_on: Option<NaiveDate>,

    /// When work completed
    pub completed_on: Option<NaiveDate>,

    /// Budget in cents, if set
    pub budget_cents: Option<i64>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a renovation project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRenovation {
    /// Property being renovated
    pub property_id: Uuid,

    /// Project title
    pub title: String,

    /// Initial status (defaults to Planned)
    #[serde(default = "default_status")]
    pub status: RenovationStatus,

    /// When work started
    pub started_on: Option<NaiveDate>,

    /// Budget in cents
    pub budget_cents: Option<i64>,
}

fn default_status() -> RenovationStatus {
    RenovationStatus::Planned
}

/// Input for updating a renovation project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRenovation {
    /// New title
    pub title: Option<String>,

    /// New status
    pub status: Option<RenovationStatus>,

    /// New start date (use Some(None) to clear)
    pub started_on: Option<Option<NaiveDate>>,

    /// New completion date (use Some(None) to clear)
    pub completed_on: Option<Option<NaiveDate>>,

    /// New budget in cents (use Some(None) to clear)
    pub budget_cents: Option<Option<i64>>,
}

/// Line item within a renovation project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RenovationItem {
    /// Unique line item ID
    pub id: Uuid,

    /// Renovation this item belongs to
    pub renovation_id: Uuid,

    /// What was bought or done
    pub description: String,

    /// Cost in cents
    pub cost_cents: i64,

    /// Purchase date, if known
    pub purchased_on: Option<NaiveDate>,

    /// Vendor name, if known
    pub vendor: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRenovationItem {
    /// Renovation this item belongs to
    pub renovation_id: Uuid,

    /// What was bought or done
    pub description: String,

    /// Cost in cents
    pub cost_cents: i64,

    /// Purchase date
    pub purchased_on: Option<NaiveDate>,

    /// Vendor name
    pub vendor: Option<String>,
}

/// Input for correcting a line item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRenovationItem {
    /// Corrected description
    pub description: Option<String>,

    /// Corrected cost in cents
    pub cost_cents: Option<i64>,

    /// New purchase date (use Some(None) to clear)
    pub purchased_on: Option<Option<NaiveDate>>,

    /// New vendor (use Some(None) to clear)
    pub vendor: Option<Option<String>>,
}

impl Renovation {
    /// Creates a renovation project
    pub async fn create(pool: &PgPool, data: CreateRenovation) -> Result<Self, sqlx::Error> {
        let renovation = sqlx::query_as::<_, Renovation>(
            r#"
            INSERT INTO renovations (property_id, title, status, started_on, budget_cents)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, property_id, title, status, started_on, completed_on, budget_cents,
                      created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.title)
        .bind(data.status)
        .bind(data.started_on)
        .bind(data.budget_cents)
        .fetch_one(pool)
        .await?;

        Ok(renovation)
    }

    /// Finds a renovation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let renovation = sqlx::query_as::<_, Renovation>(
            r#"
            SELECT id, property_id, title, status, started_on, completed_on, budget_cents,
                   created_at, updated_at
            FROM renovations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(renovation)
    }

    /// Lists renovations on a property, newest first
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let renovations = sqlx::query_as::<_, Renovation>(
            r#"
            SELECT id, property_id, title, status, started_on, completed_on, budget_cents,
                   created_at, updated_at
            FROM renovations
            WHERE property_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(renovations)
    }

    /// Updates a renovation project
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateRenovation,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE renovations SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.started_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", started_on = ${}", bind_count));
        }
        if data.completed_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed_on = ${}", bind_count));
        }
        if data.budget_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", budget_cents = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, property_id, title, status, started_on, completed_on, budget_cents, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Renovation>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(started_opt) = data.started_on {
            q = q.bind(started_opt);
        }
        if let Some(completed_opt) = data.completed_on {
            q = q.bind(completed_opt);
        }
        if let Some(budget_opt) = data.budget_cents {
            q = q.bind(budget_opt);
        }

        let renovation = q.fetch_optional(pool).await?;

        Ok(renovation)
    }

    /// Deletes a renovation project
    ///
    /// Line items are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM renovations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sums line item costs for a renovation, in cents
    pub async fn total_cost_cents(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(cost_cents), 0) FROM renovation_items WHERE renovation_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }
}

impl RenovationItem {
    /// Adds a line item to a renovation
    pub async fn create(pool: &PgPool, data: CreateRenovationItem) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, RenovationItem>(
            r#"
            INSERT INTO renovation_items (renovation_id, description, cost_cents, purchased_on, vendor)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, renovation_id, description, cost_cents, purchased_on, vendor, created_at
            "#,
        )
        .bind(data.renovation_id)
        .bind(data.description)
        .bind(data.cost_cents)
        .bind(data.purchased_on)
        .bind(data.vendor)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Lists line items of a renovation
    pub async fn list_by_renovation(
        pool: &PgPool,
        renovation_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, RenovationItem>(
            r#"
            SELECT id, renovation_id, description, cost_cents, purchased_on, vendor, created_at
            FROM renovation_items
            WHERE renovation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(renovation_id)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Corrects a line item
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateRenovationItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE renovation_items SET id = id");
        let mut bind_count = 1;

        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.cost_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", cost_cents = ${}", bind_count));
        }
        if data.purchased_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", purchased_on = ${}", bind_count));
        }
        if data.vendor.is_some() {
            bind_count += 1;
            query.push_str(&format!(", vendor = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, renovation_id, description, cost_cents, purchased_on, vendor, created_at",
        );

        let mut q = sqlx::query_as::<_, RenovationItem>(&query).bind(id);

        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(cost) = data.cost_cents {
            q = q.bind(cost);
        }
        if let Some(purchased_opt) = data.purchased_on {
            q = q.bind(purchased_opt);
        }
        if let Some(vendor_opt) = data.vendor {
            q = q.bind(vendor_opt);
        }

        let item = q.fetch_optional(pool).await?;

        Ok(item)
    }

    /// Lists line items across a property's renovations within a date range
    /// (inclusive)
    ///
    /// Items without a purchase date are excluded. Used by the financial
    /// report builder.
    pub async fn list_for_property_between(
        pool: &PgPool,
        property_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, RenovationItem>(
            r#"
            SELECT ri.id, ri.renovation_id, ri.description, ri.cost_cents, ri.purchased_on,
                   ri.vendor, ri.created_at
            FROM renovation_items ri
            JOIN renovations r ON r.id = ri.renovation_id
            WHERE r.property_id = $1 AND ri.purchased_on BETWEEN $2 AND $3
            ORDER BY ri.purchased_on ASC
            "#,
        )
        .bind(property_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Deletes a line item
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM renovation_items WHERE id = $1")
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
    fn test_renovation_status_as_str() {
        assert_eq!(RenovationStatus::Planned.as_str(), "planned");
        assert_eq!(RenovationStatus::InProgress.as_str(), "in_progress");
        assert_eq!(RenovationStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_default_status() {
        assert_eq!(default_status(), RenovationStatus::Planned);
    }
}
