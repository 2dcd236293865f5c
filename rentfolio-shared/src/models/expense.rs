/// Expense model and database operations
///
/// Expenses record money spent on a property, bucketed by category for
/// reporting. Amounts are in cents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Expense category for report bucketing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "expense_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Repairs (broken fixtures, damage)
    Repairs,

    /// Routine maintenance (landscaping, HVAC service)
    Maintenance,

    /// Property taxes
    Taxes,

    /// Insurance premiums
    Insurance,

    /// Utilities paid by the landlord
    Utilities,

    /// Property management fees
    Management,

    /// Everything else
    Other,
}

impl ExpenseCategory {
    /// Converts category to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Repairs => "repairs",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Taxes => "taxes",
            ExpenseCategory::Insurance => "insurance",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Management => "management",
            ExpenseCategory::Other => "other",
        }
    }

    /// All categories in report display order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            ExpenseCategory::Repairs,
            ExpenseCategory::Maintenance,
            ExpenseCategory::Taxes,
            ExpenseCategory::Insurance,
            ExpenseCategory::Utilities,
            ExpenseCategory::Management,
            ExpenseCategory::Other,
        ]
    }
}

/// Expense against a property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    /// Unique expense ID
    pub id: Uuid,

    /// Property the expense was incurred on
    pub property_id: Uuid,

    /// Amount in cents
    pub amount_cents: i64,

    /// Date the expense was incurred
    pub incurred_on: NaiveDate,

    /// Category for report bucketing
    pub category: ExpenseCategory,

    /// Free-form description
    pub description: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for recording an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpense {
    /// Property the expense was incurred on
    pub property_id: Uuid,

    /// Amount in cents
    pub amount_cents: i64,

    /// Date the expense was incurred
    pub incurred_on: NaiveDate,

    /// Category (defaults to Other)
    #[serde(default = "default_category")]
    pub category: ExpenseCategory,

    /// Free-form description
    pub description: Option<String>,
}

fn default_category() -> ExpenseCategory {
    ExpenseCategory::Other
}

/// Input for correcting an expense record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpense {
    /// Corrected amount in cents
    pub amount_cents: Option<i64>,

    /// Corrected date
    pub incurred_on: Option<NaiveDate>,

    /// Corrected category
    pub category: Option<ExpenseCategory>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl Expense {
    /// Records an expense
    pub async fn create(pool: &PgPool, data: CreateExpense) -> Result<Self, sqlx::Error> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (property_id, amount_cents, incurred_on, category, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, property_id, amount_cents, incurred_on, category, description,
                      created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.amount_cents)
        .bind(data.incurred_on)
        .bind(data.category)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses on a property, newest first
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, property_id, amount_cents, incurred_on, category, description,
                   created_at, updated_at
            FROM expenses
            WHERE property_id = $1
            ORDER BY incurred_on DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(expenses)
    }

    /// Lists expenses on a property within a date range (inclusive)
    ///
    /// Used by the financial report builder.
    pub async fn list_for_property_between(
        pool: &PgPool,
        property_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, property_id, amount_cents, incurred_on, category, description,
                   created_at, updated_at
            FROM expenses
            WHERE property_id = $1 AND incurred_on BETWEEN $2 AND $3
            ORDER BY incurred_on ASC
            "#,
        )
        .bind(property_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(expenses)
    }

    /// Corrects an expense record
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateExpense,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE expenses SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.amount_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", amount_cents = ${}", bind_count));
        }
        if data.incurred_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", incurred_on = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, property_id, amount_cents, incurred_on, category, description, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Expense>(&query).bind(id);

        if let Some(amount) = data.amount_cents {
            q = q.bind(amount);
        }
        if let Some(incurred_on) = data.incurred_on {
            q = q.bind(incurred_on);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(desc_opt) = data.description {
            q = q.bind(desc_opt);
        }

        let expense = q.fetch_optional(pool).await?;

        Ok(expense)
    }

    /// Deletes an expense record
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
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
    fn test_expense_category_as_str() {
        assert_eq!(ExpenseCategory::Repairs.as_str(), "repairs");
        assert_eq!(ExpenseCategory::Maintenance.as_str(), "maintenance");
        assert_eq!(ExpenseCategory::Taxes.as_str(), "taxes");
        assert_eq!(ExpenseCategory::Insurance.as_str(), "insurance");
        assert_eq!(ExpenseCategory::Utilities.as_str(), "utilities");
        assert_eq!(ExpenseCategory::Management.as_str(), "management");
        assert_eq!(ExpenseCategory::Other.as_str(), "other");
    }

    #[test]
    fn test_all_categories_ordered() {
        let all = ExpenseCategory::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], ExpenseCategory::Repairs);
        assert_eq!(all[6], ExpenseCategory::Other);
    }

    #[test]
    fn test_default_category() {
        assert_eq!(default_category(), ExpenseCategory::Other);
    }
}
