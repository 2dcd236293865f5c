/// Payment model and database operations
///
/// Payments record rent received against a lease. Amounts are in cents.
/// `list_for_property_between` feeds the financial report builder.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paper check
    Check,

    /// Cash
    Cash,

    /// Bank or wire transfer
    Transfer,

    /// Anything else
    Other,
}

impl PaymentMethod {
    /// Converts method to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Check => "check",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Other => "other",
        }
    }
}

/// Rent payment against a lease
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Unique payment ID
    pub id: Uuid,

    /// Lease this payment applies to
    pub lease_id: Uuid,

    /// Amount received in cents
    pub amount_cents: i64,

    /// Date the payment was received
    pub paid_on: NaiveDate,

    /// Payment method
    pub method: PaymentMethod,

    /// Free-form memo
    pub memo: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    /// Lease this payment applies to
    pub lease_id: Uuid,

    /// Amount received in cents
    pub amount_cents: i64,

    /// Date the payment was received
    pub paid_on: NaiveDate,

    /// Payment method (defaults to Other)
    #[serde(default = "default_method")]
    pub method: PaymentMethod,

    /// Free-form memo
    pub memo: Option<String>,
}

fn default_method() -> PaymentMethod {
    PaymentMethod::Other
}

/// Input for correcting a payment record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePayment {
    /// Corrected amount in cents
    pub amount_cents: Option<i64>,

    /// Corrected date
    pub paid_on: Option<NaiveDate>,

    /// Corrected method
    pub method: Option<PaymentMethod>,

    /// New memo (use Some(None) to clear)
    pub memo: Option<Option<String>>,
}

impl Payment {
    /// Records a payment
    pub async fn create(pool: &PgPool, data: CreatePayment) -> Result<Self, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (lease_id, amount_cents, paid_on, method, memo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, lease_id, amount_cents, paid_on, method, memo, created_at
            "#,
        )
        .bind(data.lease_id)
        .bind(data.amount_cents)
        .bind(data.paid_on)
        .bind(data.method)
        .bind(data.memo)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    /// Lists payments on a lease, newest first
    pub async fn list_by_lease(pool: &PgPool, lease_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, lease_id, amount_cents, paid_on, method, memo, created_at
            FROM payments
            WHERE lease_id = $1
            ORDER BY paid_on DESC
            "#,
        )
        .bind(lease_id)
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }

    /// Lists payments across a property within a date range (inclusive)
    ///
    /// Walks payment -> lease -> tenant to scope by property. Used by the
    /// financial report builder.
    pub async fn list_for_property_between(
        pool: &PgPool,
        property_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.id, p.lease_id, p.amount_cents, p.paid_on, p.method, p.memo, p.created_at
            FROM payments p
            JOIN leases l ON l.id = p.lease_id
            JOIN tenants t ON t.id = l.tenant_id
            WHERE t.property_id = $1 AND p.paid_on BETWEEN $2 AND $3
            ORDER BY p.paid_on ASC
            "#,
        )
        .bind(property_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }

    /// Corrects a payment record
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePayment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE payments SET id = id");
        let mut bind_count = 1;

        if data.amount_cents.is_some() {
            bind_count += 1;
            query.push_str(&format!(", amount_cents = ${}", bind_count));
        }
        if data.paid_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", paid_on = ${}", bind_count));
        }
        if data.method.is_some() {
            bind_count += 1;
            query.push_str(&format!(", method = ${}", bind_count));
        }
        if data.memo.is_some() {
            bind_count += 1;
            query.push_str(&format!(", memo = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, lease_id, amount_cents, paid_on, method, memo, created_at",
        );

        let mut q = sqlx::query_as::<_, Payment>(&query).bind(id);

        if let Some(amount) = data.amount_cents {
            q = q.bind(amount);
        }
        if let Some(paid_on) = data.paid_on {
            q = q.bind(paid_on);
        }
        if let Some(method) = data.method {
            q = q.bind(method);
        }
        if let Some(memo_opt) = data.memo {
            q = q.bind(memo_opt);
        }

        let payment = q.fetch_optional(pool).await?;

        Ok(payment)
    }

    /// Deletes a payment record
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
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
    fn test_payment_method_as_str() {
        assert_eq!(PaymentMethod::Check.as_str(), "check");
        assert_eq!(PaymentMethod::Cash.as_str(), "cash");
        assert_eq!(PaymentMethod::Transfer.as_str(), "transfer");
        assert_eq!(PaymentMethod::Other.as_str(), "other");
    }

    #[test]
    fn test_default_method() {
        assert_eq!(default_method(), PaymentMethod::Other);
    }
}
