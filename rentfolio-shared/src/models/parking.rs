/// Parking permit and activity models
///
/// Parking permits are issued per property; the activity log records
/// issuance, renewals, violations, and revocations against a permit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of event recorded against a permit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "parking_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParkingAction {
    /// Permit issued
    Issued,

    /// Permit renewed
    Renewed,

    /// Violation recorded
    Violation,

    /// Permit revoked
    Revoked,
}

impl ParkingAction {
    /// Converts action to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkingAction::Issued => "issued",
            ParkingAction::Renewed => "renewed",
            ParkingAction::Violation => "violation",
            ParkingAction::Revoked => "revoked",
        }
    }
}

/// Parking permit issued for a property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParkingPermit {
    /// Unique permit ID
    pub id: Uuid,

    /// Property the permit is issued for
    pub property_id: Uuid,

    /// Printed permit number
    pub permit_number: String,

    /// Name of the permit holder
    pub holder_name: String,

    /// Vehicle license plate, if recorded
    pub vehicle_plate: Option<String>,

    /// Date of issue
    pub issued_on: NaiveDate,

    /// Expiry date (None for open-ended)
    pub expires_on: Option<NaiveDate>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for issuing a parking permit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParkingPermit {
    /// Property the permit is issued for
    pub property_id: Uuid,

    /// Printed permit number
    pub permit_number: String,

    /// Name of the permit holder
    pub holder_name: String,

    /// Vehicle license plate
    pub vehicle_plate: Option<String>,

    /// Date of issue
    pub issued_on: NaiveDate,

    /// Expiry date
    pub expires_on: Option<NaiveDate>,
}

/// Event in a permit's activity log
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParkingActivity {
    /// Unique activity ID
    pub id: Uuid,

    /// Permit the event belongs to
    pub permit_id: Uuid,

    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,

    /// Kind of event
    pub action: ParkingAction,

    /// Free-form note
    pub note: Option<String>,
}

impl ParkingPermit {
    /// Issues a new parking permit and logs the issuance
    ///
    /// The permit and its initial `issued` activity entry are written in a
    /// single transaction.
    pub async fn create(pool: &PgPool, data: CreateParkingPermit) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let permit = sqlx::query_as::<_, ParkingPermit>(
            r#"
            INSERT INTO parking_permits (property_id, permit_number, holder_name, vehicle_plate,
                                         issued_on, expires_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, property_id, permit_number, holder_name, vehicle_plate,
                      issued_on, expires_on, created_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.permit_number)
        .bind(data.holder_name)
        .bind(data.vehicle_plate)
        .bind(data.issued_on)
        .bind(data.expires_on)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO parking_activity (permit_id, action) VALUES ($1, $2)")
            .bind(permit.id)
            .bind(ParkingAction::Issued)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(permit)
    }

    /// Lists permits on a property, newest first
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let permits = sqlx::query_as::<_, ParkingPermit>(
            r#"
            SELECT id, property_id, permit_number, holder_name, vehicle_plate,
                   issued_on, expires_on, created_at
            FROM parking_permits
            WHERE property_id = $1
            ORDER BY issued_on DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(permits)
    }

    /// Deletes a permit
    ///
    /// Activity log entries are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parking_permits WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl ParkingActivity {
    /// Records an event against a permit
    pub async fn create(
        pool: &PgPool,
        permit_id: Uuid,
        action: ParkingAction,
        note: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let activity = sqlx::query_as::<_, ParkingActivity>(
            r#"
            INSERT INTO parking_activity (permit_id, action, note)
            VALUES ($1, $2, $3)
            RETURNING id, permit_id, recorded_at, action, note
            "#,
        )
        .bind(permit_id)
        .bind(action)
        .bind(note)
        .fetch_one(pool)
        .await?;

        Ok(activity)
    }

    /// Lists a permit's activity log, newest first
    pub async fn list_by_permit(pool: &PgPool, permit_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let activity = sqlx::query_as::<_, ParkingActivity>(
            r#"
            SELECT id, permit_id, recorded_at, action, note
            FROM parking_activity
            WHERE permit_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(permit_id)
        .fetch_all(pool)
        .await?;

        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parking_action_as_str() {
        assert_eq!(ParkingAction::Issued.as_str(), "issued");
        assert_eq!(ParkingAction::Renewed.as_str(), "renewed");
        assert_eq!(ParkingAction::Violation.as_str(), "violation");
        assert_eq!(ParkingAction::Revoked.as_str(), "revoked");
    }
}
