/// Invitation model and database operations
///
/// Invitations let an owner admin bring another user onto the owner entity
/// at a chosen role. Only the SHA-256 hash of the token is stored; the
/// plaintext is returned once at creation and travels in the invite link.
///
/// Tokens are single-use and time-limited. Acceptance runs in a
/// transaction with the invitation row locked, so a token raced from two
/// sessions grants membership exactly once.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
///     email CITEXT NOT NULL,
///     role owner_role NOT NULL DEFAULT 'viewer',
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     accepted_at TIMESTAMPTZ,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::{generate_invitation_token, hash_token, validate_token_format};

use super::user_owner::OwnerRole;

/// Default invitation lifetime
const DEFAULT_TTL_DAYS: i64 = 7;

/// Error type for invitation acceptance
#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    /// Token is malformed or unknown
    #[error("Invalid invitation token")]
    InvalidToken,

    /// Token exists but has passed its expiry
    #[error("Invitation has expired")]
    Expired,

    /// Token has already been used
    #[error("Invitation has already been accepted")]
    AlreadyAccepted,

    /// The accepting user already holds a role on the owner
    #[error("User is already a member of this owner")]
    AlreadyMember,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Pending or accepted invitation to join an owner entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Owner entity the invite grants membership of
    pub owner_id: Uuid,

    /// Email address the invite was addressed to
    pub email: String,

    /// Role granted on acceptance
    pub role: OwnerRole,

    /// SHA-256 hex hash of the token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the token stops being valid
    pub expires_at: DateTime<Utc>,

    /// When the invite was accepted (None while pending)
    pub accepted_at: Option<DateTime<Utc>>,

    /// Admin who created the invite (nullable if the user was deleted)
    pub created_by: Option<Uuid>,

    /// When the invite was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Owner entity to invite into
    pub owner_id: Uuid,

    /// Invitee email address
    pub email: String,

    /// Role granted on acceptance (defaults to Viewer)
    #[serde(default = "default_role")]
    pub role: OwnerRole,

    /// Admin creating the invite
    pub created_by: Uuid,
}

fn default_role() -> OwnerRole {
    OwnerRole::Viewer
}

impl Invitation {
    /// Creates an invitation and returns it with the plaintext token
    ///
    /// The plaintext token appears only in this return value; persist the
    /// hash, hand the token to the invitee, and forget it.
    pub async fn create(
        pool: &PgPool,
        data: CreateInvitation,
    ) -> Result<(Self, String), sqlx::Error> {
        let (token, token_hash) = generate_invitation_token();
        let expires_at = Utc::now() + Duration::days(DEFAULT_TTL_DAYS);

        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (owner_id, email, role, token_hash, expires_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, email, role, token_hash, expires_at, accepted_at,
                      created_by, created_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.email)
        .bind(data.role)
        .bind(token_hash)
        .bind(expires_at)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok((invitation, token))
    }

    /// Finds an invitation by its plaintext token
    ///
    /// Malformed tokens short-circuit to None without touching the
    /// database.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        if !validate_token_format(token) {
            return Ok(None);
        }

        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, owner_id, email, role, token_hash, expires_at, accepted_at,
                   created_by, created_at
            FROM invitations
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Accepts an invitation, granting the user a role on the owner
    ///
    /// Locks the invitation row, verifies it is pending and unexpired,
    /// inserts the membership, and stamps `accepted_at`, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// - `InvitationError::InvalidToken` for malformed or unknown tokens
    /// - `InvitationError::Expired` past the expiry timestamp
    /// - `InvitationError::AlreadyAccepted` for reused tokens
    /// - `InvitationError::AlreadyMember` if the user already holds a role
    pub async fn accept(
        pool: &PgPool,
        token: &str,
        user_id: Uuid,
    ) -> Result<Self, InvitationError> {
        if !validate_token_format(token) {
            return Err(InvitationError::InvalidToken);
        }

        let mut tx = pool.begin().await?;

        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, owner_id, email, role, token_hash, expires_at, accepted_at,
                   created_by, created_at
            FROM invitations
            WHERE token_hash = $1
            FOR UPDATE
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(InvitationError::InvalidToken)?;

        if invitation.accepted_at.is_some() {
            return Err(InvitationError::AlreadyAccepted);
        }
        if invitation.expires_at <= Utc::now() {
            return Err(InvitationError::Expired);
        }

        let already_member: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_owners WHERE owner_id = $1 AND user_id = $2)",
        )
        .bind(invitation.owner_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_member {
            return Err(InvitationError::AlreadyMember);
        }

        sqlx::query("INSERT INTO user_owners (owner_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(invitation.owner_id)
            .bind(user_id)
            .bind(invitation.role)
            .execute(&mut *tx)
            .await?;

        let accepted = sqlx::query_as::<_, Invitation>(
            r#"
            UPDATE invitations
            SET accepted_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, email, role, token_hash, expires_at, accepted_at,
                      created_by, created_at
            "#,
        )
        .bind(invitation.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(accepted)
    }

    /// Lists invitations for an owner entity, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, owner_id, email, role, token_hash, expires_at, accepted_at,
                   created_by, created_at
            FROM invitations
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Finds an invitation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, owner_id, email, role, token_hash, expires_at, accepted_at,
                   created_by, created_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Revokes (deletes) a pending invitation
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the invitation has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether the invitation has been used
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invitation(expires_at: DateTime<Utc>, accepted_at: Option<DateTime<Utc>>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            email: "invitee@example.com".to_string(),
            role: OwnerRole::Viewer,
            token_hash: "0".repeat(64),
            expires_at,
            accepted_at,
            created_by: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        let pending = sample_invitation(Utc::now() + Duration::days(1), None);
        assert!(!pending.is_expired());

        let stale = sample_invitation(Utc::now() - Duration::hours(1), None);
        assert!(stale.is_expired());
    }

    #[test]
    fn test_is_accepted() {
        let pending = sample_invitation(Utc::now() + Duration::days(1), None);
        assert!(!pending.is_accepted());

        let used = sample_invitation(Utc::now() + Duration::days(1), Some(Utc::now()));
        assert!(used.is_accepted());
    }

    #[test]
    fn test_default_role() {
        assert_eq!(default_role(), OwnerRole::Viewer);
    }
}
