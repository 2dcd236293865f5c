/// UserOwner model: role memberships on owner entities
///
/// Many-to-many relationship between users and owner entities with
/// role-based access control.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE owner_role AS ENUM ('admin', 'editor', 'viewer');
///
/// CREATE TABLE user_owners (
///     owner_id UUID NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role owner_role NOT NULL DEFAULT 'viewer',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (owner_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **admin**: manage properties, members, roles, and invitations
/// - **editor**: create and modify records on linked properties
/// - **viewer**: read-only access
///
/// Every owner entity must keep at least one admin; `delete` and
/// `update_role` callers enforce this via
/// `auth::authorization::ensure_not_last_admin`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role a user holds on an owner entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "owner_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OwnerRole {
    /// Manage properties, members, roles, and invitations
    Admin,

    /// Create and modify records on linked properties
    Editor,

    /// Read-only access
    Viewer,
}

impl OwnerRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerRole::Admin => "admin",
            OwnerRole::Editor => "editor",
            OwnerRole::Viewer => "viewer",
        }
    }

    /// Can invite members and change roles
    pub fn can_manage_members(&self) -> bool {
        matches!(self, OwnerRole::Admin)
    }

    /// Can create and modify records on linked properties
    pub fn can_edit(&self) -> bool {
        matches!(self, OwnerRole::Admin | OwnerRole::Editor)
    }

    /// Checks if this role meets the required role
    ///
    /// Hierarchy: Admin > Editor > Viewer
    pub fn has_permission(&self, required: &OwnerRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    /// Returns numeric permission level for comparison
    pub fn permission_level(&self) -> u8 {
        match self {
            OwnerRole::Admin => 3,
            OwnerRole::Editor => 2,
            OwnerRole::Viewer => 1,
        }
    }
}

/// Membership of a user on an owner entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserOwner {
    /// Owner entity ID
    pub owner_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the owner entity
    pub role: OwnerRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl UserOwner {
    /// Finds a specific membership by owner and user
    pub async fn find(
        pool: &PgPool,
        owner_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, UserOwner>(
            r#"
            SELECT owner_id, user_id, role, created_at
            FROM user_owners
            WHERE owner_id = $1 AND user_id = $2
            "#,
        )
        .bind(owner_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Updates a user's role on an owner entity
    ///
    /// Callers must check the at-least-one-admin invariant first when
    /// demoting an admin.
    pub async fn update_role(
        pool: &PgPool,
        owner_id: Uuid,
        user_id: Uuid,
        role: OwnerRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, UserOwner>(
            r#"
            UPDATE user_owners
            SET role = $3
            WHERE owner_id = $1 AND user_id = $2
            RETURNING owner_id, user_id, role, created_at
            "#,
        )
        .bind(owner_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes user from an owner entity)
    ///
    /// Callers must check the at-least-one-admin invariant first when
    /// removing an admin.
    pub async fn delete(pool: &PgPool, owner_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_owners WHERE owner_id = $1 AND user_id = $2")
            .bind(owner_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of an owner entity
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, UserOwner>(
            r#"
            SELECT owner_id, user_id, role, created_at
            FROM user_owners
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Counts admins on an owner entity
    pub async fn count_admins(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_owners WHERE owner_id = $1 AND role = 'admin'")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_role_as_str() {
        assert_eq!(OwnerRole::Admin.as_str(), "admin");
        assert_eq!(OwnerRole::Editor.as_str(), "editor");
        assert_eq!(OwnerRole::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_role_permissions() {
        assert!(OwnerRole::Admin.can_manage_members());
        assert!(OwnerRole::Admin.can_edit());

        assert!(!OwnerRole::Editor.can_manage_members());
        assert!(OwnerRole::Editor.can_edit());

        assert!(!OwnerRole::Viewer.can_manage_members());
        assert!(!OwnerRole::Viewer.can_edit());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(OwnerRole::Admin.has_permission(&OwnerRole::Viewer));
        assert!(OwnerRole::Admin.has_permission(&OwnerRole::Editor));
        assert!(OwnerRole::Admin.has_permission(&OwnerRole::Admin));

        assert!(OwnerRole::Editor.has_permission(&OwnerRole::Viewer));
        assert!(!OwnerRole::Editor.has_permission(&OwnerRole::Admin));

        assert!(OwnerRole::Viewer.has_permission(&OwnerRole::Viewer));
        assert!(!OwnerRole::Viewer.has_permission(&OwnerRole::Editor));
    }
}
