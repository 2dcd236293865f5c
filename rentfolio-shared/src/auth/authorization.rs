/// Authorization helpers and ownership-chain checks
///
/// Every record in Rentfolio hangs off a property, and a property is
/// reachable by a user in one of two ways:
///
/// 1. **Direct**: `properties.user_id` names the user (sole-proprietor path)
/// 2. **Role**: the property is linked to an owner entity through
///    `property_owners`, and the user holds a role on that owner through
///    `user_owners`
///
/// Direct owners get full access. Role holders get whatever their strongest
/// role grants: admins manage, editors edit, viewers view.
///
/// Child records (units, tenants, leases, payments, expenses, renovations,
/// parking permits) are authorized by resolving their chain up to the owning
/// property first. A chain that does not resolve yields `NotFound`, never
/// `Forbidden`, so record ids are not disclosed to strangers.
///
/// # Example
///
/// ```no_run
/// use rentfolio_shared::auth::authorization::{require_property_access, AccessLevel};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, property_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_property_access(&pool, user_id, property_id, AccessLevel::Edit).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user_owner::{OwnerRole, UserOwner};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Resource does not exist or the user has no relationship to it
    #[error("Resource not found")]
    NotFound,

    /// User's role is insufficient for the requested operation
    #[error("Insufficient permissions: requires {required:?} role")]
    InsufficientRole {
        /// Minimum role that would have been accepted
        required: OwnerRole,
    },

    /// Operation would leave an owner entity without any admin
    #[error("Owner must retain at least one admin")]
    LastAdmin,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Access level required by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Read the record (Viewer+)
    View,

    /// Create or modify records (Editor+)
    Edit,

    /// Manage ownership, roles, and invitations (Admin only)
    Manage,
}

impl AccessLevel {
    /// Gets the minimum owner role required for this access level
    pub fn min_role(&self) -> OwnerRole {
        match self {
            AccessLevel::View => OwnerRole::Viewer,
            AccessLevel::Edit => OwnerRole::Editor,
            AccessLevel::Manage => OwnerRole::Admin,
        }
    }
}

/// Checks that a user may access a property at the given level
///
/// Direct owners pass every level. Role holders pass if their strongest
/// role across all linked owner entities meets the level's minimum.
///
/// # Errors
///
/// - `AuthzError::NotFound` if the property does not exist or the user has
///   no relationship to it
/// - `AuthzError::InsufficientRole` if the user's best role is too weak
pub async fn require_property_access(
    pool: &PgPool,
    user_id: Uuid,
    property_id: Uuid,
    level: AccessLevel,
) -> Result<(), AuthzError> {
    let property: Option<(Option<Uuid>,)> =
        sqlx::query_as("SELECT user_id FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(pool)
            .await?;

    let (direct_owner,) = property.ok_or(AuthzError::NotFound)?;

    if direct_owner == Some(user_id) {
        return Ok(());
    }

    let roles: Vec<(OwnerRole,)> = sqlx::query_as(
        r#"
        SELECT uo.role
        FROM property_owners po
        JOIN user_owners uo ON uo.owner_id = po.owner_id
        WHERE po.property_id = $1 AND uo.user_id = $2
        "#,
    )
    .bind(property_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let best_role = roles
        .iter()
        .map(|(role,)| *role)
        .max_by_key(|role| role.permission_level())
        .ok_or(AuthzError::NotFound)?;

    let required = level.min_role();
    if !best_role.has_permission(&required) {
        return Err(AuthzError::InsufficientRole { required });
    }

    Ok(())
}

/// Authorizes access to a unit by resolving its owning property
///
/// Returns the property id on success so handlers can reuse it.
pub async fn require_unit_access(
    pool: &PgPool,
    user_id: Uuid,
    unit_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT property_id FROM units WHERE id = $1")
        .bind(unit_id)
        .fetch_optional(pool)
        .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a tenant by resolving its owning property
pub async fn require_tenant_access(
    pool: &PgPool,
    user_id: Uuid,
    tenant_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT property_id FROM tenants WHERE id = $1")
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a lease via lease -> tenant -> property
pub async fn require_lease_access(
    pool: &PgPool,
    user_id: Uuid,
    lease_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT t.property_id
        FROM leases l
        JOIN tenants t ON t.id = l.tenant_id
        WHERE l.id = $1
        "#,
    )
    .bind(lease_id)
    .fetch_optional(pool)
    .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a payment via payment -> lease -> tenant -> property
pub async fn require_payment_access(
    pool: &PgPool,
    user_id: Uuid,
    payment_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT t.property_id
        FROM payments p
        JOIN leases l ON l.id = p.lease_id
        JOIN tenants t ON t.id = l.tenant_id
        WHERE p.id = $1
        "#,
    )
    .bind(payment_id)
    .fetch_optional(pool)
    .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to an expense by resolving its owning property
pub async fn require_expense_access(
    pool: &PgPool,
    user_id: Uuid,
    expense_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT property_id FROM expenses WHERE id = $1")
        .bind(expense_id)
        .fetch_optional(pool)
        .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a renovation by resolving its owning property
pub async fn require_renovation_access(
    pool: &PgPool,
    user_id: Uuid,
    renovation_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT property_id FROM renovations WHERE id = $1")
        .bind(renovation_id)
        .fetch_optional(pool)
        .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a renovation line item via item -> renovation -> property
pub async fn require_renovation_item_access(
    pool: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT r.property_id
        FROM renovation_items ri
        JOIN renovations r ON r.id = ri.renovation_id
        WHERE ri.id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Authorizes access to a parking permit by resolving its owning property
pub async fn require_permit_access(
    pool: &PgPool,
    user_id: Uuid,
    permit_id: Uuid,
    level: AccessLevel,
) -> Result<Uuid, AuthzError> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT property_id FROM parking_permits WHERE id = $1")
            .bind(permit_id)
            .fetch_optional(pool)
            .await?;

    let (property_id,) = row.ok_or(AuthzError::NotFound)?;
    require_property_access(pool, user_id, property_id, level).await?;
    Ok(property_id)
}

/// Gets a user's role on an owner entity, if any
pub async fn get_owner_role(
    pool: &PgPool,
    owner_id: Uuid,
    user_id: Uuid,
) -> Result<Option<OwnerRole>, sqlx::Error> {
    let row: Option<(OwnerRole,)> =
        sqlx::query_as("SELECT role FROM user_owners WHERE owner_id = $1 AND user_id = $2")
            .bind(owner_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(role,)| role))
}

/// Checks that a user holds at least the required role on an owner entity
///
/// # Errors
///
/// - `AuthzError::NotFound` if the user holds no role on the owner
/// - `AuthzError::InsufficientRole` if the held role is too weak
pub async fn require_owner_role(
    pool: &PgPool,
    owner_id: Uuid,
    user_id: Uuid,
    required: OwnerRole,
) -> Result<(), AuthzError> {
    let role = get_owner_role(pool, owner_id, user_id)
        .await?
        .ok_or(AuthzError::NotFound)?;

    if !role.has_permission(&required) {
        return Err(AuthzError::InsufficientRole { required });
    }

    Ok(())
}

/// Guards the at-least-one-admin invariant for an owner entity
///
/// Call before demoting or removing a member. Fails with
/// `AuthzError::LastAdmin` when the target user is the owner's only admin.
pub async fn ensure_not_last_admin(
    pool: &PgPool,
    owner_id: Uuid,
    target_user_id: Uuid,
) -> Result<(), AuthzError> {
    let target = UserOwner::find(pool, owner_id, target_user_id).await?;

    // Non-members and non-admins cannot be the last admin
    if !matches!(target, Some(ref m) if m.role == OwnerRole::Admin) {
        return Ok(());
    }

    if UserOwner::count_admins(pool, owner_id).await? <= 1 {
        return Err(AuthzError::LastAdmin);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_min_role() {
        assert_eq!(AccessLevel::View.min_role(), OwnerRole::Viewer);
        assert_eq!(AccessLevel::Edit.min_role(), OwnerRole::Editor);
        assert_eq!(AccessLevel::Manage.min_role(), OwnerRole::Admin);
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotFound;
        assert!(err.to_string().contains("not found"));

        let err = AuthzError::InsufficientRole {
            required: OwnerRole::Editor,
        };
        assert!(err.to_string().contains("Insufficient"));

        let err = AuthzError::LastAdmin;
        assert!(err.to_string().contains("at least one admin"));
    }
}
