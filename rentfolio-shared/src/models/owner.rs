/// Owner model and property-owner links
///
/// An owner entity is a person or LLC that holds title to properties. Users
/// gain access to those properties through roles on the owner entity (see
/// `models::user_owner`). The `property_owners` join table links owners to
/// properties and records each owner's percentage stake.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE owner_kind AS ENUM ('individual', 'llc');
///
/// CREATE TABLE owners (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     kind owner_kind NOT NULL DEFAULT 'individual',
///     contact_email CITEXT,
///     notes TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE property_owners (
///     property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
///     owner_id UUID NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
///     ownership_percent DOUBLE PRECISION NOT NULL DEFAULT 100.0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (property_id, owner_id)
/// );
/// ```
///
/// Ownership percentages are informational and deliberately not constrained
/// to sum to 100 per property; partial records are common during data entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user_owner::OwnerRole;

/// Legal form of an owner entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "owner_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// Natural person
    Individual,

    /// Limited liability company
    Llc,
}

impl OwnerKind {
    /// Converts kind to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Individual => "individual",
            OwnerKind::Llc => "llc",
        }
    }
}

/// Owner entity holding title to properties
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Owner {
    /// Unique owner ID
    pub id: Uuid,

    /// Display name (person or company name)
    pub name: String,

    /// Legal form
    pub kind: OwnerKind,

    /// Contact email for the entity, if any
    pub contact_email: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the owner was created
    pub created_at: DateTime<Utc>,

    /// When the owner was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new owner entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOwner {
    /// Display name
    pub name: String,

    /// Legal form (defaults to Individual)
    #[serde(default = "default_kind")]
    pub kind: OwnerKind,

    /// Contact email
    pub contact_email: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

fn default_kind() -> OwnerKind {
    OwnerKind::Individual
}

/// Input for updating an owner entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOwner {
    /// New display name
    pub name: Option<String>,

    /// New legal form
    pub kind: Option<OwnerKind>,

    /// New contact email (use Some(None) to clear)
    pub contact_email: Option<Option<String>>,

    /// New notes (use Some(None) to clear)
    pub notes: Option<Option<String>>,
}

/// Link between a property and an owner entity with a percentage stake
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyOwner {
    /// Property ID
    pub property_id: Uuid,

    /// Owner entity ID
    pub owner_id: Uuid,

    /// Percentage stake (informational, not constrained to sum to 100)
    pub ownership_percent: f64,

    /// When the link was created
    pub created_at: DateTime<Utc>,
}

impl Owner {
    /// Creates an owner entity and makes the creating user its admin
    ///
    /// Runs in a transaction so an owner can never exist without an admin,
    /// which is the invariant the rest of the role system relies on.
    pub async fn create_with_admin(
        pool: &PgPool,
        data: CreateOwner,
        creator_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owner = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (name, kind, contact_email, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, kind, contact_email, notes, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.kind)
        .bind(data.contact_email)
        .bind(data.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_owners (owner_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(owner.id)
            .bind(creator_id)
            .bind(OwnerRole::Admin)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(owner)
    }

    /// Finds an owner by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            SELECT id, name, kind, contact_email, notes, created_at, updated_at
            FROM owners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(owner)
    }

    /// Lists owner entities the user holds any role on
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let owners = sqlx::query_as::<_, Owner>(
            r#"
            SELECT o.id, o.name, o.kind, o.contact_email, o.notes, o.created_at, o.updated_at
            FROM owners o
            JOIN user_owners uo ON uo.owner_id = o.id
            WHERE uo.user_id = $1
            ORDER BY o.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(owners)
    }

    /// Updates an owner entity
    ///
    /// Only non-None fields in `data` are written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateOwner,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE owners SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.kind.is_some() {
            bind_count += 1;
            query.push_str(&format!(", kind = ${}", bind_count));
        }
        if data.contact_email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", contact_email = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", notes = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, kind, contact_email, notes, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Owner>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(kind) = data.kind {
            q = q.bind(kind);
        }
        if let Some(email_opt) = data.contact_email {
            q = q.bind(email_opt);
        }
        if let Some(notes_opt) = data.notes {
            q = q.bind(notes_opt);
        }

        let owner = q.fetch_optional(pool).await?;

        Ok(owner)
    }

    /// Deletes an owner entity
    ///
    /// Memberships, property links, and invitations are removed by CASCADE.
    /// Properties themselves survive; they simply lose this owner link.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl PropertyOwner {
    /// Links an owner entity to a property with a percentage stake
    pub async fn create(
        pool: &PgPool,
        property_id: Uuid,
        owner_id: Uuid,
        ownership_percent: f64,
    ) -> Result<Self, sqlx::Error> {
        let link = sqlx::query_as::<_, PropertyOwner>(
            r#"
            INSERT INTO property_owners (property_id, owner_id, ownership_percent)
            VALUES ($1, $2, $3)
            RETURNING property_id, owner_id, ownership_percent, created_at
            "#,
        )
        .bind(property_id)
        .bind(owner_id)
        .bind(ownership_percent)
        .fetch_one(pool)
        .await?;

        Ok(link)
    }

    /// Updates the percentage stake on an existing link
    pub async fn update_percent(
        pool: &PgPool,
        property_id: Uuid,
        owner_id: Uuid,
        ownership_percent: f64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let link = sqlx::query_as::<_, PropertyOwner>(
            r#"
            UPDATE property_owners
            SET ownership_percent = $3
            WHERE property_id = $1 AND owner_id = $2
            RETURNING property_id, owner_id, ownership_percent, created_at
            "#,
        )
        .bind(property_id)
        .bind(owner_id)
        .bind(ownership_percent)
        .fetch_optional(pool)
        .await?;

        Ok(link)
    }

    /// Removes the link between a property and an owner entity
    pub async fn delete(
        pool: &PgPool,
        property_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM property_owners WHERE property_id = $1 AND owner_id = $2")
                .bind(property_id)
                .bind(owner_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists owner links for a property
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let links = sqlx::query_as::<_, PropertyOwner>(
            r#"
            SELECT property_id, owner_id, ownership_percent, created_at
            FROM property_owners
            WHERE property_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(links)
    }

    /// Lists property links for an owner entity
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let links = sqlx::query_as::<_, PropertyOwner>(
            r#"
            SELECT property_id, owner_id, ownership_percent, created_at
            FROM property_owners
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_kind_as_str() {
        assert_eq!(OwnerKind::Individual.as_str(), "individual");
        assert_eq!(OwnerKind::Llc.as_str(), "llc");
    }

    #[test]
    fn test_default_kind() {
        assert_eq!(default_kind(), OwnerKind::Individual);
    }

    #[test]
    fn test_update_owner_default() {
        let update = UpdateOwner::default();
        assert!(update.name.is_none());
        assert!(update.kind.is_none());
        assert!(update.contact_email.is_none());
        assert!(update.notes.is_none());
    }
}
