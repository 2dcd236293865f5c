/// Database models for Rentfolio
///
/// Each submodule pairs a row struct with its CRUD operations. All
/// operations take a `&PgPool` and return `Result<_, sqlx::Error>`; the API
/// layer translates those errors into HTTP responses.
///
/// # Entity relationships
///
/// ```text
/// users ─┬─ properties (direct user_id)
///        └─ user_owners ── owners ── property_owners ── properties
///
/// properties ─┬─ units
///             ├─ tenants ── leases ── payments
///             ├─ expenses
///             ├─ renovations ── renovation_items
///             └─ parking_permits ── parking_activity
///
/// owners ── invitations
/// ```

pub mod expense;
pub mod invitation;
pub mod lease;
pub mod owner;
pub mod parking;
pub mod payment;
pub mod property;
pub mod renovation;
pub mod tenant;
pub mod unit;
pub mod user;
pub mod user_owner;
