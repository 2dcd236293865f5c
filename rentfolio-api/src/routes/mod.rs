/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `properties`: Property CRUD
/// - `units`: Unit CRUD
/// - `tenants`: Tenant CRUD
/// - `leases`: Lease CRUD
/// - `payments`: Rent payment endpoints
/// - `expenses`: Expense endpoints
/// - `renovations`: Renovation projects and line items
/// - `parking`: Parking permits and activity log
/// - `owners`: Owner entities, membership, property links
/// - `invitations`: Owner membership invitations
/// - `reports`: Financial reports (JSON and CSV)
/// - `search`: Global search

pub mod auth;
pub mod expenses;
pub mod health;
pub mod invitations;
pub mod leases;
pub mod owners;
pub mod parking;
pub mod payments;
pub mod properties;
pub mod renovations;
pub mod reports;
pub mod search;
pub mod tenants;
pub mod units;
