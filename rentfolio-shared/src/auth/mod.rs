/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`token`]: Invitation token generation and validation
/// - [`middleware`]: Axum middleware that turns a Bearer token into an `AuthContext`
/// - [`authorization`]: Ownership-chain and owner-role checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with issuer and expiration checks
/// - **Invitation Tokens**: Secure random generation; only the SHA-256 hash
///   is stored, and presented tokens are matched by hash lookup

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod token;
