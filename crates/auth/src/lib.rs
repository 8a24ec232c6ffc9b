//! Atrium - RBAC domain types
//!
//! Roles, permissions, principals, and identity-provider adapters for the
//! Atrium portal client.
//!
//! # Overview
//!
//! Four roles, permission sets by explicit membership:
//!
//! | Role | Typical capabilities |
//! |------|----------------------|
//! | `Viewer` | Browse published content |
//! | `Student` | Submit publications, comment |
//! | `Staff` | Moderate, publish posts, run events |
//! | `Administrator` | Manage users and site settings |
//!
//! The role of record lives in the backend; the identity token carries an
//! advisory role claim used as a fallback. Permission sets are always
//! fetched from the backend - they are never derived from role rank.

mod claims;
mod error;
mod identity;
mod jwt;
mod permission;
mod principal;
mod roles;

/// Test utilities for generating identity tokens
pub mod test_utils;

// RBAC types
pub use permission::Permission;
pub use roles::Role;

// Identity types
pub use claims::{IdTokenClaims, ROLE_CLAIM_KEY};
pub use principal::Principal;

// Identity providers
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use jwt::JwtIdentityProvider;

// Errors
pub use error::{AuthError, Result};
