//! Atrium - Backend client
//!
//! REST client for the portal backend's role and permission endpoints:
//!
//! - `GET /users/me` - role of record for the current principal
//! - `GET /users/permissions/me` - live permission set
//!
//! The resolution layer consumes the [`RoleAuthority`] trait; production
//! wiring uses [`HttpRoleAuthority`], tests use [`StaticRoleAuthority`].

mod authority;
mod error;
mod http;
mod types;

pub use authority::{RoleAuthority, StaticRoleAuthority};
pub use error::{ClientError, Result};
pub use http::{HttpRoleAuthority, TokenSource};
pub use types::{PermissionsResponse, UserResponse};
