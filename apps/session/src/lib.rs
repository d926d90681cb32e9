//! Client-side session and role routing for the career platform.
//!
//! - `session`: the observable session store and its boot-time resolver
//! - `guard`: route guard, profile-completion rule, dashboard and navigation tables
//! - `auth_client`: the auth backend behind the `AuthApi` trait

pub mod auth_client;
pub mod config;
pub mod errors;
pub mod guard;
pub mod models;
pub mod session;

pub use auth_client::{AuthApi, HttpAuthApi};
pub use errors::{ApiError, AuthError, ProfileError, RoleError, SessionExpired};
pub use guard::{GuardDecision, Redirect, RoleGuard, RouteRequirement};
pub use models::{Principal, Role};
pub use session::{SessionSnapshot, SessionStore, StoreOptions};
