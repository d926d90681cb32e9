use tracing::{info, warn};

use crate::errors::ApiError;
use crate::models::{Principal, Role};

/// Something noteworthy the session store did. Failures the store absorbs
/// (sign-out, boot-time resolution) are only visible through these.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    /// Boot-time resolution finished; `None` means the visitor is anonymous.
    Resolved(Option<&'a Principal>),
    /// Who-am-I failed at boot; a refresh is attempted next.
    WhoAmIFailed(&'a ApiError),
    /// The single boot-time refresh failed too.
    FallbackRefreshFailed(&'a ApiError),
    BootstrapTimedOut,
    SignedIn(&'a Principal),
    SignInFailed(&'a ApiError),
    SignUpFailed(&'a ApiError),
    SignOutFailed(&'a ApiError),
    SignedOut,
    Refreshed(&'a Principal),
    RefreshFailed(&'a ApiError),
    ProfileCompleted(Role),
    ProfileCompletionFailed(Role, &'a ApiError),
}

/// Observability collaborator injected into the session store.
pub trait SessionEvents: Send + Sync {
    fn record(&self, event: SessionEvent<'_>);
}

/// Default sink: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl SessionEvents for TracingEvents {
    fn record(&self, event: SessionEvent<'_>) {
        match event {
            SessionEvent::Resolved(Some(p)) => {
                info!(user_id = %p.id, role = ?p.role, "Session resolved")
            }
            SessionEvent::Resolved(None) => info!("No session, continuing anonymously"),
            SessionEvent::WhoAmIFailed(e) => warn!("Auth check failed: {e}"),
            SessionEvent::FallbackRefreshFailed(e) => warn!("Token refresh failed: {e}"),
            SessionEvent::BootstrapTimedOut => {
                warn!("Session resolution timed out, continuing anonymously")
            }
            SessionEvent::SignedIn(p) => info!(user_id = %p.id, "Signed in"),
            SessionEvent::SignInFailed(e) => warn!("Sign in failed: {e}"),
            SessionEvent::SignUpFailed(e) => warn!("Sign up failed: {e}"),
            SessionEvent::SignOutFailed(e) => warn!("Sign out failed remotely: {e}"),
            SessionEvent::SignedOut => info!("Signed out"),
            SessionEvent::Refreshed(p) => info!(user_id = %p.id, "Token refreshed"),
            SessionEvent::RefreshFailed(e) => warn!("Token refresh failed: {e}"),
            SessionEvent::ProfileCompleted(role) => info!(%role, "Profile completed"),
            SessionEvent::ProfileCompletionFailed(role, e) => {
                warn!(%role, "Complete profile failed: {e}")
            }
        }
    }
}
