//! Session Store: the single source of truth for "who is logged in".
//!
//! State is published through a `tokio::sync::watch` channel so every
//! subscriber (route guards, navigation, profile views) observes each
//! committed change. Mutations go through the action methods only and are
//! serialized by an async lock, so an action's final state is committed
//! before the next action starts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};
use tracing::warn;

use crate::auth_client::AuthApi;
use crate::config::Config;
use crate::errors::{ApiError, AuthError, ProfileError, SessionExpired};
use crate::guard::completion;
use crate::models::{LoginCredentials, Principal, ProfileCompletionData, RegisterCredentials, Role};
use crate::session::events::{SessionEvent, SessionEvents, TracingEvents};
use crate::session::resolver::resolve_session;

const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(15);

/// What subscribers see: the current principal (if any) and whether the
/// boot-time resolution is still running.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub principal: Option<Principal>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// State of a store that has not finished `initialize` yet.
    pub fn booting() -> Self {
        Self {
            principal: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            principal: None,
            loading: false,
        }
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            loading: false,
        }
    }

    pub fn is_profile_completed(&self) -> bool {
        self.principal
            .as_ref()
            .is_some_and(completion::is_profile_completed)
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Upper bound for the whole boot-time resolution (who-am-I plus fallback refresh).
    pub bootstrap_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            bootstrap_timeout: config.bootstrap_timeout,
        }
    }
}

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    events: Arc<dyn SessionEvents>,
    state: watch::Sender<SessionSnapshot>,
    actions: Mutex<()>,
    cancel: Notify,
    options: StoreOptions,
}

impl SessionStore {
    /// Creates a store in the booting state (no principal, loading).
    pub fn new(
        api: Arc<dyn AuthApi>,
        events: Arc<dyn SessionEvents>,
        options: StoreOptions,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::booting());
        Self {
            api,
            events,
            state,
            actions: Mutex::new(()),
            cancel: Notify::new(),
            options,
        }
    }

    pub fn with_tracing(api: Arc<dyn AuthApi>, options: StoreOptions) -> Self {
        Self::new(api, Arc::new(TracingEvents), options)
    }

    // ── Read side ───────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.state
            .borrow()
            .principal
            .as_ref()
            .is_some_and(|p| p.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.state
            .borrow()
            .principal
            .as_ref()
            .is_some_and(|p| p.has_any_role(roles))
    }

    pub fn is_profile_completed(&self) -> bool {
        self.state.borrow().is_profile_completed()
    }

    // ── Actions ─────────────────────────────────────────────────────────────

    /// Boot-time resolution. Always ends with `loading == false`; every
    /// failure (including timeout and cancellation) degrades to anonymous.
    pub async fn initialize(&self) {
        let _action = self.actions.lock().await;
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.loading, true));

        let resolve = tokio::time::timeout(
            self.options.bootstrap_timeout,
            resolve_session(self.api.as_ref(), self.events.as_ref()),
        );
        let cancelled = self.cancel.notified();

        let principal = tokio::select! {
            outcome = resolve => match outcome {
                Ok(principal) => principal,
                Err(_) => {
                    self.events.record(SessionEvent::BootstrapTimedOut);
                    None
                }
            },
            _ = cancelled => {
                warn!("Session resolution cancelled");
                None
            }
        };

        self.state.send_modify(|s| {
            s.principal = principal;
            s.loading = false;
        });
    }

    /// Submits credentials, then loads the canonical principal from who-am-I.
    /// Nothing from the sign-in response itself is stored.
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Principal, AuthError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let _action = self.actions.lock().await;
        if let Err(e) = self.cancellable(self.api.sign_in(credentials)).await {
            self.events.record(SessionEvent::SignInFailed(&e));
            return Err(AuthError::Rejected(e));
        }
        self.load_authenticated_principal().await
    }

    /// Same contract as `sign_in`, for account creation.
    pub async fn sign_up(&self, credentials: &RegisterCredentials) -> Result<Principal, AuthError> {
        credentials.validate().map_err(AuthError::Validation)?;

        let _action = self.actions.lock().await;
        if let Err(e) = self.cancellable(self.api.sign_up(credentials)).await {
            self.events.record(SessionEvent::SignUpFailed(&e));
            return Err(AuthError::Rejected(e));
        }
        self.load_authenticated_principal().await
    }

    /// Never fails: a remote failure is reported to the event sink and the
    /// local principal is cleared regardless.
    pub async fn sign_out(&self) {
        let _action = self.actions.lock().await;
        if let Err(e) = self.cancellable(self.api.sign_out()).await {
            self.events.record(SessionEvent::SignOutFailed(&e));
        }
        self.commit(None);
        self.events.record(SessionEvent::SignedOut);
    }

    /// Submits onboarding data to the role's endpoint, then reloads the
    /// canonical principal. On failure the current principal is kept.
    pub async fn complete_profile(
        &self,
        role: Role,
        data: &ProfileCompletionData,
    ) -> Result<Principal, ProfileError> {
        let _action = self.actions.lock().await;
        let submitted = self.cancellable(self.api.complete_profile(role, data)).await;
        let reloaded = match submitted {
            Ok(()) => self.cancellable(self.api.who_am_i()).await,
            Err(e) => Err(e),
        };
        let principal = match reloaded {
            Ok(principal) => principal,
            Err(e) => {
                self.events.record(SessionEvent::ProfileCompletionFailed(role, &e));
                return Err(e.into());
            }
        };

        if principal.role != Some(role) {
            warn!(
                submitted = %role,
                stored = ?principal.role,
                "Backend reports a different role after profile completion"
            );
        }

        self.events.record(SessionEvent::ProfileCompleted(role));
        self.commit(Some(principal.clone()));
        Ok(principal)
    }

    /// `complete_profile` for a role still in its raw string form (form
    /// input, route parameter). Unknown roles fail before any request is sent.
    pub async fn complete_profile_as(
        &self,
        raw_role: &str,
        data: &ProfileCompletionData,
    ) -> Result<Principal, ProfileError> {
        let role: Role = raw_role
            .parse()
            .map_err(|_| ProfileError::UnknownRole(raw_role.trim().to_string()))?;
        self.complete_profile(role, data).await
    }

    /// Silent token renewal. On failure the session is considered dead:
    /// the principal is cleared and the error is returned.
    pub async fn refresh_token(&self) -> Result<Principal, SessionExpired> {
        let _action = self.actions.lock().await;
        match self.cancellable(self.api.refresh()).await {
            Ok(principal) => {
                self.events.record(SessionEvent::Refreshed(&principal));
                self.commit(Some(principal.clone()));
                Ok(principal)
            }
            Err(e) => {
                self.events.record(SessionEvent::RefreshFailed(&e));
                self.commit(None);
                Err(SessionExpired(e))
            }
        }
    }

    /// Cancels every remote call currently in flight on this store.
    /// The interrupted action fails with `ApiError::Cancelled`; an
    /// interrupted `initialize` ends anonymous.
    pub fn cancel_pending(&self) {
        self.cancel.notify_waiters();
    }

    // ── Internals ───────────────────────────────────────────────────────────

    async fn load_authenticated_principal(&self) -> Result<Principal, AuthError> {
        match self.cancellable(self.api.who_am_i()).await {
            Ok(principal) => {
                self.events.record(SessionEvent::SignedIn(&principal));
                self.commit(Some(principal.clone()));
                Ok(principal)
            }
            Err(e) => {
                self.events.record(SessionEvent::SignInFailed(&e));
                self.commit(None);
                Err(AuthError::SessionUnavailable(e))
            }
        }
    }

    async fn cancellable<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let cancelled = self.cancel.notified();
        tokio::select! {
            result = call => result,
            _ = cancelled => Err(ApiError::Cancelled),
        }
    }

    fn commit(&self, principal: Option<Principal>) {
        self.state.send_modify(|s| s.principal = principal);
    }
}
