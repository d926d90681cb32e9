//! In-memory auth backend and event recorder for store tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::auth_client::AuthApi;
use crate::errors::ApiError;
use crate::models::{
    LoginCredentials, Principal, ProfileCompletionData, RegisterCredentials, Role, UserProfile,
};
use crate::session::events::{SessionEvent, SessionEvents};

#[derive(Default)]
struct Backend {
    session: Option<Principal>,
    calls: Vec<String>,
    fail_who_am_i: bool,
    fail_refresh: bool,
    fail_sign_out: bool,
    fail_complete_profile: bool,
    reject_credentials: bool,
}

/// Emulates the server side of the auth API: sign-in creates a session,
/// who-am-I and refresh return it, sign-out drops it.
#[derive(Default)]
pub struct FakeAuthApi {
    backend: Mutex<Backend>,
    hang: bool,
    entered: Notify,
}

fn status(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(principal: Principal) -> Self {
        let api = Self::default();
        api.backend.lock().unwrap().session = Some(principal);
        api
    }

    /// Who-am-I and refresh never complete.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn calls(&self) -> Vec<String> {
        self.backend.lock().unwrap().calls.clone()
    }

    pub fn fail_who_am_i(&self, fail: bool) {
        self.backend.lock().unwrap().fail_who_am_i = fail;
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.backend.lock().unwrap().fail_refresh = fail;
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.backend.lock().unwrap().fail_sign_out = fail;
    }

    pub fn fail_complete_profile(&self, fail: bool) {
        self.backend.lock().unwrap().fail_complete_profile = fail;
    }

    pub fn reject_credentials(&self, reject: bool) {
        self.backend.lock().unwrap().reject_credentials = reject;
    }

    fn record(&self, call: impl Into<String>) {
        self.backend.lock().unwrap().calls.push(call.into());
    }

    async fn hang_if_configured(&self) {
        if self.hang {
            self.entered.notify_one();
            std::future::pending::<()>().await;
        }
    }

    fn open_session(&self, email: &str) -> Result<(), ApiError> {
        let mut backend = self.backend.lock().unwrap();
        if backend.reject_credentials {
            return Err(status(401, "Invalid credentials"));
        }
        backend.session = Some(Principal::new("u-1", email));
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn who_am_i(&self) -> Result<Principal, ApiError> {
        self.record("who_am_i");
        self.hang_if_configured().await;
        let backend = self.backend.lock().unwrap();
        if backend.fail_who_am_i {
            return Err(status(401, "Unauthorized"));
        }
        backend
            .session
            .clone()
            .ok_or_else(|| status(401, "Unauthorized"))
    }

    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        self.record("sign_in");
        self.open_session(&credentials.email)
    }

    async fn sign_up(&self, credentials: &RegisterCredentials) -> Result<(), ApiError> {
        self.record("sign_up");
        self.open_session(&credentials.email)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.record("sign_out");
        let mut backend = self.backend.lock().unwrap();
        if backend.fail_sign_out {
            return Err(status(503, "Service unavailable"));
        }
        backend.session = None;
        Ok(())
    }

    async fn refresh(&self) -> Result<Principal, ApiError> {
        self.record("refresh");
        self.hang_if_configured().await;
        let backend = self.backend.lock().unwrap();
        if backend.fail_refresh {
            return Err(status(401, "Refresh token expired"));
        }
        backend
            .session
            .clone()
            .ok_or_else(|| status(401, "Refresh token expired"))
    }

    async fn complete_profile(
        &self,
        role: Role,
        data: &ProfileCompletionData,
    ) -> Result<(), ApiError> {
        self.record(format!("complete_profile:{role}"));
        let mut backend = self.backend.lock().unwrap();
        if backend.fail_complete_profile {
            return Err(status(500, "Profile could not be saved"));
        }
        let session = backend
            .session
            .as_mut()
            .ok_or_else(|| status(401, "Unauthorized"))?;
        session.role = Some(role);
        session.profile = Some(UserProfile {
            full_name: data.full_name.clone(),
            bio: data.bio.clone(),
            ..Default::default()
        });
        Ok(())
    }
}

/// Collects a short name per recorded event.
#[derive(Default)]
pub struct RecordingEvents {
    kinds: Mutex<Vec<&'static str>>,
}

impl RecordingEvents {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.kinds.lock().unwrap().clone()
    }
}

impl SessionEvents for RecordingEvents {
    fn record(&self, event: SessionEvent<'_>) {
        let kind = match event {
            SessionEvent::Resolved(Some(_)) => "resolved",
            SessionEvent::Resolved(None) => "resolved_anonymous",
            SessionEvent::WhoAmIFailed(_) => "who_am_i_failed",
            SessionEvent::FallbackRefreshFailed(_) => "fallback_refresh_failed",
            SessionEvent::BootstrapTimedOut => "bootstrap_timed_out",
            SessionEvent::SignedIn(_) => "signed_in",
            SessionEvent::SignInFailed(_) => "sign_in_failed",
            SessionEvent::SignUpFailed(_) => "sign_up_failed",
            SessionEvent::SignOutFailed(_) => "sign_out_failed",
            SessionEvent::SignedOut => "signed_out",
            SessionEvent::Refreshed(_) => "refreshed",
            SessionEvent::RefreshFailed(_) => "refresh_failed",
            SessionEvent::ProfileCompleted(_) => "profile_completed",
            SessionEvent::ProfileCompletionFailed(..) => "profile_completion_failed",
        };
        self.kinds.lock().unwrap().push(kind);
    }
}
