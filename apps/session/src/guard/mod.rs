//! Role Guard: decides what a protected view does for the current session.
//!
//! Evaluation order (first match wins):
//! 1. loading              → Wait
//! 2. no principal         → Redirect(SignIn)
//! 3. profile incomplete   → Redirect(ChooseRole)   (only when required)
//! 4. role not permitted   → Redirect(Fallback)
//! 5. otherwise            → Render
//!
//! The guard never fails. `next_decision` re-runs it on every store change.

pub mod completion;
pub mod dashboard;
pub mod navigation;

use serde::Serialize;
use tokio::sync::watch;

use crate::models::Role;
use crate::session::SessionSnapshot;

pub const HOME_ROUTE: &str = "/";
pub const SIGN_IN_ROUTE: &str = "/signin";
pub const CHOOSE_ROLE_ROUTE: &str = "/choose-role";

/// Where a guard sends the visitor instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Redirect {
    SignIn,
    ChooseRole,
    /// The caller-supplied route for members without a permitted role.
    Fallback(String),
    Dashboard(Role),
}

impl Redirect {
    pub fn path(&self) -> &str {
        match self {
            Redirect::SignIn => SIGN_IN_ROUTE,
            Redirect::ChooseRole => CHOOSE_ROLE_ROUTE,
            Redirect::Fallback(path) => path,
            Redirect::Dashboard(role) => role.dashboard_route(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GuardDecision {
    /// Session still resolving; show a neutral indicator and re-evaluate later.
    Wait,
    Render,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            GuardDecision::Redirect(redirect) => Some(redirect.path()),
            _ => None,
        }
    }
}

/// Access requirements of one protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    pub allowed_roles: Vec<Role>,
    pub redirect_to: String,
    pub require_profile: bool,
}

impl RouteRequirement {
    pub fn new(allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed_roles: allowed_roles.into(),
            redirect_to: HOME_ROUTE.to_string(),
            require_profile: true,
        }
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    pub fn require_profile(mut self, required: bool) -> Self {
        self.require_profile = required;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RoleGuard {
    requirement: RouteRequirement,
}

impl RoleGuard {
    pub fn new(requirement: RouteRequirement) -> Self {
        Self { requirement }
    }

    pub fn requirement(&self) -> &RouteRequirement {
        &self.requirement
    }

    pub fn evaluate(&self, session: &SessionSnapshot) -> GuardDecision {
        if session.loading {
            return GuardDecision::Wait;
        }

        let Some(principal) = session.principal.as_ref() else {
            return GuardDecision::Redirect(Redirect::SignIn);
        };

        if self.requirement.require_profile && !completion::is_profile_completed(principal) {
            return GuardDecision::Redirect(Redirect::ChooseRole);
        }

        if !principal.has_any_role(&self.requirement.allowed_roles) {
            let fallback = self.requirement.redirect_to.clone();
            return GuardDecision::Redirect(Redirect::Fallback(fallback));
        }

        GuardDecision::Render
    }

    /// Decision for the receiver's current value, marking it seen.
    pub fn current(&self, session: &mut watch::Receiver<SessionSnapshot>) -> GuardDecision {
        let snapshot = session.borrow_and_update();
        self.evaluate(&snapshot)
    }

    /// Waits for the next store change and re-evaluates.
    /// Returns `None` once the store is gone.
    pub async fn next_decision(
        &self,
        session: &mut watch::Receiver<SessionSnapshot>,
    ) -> Option<GuardDecision> {
        session.changed().await.ok()?;
        Some(self.current(session))
    }
}
