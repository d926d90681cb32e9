use crate::errors::RoleError;
use crate::guard::{completion, GuardDecision, Redirect};
use crate::models::Role;
use crate::session::SessionSnapshot;

impl Role {
    /// Canonical landing route after sign-in or onboarding.
    pub fn dashboard_route(self) -> &'static str {
        match self {
            Role::JobSeeker => "/dashboard",
            Role::Recruiter => "/recruiter-dashboard",
            Role::Mentor => "/mentor-dashboard",
        }
    }
}

/// Landing route for a role still in string form. There is no default
/// route: anything outside the enumeration is an error.
pub fn dashboard_route(raw_role: &str) -> Result<&'static str, RoleError> {
    raw_role.parse::<Role>().map(Role::dashboard_route)
}

/// Where to send a visitor who lands on the entry page:
/// sign-in, onboarding, or the dashboard for their role.
///
/// A principal whose profile counts as complete but who has no role is a
/// backend inconsistency and is reported as `RoleError::Missing`.
pub fn landing_decision(session: &SessionSnapshot) -> Result<GuardDecision, RoleError> {
    if session.loading {
        return Ok(GuardDecision::Wait);
    }

    let Some(principal) = session.principal.as_ref() else {
        return Ok(GuardDecision::Redirect(Redirect::SignIn));
    };

    if !completion::is_profile_completed(principal) {
        return Ok(GuardDecision::Redirect(Redirect::ChooseRole));
    }

    let role = principal.role.ok_or(RoleError::Missing)?;
    Ok(GuardDecision::Redirect(Redirect::Dashboard(role)))
}

/// True once the session is resolved, signed in and onboarded.
pub fn should_redirect_to_dashboard(session: &SessionSnapshot) -> bool {
    !session.loading && session.is_profile_completed()
}
