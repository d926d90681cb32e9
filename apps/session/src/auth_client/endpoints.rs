use crate::models::Role;

pub const ME: &str = "/api/v1/auth/me";
pub const SIGN_IN: &str = "/api/v1/auth/signin";
pub const SIGN_UP: &str = "/api/v1/auth/signup";
pub const SIGN_OUT: &str = "/api/v1/auth/signout";
/// Lives outside the `/api/v1` prefix on the current backend.
pub const REFRESH: &str = "/api/auth/refresh";

pub const JOB_SEEKER_PROFILE: &str = "/api/v1/auth/job-seeker/profile";
pub const RECRUITER_PROFILE: &str = "/api/v1/auth/recruiter/profile";
pub const MENTOR_PROFILE: &str = "/api/v1/auth/mentor/profile";

/// Onboarding endpoint for each role.
pub fn profile_endpoint(role: Role) -> &'static str {
    match role {
        Role::JobSeeker => JOB_SEEKER_PROFILE,
        Role::Recruiter => RECRUITER_PROFILE,
        Role::Mentor => MENTOR_PROFILE,
    }
}
