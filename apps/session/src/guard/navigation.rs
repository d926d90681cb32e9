//! Role-filtered navigation table. Each item also defines the access
//! requirement of its route.

use serde::Serialize;

use crate::guard::RouteRequirement;
use crate::models::{Principal, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub roles: &'static [Role],
}

const EVERYONE: &[Role] = &[Role::JobSeeker, Role::Recruiter, Role::Mentor];
const JOB_SEEKER: &[Role] = &[Role::JobSeeker];
const RECRUITER: &[Role] = &[Role::Recruiter];
const MENTOR: &[Role] = &[Role::Mentor];
const SEEKERS_AND_MENTORS: &[Role] = &[Role::JobSeeker, Role::Mentor];

const fn item(name: &'static str, href: &'static str, roles: &'static [Role]) -> NavItem {
    NavItem { name, href, roles }
}

pub const NAVIGATION: &[NavItem] = &[
    // Job seeker
    item("Dashboard", "/dashboard", JOB_SEEKER),
    item("Upload Resume", "/upload-resume", JOB_SEEKER),
    item("Mentor Match", "/mentor-match", JOB_SEEKER),
    item("Role Suggest", "/role-suggest", JOB_SEEKER),
    item("Roadmap", "/roadmap", JOB_SEEKER),
    // Recruiter
    item("Dashboard", "/recruiter-dashboard", RECRUITER),
    item("Job Postings", "/job-postings", RECRUITER),
    item("Candidate Search", "/candidate-search", RECRUITER),
    item("Applications", "/applications", RECRUITER),
    item("Analytics", "/analytics", RECRUITER),
    // Mentor
    item("Dashboard", "/mentor-dashboard", MENTOR),
    item("Mentee Matches", "/mentee-matches", MENTOR),
    item("Sessions", "/sessions", MENTOR),
    // Shared
    item("Profile", "/profile", EVERYONE),
    item("AI Chat", "/ai-chat", SEEKERS_AND_MENTORS),
    item("Model Benchmarks", "/model-benchmarks", EVERYONE),
    item("Voice Input", "/voice-input", SEEKERS_AND_MENTORS),
];

/// Items visible to the principal. Anonymous and role-less members see none.
pub fn navigation_for(principal: Option<&Principal>) -> Vec<&'static NavItem> {
    let Some(role) = principal.and_then(|p| p.role) else {
        return Vec::new();
    };
    NAVIGATION
        .iter()
        .filter(|item| item.roles.contains(&role))
        .collect()
}

/// Access requirement for a navigation route; `None` for routes outside the table.
pub fn route_requirement(path: &str) -> Option<RouteRequirement> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    NAVIGATION
        .iter()
        .find(|item| item.href == path)
        .map(|item| RouteRequirement::new(item.roles))
}
