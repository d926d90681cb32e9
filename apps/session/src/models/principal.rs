use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::RoleError;

/// The closed set of member kinds on the platform.
///
/// Role strings are parsed into this enum as soon as they cross the
/// boundary (API responses, form input); unknown values are rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "jobseeker", alias = "job-seeker", alias = "job_seeker")]
    JobSeeker,
    #[serde(rename = "recruiter")]
    Recruiter,
    #[serde(rename = "mentor")]
    Mentor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::JobSeeker, Role::Recruiter, Role::Mentor];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::JobSeeker => "jobseeker",
            Role::Recruiter => "recruiter",
            Role::Mentor => "mentor",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Recruiter => "Recruiter",
            Role::Mentor => "Mentor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "jobseeker" | "job-seeker" | "job_seeker" => Ok(Role::JobSeeker),
            "recruiter" => Ok(Role::Recruiter),
            "mentor" => Ok(Role::Mentor),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Email address compared case-insensitively.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored onboarding record. Role-specific attributes are all optional;
/// which ones are filled depends on the role the member completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,

    // Mentor
    #[serde(default, deserialize_with = "null_as_default")]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub year_of_mentoring: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,

    // Job seeker
    #[serde(default)]
    pub year_of_experience: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_roles: Vec<String>,

    // Recruiter
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The authenticated member as returned by the who-am-I endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub email: Email,
    /// Absent until the member completes onboarding.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_profile_completed: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// A freshly registered member: no role, no profile, flag unset.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Email::new(email),
            role: None,
            is_profile_completed: false,
            profile: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role.is_some_and(|r| roles.contains(&r))
    }
}
