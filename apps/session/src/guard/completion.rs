//! Profile completion: one canonical rule over the two signals the backend sends.
//!
//! Signals:
//! - `is_profile_completed` flag, set by the backend once onboarding is saved
//! - derived: a stored profile record *and* an assigned role
//!
//! Rule: complete iff flag OR derived. The flag wins when the profile payload
//! is missing; the derived signal covers the window right after onboarding
//! before the flag propagates.

use serde::Serialize;

use crate::models::Principal;

/// Breakdown of both signals, for diagnostics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionSignal {
    pub flag: bool,
    pub has_profile: bool,
    pub has_role: bool,
}

impl CompletionSignal {
    pub fn of(principal: &Principal) -> Self {
        Self {
            flag: principal.is_profile_completed,
            has_profile: principal.profile.is_some(),
            has_role: principal.role.is_some(),
        }
    }

    pub fn derived(&self) -> bool {
        self.has_profile && self.has_role
    }

    pub fn is_complete(&self) -> bool {
        self.flag || self.derived()
    }
}

pub fn is_profile_completed(principal: &Principal) -> bool {
    CompletionSignal::of(principal).is_complete()
}
