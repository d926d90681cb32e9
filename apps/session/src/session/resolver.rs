use crate::auth_client::AuthApi;
use crate::models::Principal;
use crate::session::events::{SessionEvent, SessionEvents};

/// Boot-time session resolution.
///
/// Who-am-I first; on any failure exactly one token refresh; if that fails
/// too the visitor is anonymous. Never errors and never loops.
pub async fn resolve_session(api: &dyn AuthApi, events: &dyn SessionEvents) -> Option<Principal> {
    let principal = match api.who_am_i().await {
        Ok(principal) => Some(principal),
        Err(e) => {
            events.record(SessionEvent::WhoAmIFailed(&e));
            match api.refresh().await {
                Ok(principal) => Some(principal),
                Err(e) => {
                    events.record(SessionEvent::FallbackRefreshFailed(&e));
                    None
                }
            }
        }
    };

    events.record(SessionEvent::Resolved(principal.as_ref()));
    principal
}
