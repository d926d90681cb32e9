use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use session::config::Config;
use session::guard::dashboard::landing_decision;
use session::guard::navigation::{navigation_for, route_requirement};
use session::{HttpAuthApi, RoleGuard, SessionStore, StoreOptions};

/// Resolves the current session against the configured auth backend and
/// reports where the given route (or the entry page) would send the visitor.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting session client v{}", env!("CARGO_PKG_VERSION"));

    let api = HttpAuthApi::from_config(&config)?;
    info!("Auth backend: {}", api.base_url());

    let store = SessionStore::with_tracing(Arc::new(api), StoreOptions::from(&config));
    store.initialize().await;

    let snapshot = store.snapshot();
    match snapshot.principal.as_ref() {
        Some(principal) => info!(
            user_id = %principal.id,
            email = %principal.email,
            role = ?principal.role,
            profile_completed = snapshot.is_profile_completed(),
            "Signed in"
        ),
        None => info!("Anonymous visitor"),
    }

    let pages: Vec<_> = navigation_for(snapshot.principal.as_ref())
        .into_iter()
        .map(|item| item.href)
        .collect();
    info!("Navigation: {:?}", pages);

    match std::env::args().nth(1) {
        Some(path) => match route_requirement(&path) {
            Some(requirement) => {
                let decision = RoleGuard::new(requirement).evaluate(&snapshot);
                info!("{path}: {decision:?}");
            }
            None => warn!("{path} is not a protected route"),
        },
        None => match landing_decision(&snapshot) {
            Ok(decision) => info!("Landing: {decision:?}"),
            Err(e) => warn!("Cannot resolve landing route: {e}"),
        },
    }

    Ok(())
}
