#![warn(clippy::all, missing_docs)]

//! Core domain logic for the campus portal.
//!
//! This crate hosts the user directory, credential handling, the
//! session and its durable mirror, role routing, and the mock
//! dashboard datasets used by the terminal UI and any future frontends.

use std::{sync::Arc, time::Duration};

pub mod auth;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod directory;
pub mod models;
pub mod relay;
pub mod routing;
pub mod session;

pub use auth::{AuthError, AuthService};
pub use config::AppConfig;
pub use dashboard::{load_dashboard, Dashboard, DashboardData, DashboardError, Panel};
pub use models::{LoginRequest, RegisterRequest, Role, UserRecord};
pub use relay::{Action, ActionAck, ActionRelay};
pub use routing::{guard, Access, Route};
pub use session::{FileMirror, MemoryMirror, SessionManager, SessionMirror};

/// Everything a front end needs, wired from one configuration.
#[derive(Clone)]
pub struct Portal {
    /// Login, registration and session queries.
    pub auth: AuthService,
    /// Simulated dashboard actions.
    pub relay: ActionRelay,
    /// Configuration the portal was built from.
    pub config: AppConfig,
}

impl Portal {
    /// Seeded portal whose session mirror lives under `config.data_dir`.
    pub fn from_config(config: AppConfig) -> Self {
        let mirror = FileMirror::new(&config.data_dir, &config.session_key);
        Self::with_mirror(config, Arc::new(mirror))
    }

    /// Seeded portal over an arbitrary mirror.
    pub fn with_mirror(config: AppConfig, mirror: Arc<dyn SessionMirror>) -> Self {
        let session = SessionManager::new(mirror);
        Self {
            auth: AuthService::seeded(session, config.latency.clone()),
            relay: ActionRelay::new(config.latency.action()),
            config,
        }
    }
}

/// Stand-in for a backend round trip.
pub(crate) async fn simulate_latency(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[tokio::test]
    async fn portal_session_survives_restart() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::ephemeral(dir.path());

        let first = Portal::from_config(config.clone());
        first
            .auth
            .login(&LoginRequest::new("jennifer.taylor@example.com", "password123", "finance"))
            .await?;

        let second = Portal::from_config(config);
        let restored = second.auth.session().init().expect("session restored");
        assert_eq!(restored.id, "FIN12345");
        assert_eq!(Route::for_role(restored.role.as_str()), Route::FinanceDashboard);

        second.auth.logout().await;
        assert!(Portal::from_config(AppConfig::ephemeral(dir.path()))
            .auth
            .current_user()
            .await
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn memory_backed_portal() {
        let portal = Portal::with_mirror(
            AppConfig::ephemeral("unused"),
            Arc::new(MemoryMirror::new()),
        );
        let ack = portal.relay.dispatch(&Action::PayFees).await;
        assert!(ack.success);
        assert_eq!(portal.relay.journal().len(), 1);
    }
}
