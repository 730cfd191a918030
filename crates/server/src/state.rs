//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{
    InMemoryTeamStore, InMemoryUserStore, PgTeamStore, PgUserStore, TeamStore, UserStore,
};
use crate::services::{AuthService, Notifier, TeamService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the stores, configuration, and socket notifier.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    users: Arc<dyn UserStore>,
    team: Arc<dyn TeamStore>,
    notifier: Notifier,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create application state over arbitrary stores.
    #[must_use]
    pub fn new(config: ServerConfig, users: Arc<dyn UserStore>, team: Arc<dyn TeamStore>) -> Self {
        Self::build(config, users, team, None)
    }

    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn with_pool(config: ServerConfig, pool: PgPool) -> Self {
        Self::build(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTeamStore::new(pool.clone())),
            Some(pool),
        )
    }

    /// Create application state backed by the in-memory stores.
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryTeamStore::new()),
        )
    }

    fn build(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        team: Arc<dyn TeamStore>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                team,
                notifier: Notifier::new(),
                pool,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the database pool, if the state is backed by `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the socket connectivity notifier.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Authentication service over the user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.users.as_ref())
    }

    /// Team directory service over the team store.
    #[must_use]
    pub fn team(&self) -> TeamService<'_> {
        TeamService::new(self.inner.team.as_ref())
    }
}
