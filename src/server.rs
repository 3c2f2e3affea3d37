//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database,
//! migrations, admin bootstrap, session sweeper, HTTP server and graceful
//! shutdown.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::{DatabaseRepo, ACCESS_LEVEL_ADMIN};
use crate::infrastructure::database::SeaOrmDatabaseRepo;
use crate::infrastructure::{init_database, run_migrations, InMemorySessionStore};
use crate::interfaces::http::{create_router, AppState, HtmlRenderer, SessionState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin when no users exist (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// A running bookings server.
///
/// ```rust,no_run
/// use bookings::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub config: AppConfig,
    pub repo: Arc<dyn DatabaseRepo>,
    pub sessions: InMemorySessionStore,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    http_task: JoinHandle<()>,
    sweeper_task: JoinHandle<()>,
}

/// The global recorder can be installed once per process; restarts within
/// the same process reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder installed");
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Metrics disabled, recorder not installed: {}", e);
            None
        }
    }
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting bookings service...");

        let prometheus = prometheus_handle();

        info!("Database: {}", config.database.url);
        let db = init_database(&config.database).await?;
        if opts.auto_migrate {
            info!("Running database migrations...");
            run_migrations(&db).await?;
            info!("Migrations completed");
        }

        let sea_repo = SeaOrmDatabaseRepo::new(db.clone());
        if opts.create_default_admin {
            create_default_admin(&sea_repo, &config).await;
        }
        let repo: Arc<dyn DatabaseRepo> = Arc::new(sea_repo);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let sessions = InMemorySessionStore::new();
        let sweeper_task = spawn_session_sweeper(
            sessions.clone(),
            config.session.sweep_interval(),
            signal.clone(),
        );

        let session_state = SessionState {
            store: sessions.clone(),
            cookie_name: config.session.cookie_name.clone(),
            secure: config.session.secure,
            lifetime: config.session.lifetime(),
        };
        let state = AppState::new(repo.clone(), Arc::new(HtmlRenderer), session_state);
        let router = create_router(state, prometheus, Path::new(&config.server.static_dir));

        let addr = config.server.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Listening on http://{}", addr);
        info!("Swagger UI available at http://{}/docs/", addr);

        let http_shutdown = signal.clone();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            http_shutdown.wait().await;
            info!("HTTP server received shutdown signal");
        });
        let http_task = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            config,
            repo,
            sessions,
            db,
            shutdown,
            http_task,
            sweeper_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests (bounded by the shutdown timeout), then
    /// close the database.
    pub async fn wait(self) {
        let grace = Duration::from_secs(self.shutdown.timeout_secs());
        match tokio::time::timeout(grace, self.http_task).await {
            Ok(Ok(())) => info!("HTTP server stopped"),
            Ok(Err(e)) => error!("HTTP server task panicked: {}", e),
            Err(_) => warn!("HTTP server did not stop within {}s", grace.as_secs()),
        }
        self.sweeper_task.abort();

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.http_task.is_finished()
    }
}

fn spawn_session_sweeper(
    store: InMemorySessionStore,
    every: Duration,
    signal: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let before = store.len();
                    match store.delete_expired().await {
                        Ok(()) => {
                            let purged = before.saturating_sub(store.len());
                            if purged > 0 {
                                info!(purged, "Expired sessions removed");
                            }
                        }
                        Err(e) => warn!("Session sweep failed: {}", e),
                    }
                }
                _ = signal.wait() => break,
            }
        }
    })
}

/// Create the configured admin when the users table is empty.
async fn create_default_admin(repo: &SeaOrmDatabaseRepo, config: &AppConfig) {
    match repo.count_users().await {
        Ok(0) => {}
        Ok(_) => return,
        Err(e) => {
            error!("Cannot count users: {}", e);
            return;
        }
    }

    let admin = &config.admin;
    match repo
        .create_user(
            &admin.first_name,
            &admin.last_name,
            &admin.email,
            &admin.password,
            ACCESS_LEVEL_ADMIN,
        )
        .await
    {
        Ok(id) => {
            info!(user_id = id, "Default admin created: {}", admin.email);
            warn!("Change the default admin password");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Install the global tracing subscriber. Call once, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
