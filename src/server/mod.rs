use axum::{
    routing::{delete, get, put},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use crate::config::ServerSettings;
use crate::storage::FeedbackStore;

pub mod routes;

/// Server state
///
/// Only the database location is shared; every request opens its own
/// connection through [`AppState::with_store`].
pub struct AppState {
    pub database_path: PathBuf,
}

impl AppState {
    pub fn new(database_path: PathBuf) -> Self {
        Self { database_path }
    }

    /// Run `f` against a fresh connection on a blocking worker thread.
    ///
    /// The store is dropped when `f` returns, closing the connection whether
    /// `f` succeeded or not.
    pub async fn with_store<T, F>(&self, f: F) -> crate::Result<T>
    where
        F: FnOnce(&FeedbackStore) -> crate::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.database_path.clone();
        tokio::task::spawn_blocking(move || {
            let store = FeedbackStore::open(&path)?;
            f(&store)
        })
        .await?
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, static_dir: &Path, cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(routes::index))
        .route(
            "/api/feedback",
            get(routes::list_feedback).post(routes::create_feedback),
        )
        .route("/api/feedback/{id}/star", put(routes::toggle_star))
        .route("/api/feedback/{id}", delete(routes::delete_feedback))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http());

    if cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}

pub async fn start_server(settings: &ServerSettings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(settings.database.clone()));

    state.with_store(|store| store.ensure_schema()).await?;
    tracing::info!("Database ready at {}", settings.database.display());

    let app = router(state, &settings.static_dir, settings.cors);

    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Starting server on {}", addr);
    crate::ui::header(&format!("Feedback box running at http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler the server simply runs until killed
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
