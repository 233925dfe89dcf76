use axum::{
    Router,
    routing::{delete, get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::coordinator::Coordinator;
use crate::storage::{StoreLayout, Stores};

pub mod routes;

/// Server state
pub struct AppState {
    pub stores: Stores,
    pub coordinator: Coordinator,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        let coordinator = Coordinator::new(stores.chapters.clone(), stores.questions.clone());
        Self { stores, coordinator }
    }

    /// Open (and initialize) every store of the layout
    pub fn open(layout: &StoreLayout) -> crate::Result<Self> {
        Ok(Self::new(Stores::open(layout)?))
    }
}

pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut app: Router<Arc<AppState>> = Router::new()
        .route("/api/messages", get(routes::list_messages).post(routes::create_message))
        .route("/api/files", get(routes::list_files).post(routes::create_file))
        .route("/api/files/{id}", delete(routes::delete_file))
        .route("/api/folders", get(routes::list_folders).post(routes::create_folder))
        .route("/api/folders/{id}", delete(routes::delete_folder))
        .route("/api/chapters", get(routes::list_chapters).post(routes::create_chapter))
        .route("/api/chapters/{id}", delete(routes::delete_chapter))
        .route("/api/subjects/{id}/chapters", get(routes::list_subject_chapters))
        .route("/api/questions/chapter/{id}", get(routes::list_chapter_questions))
        .route("/api/questions/bulk", post(routes::create_bulk_questions));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(settings: ServerSettings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::open(&settings.layout)?);
    let app = router(state, settings.static_dir.as_deref());

    tracing::info!(
        "Starting server on {} (data: {})",
        settings.addr,
        settings.layout.data_dir().display()
    );
    println!("🌍 Server running at http://{}", settings.addr);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
