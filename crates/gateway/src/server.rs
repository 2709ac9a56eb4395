use std::sync::Arc;

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, patch},
    },
    secrecy::ExposeSecret,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{info, warn},
};

use {
    roster_config::{RosterConfig, StorageBackend},
    roster_registry::{RagConfig, Registry, Skill, Tool},
    roster_storage::{MemoryStorage, Storage},
};

use crate::{
    agent_routes, architecture_routes,
    auth_middleware::{MasterKey, require_master_key},
    catalog_routes, discover_routes,
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    /// `None` runs the API without authentication.
    pub master_key: Option<MasterKey>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, master_key: Option<MasterKey>) -> Self {
        Self {
            registry,
            master_key,
        }
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the registry router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/skills",
            get(catalog_routes::list::<Skill>).post(catalog_routes::create::<Skill>),
        )
        .route(
            "/skills/{id}",
            get(catalog_routes::get::<Skill>).delete(catalog_routes::delete::<Skill>),
        )
        .route(
            "/tools",
            get(catalog_routes::list::<Tool>).post(catalog_routes::create::<Tool>),
        )
        .route(
            "/tools/{id}",
            get(catalog_routes::get::<Tool>).delete(catalog_routes::delete::<Tool>),
        )
        .route(
            "/rag",
            get(catalog_routes::list::<RagConfig>).post(catalog_routes::create::<RagConfig>),
        )
        .route(
            "/rag/{id}",
            get(catalog_routes::get::<RagConfig>).delete(catalog_routes::delete::<RagConfig>),
        )
        .route(
            "/agents",
            get(agent_routes::list).post(agent_routes::create),
        )
        .route(
            "/agents/{id}",
            get(agent_routes::get)
                .put(agent_routes::update)
                .delete(agent_routes::delete),
        )
        .route("/agents/{id}/url", patch(agent_routes::patch_url))
        .route(
            "/architectures",
            get(architecture_routes::list).post(architecture_routes::create),
        )
        .route(
            "/architectures/{id}",
            get(architecture_routes::get).delete(architecture_routes::delete),
        )
        .route("/discover", get(discover_routes::discover))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_master_key,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Storage backend selected by the config.
fn open_storage(config: &RosterConfig) -> Arc<dyn Storage> {
    match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    }
}

/// Start the registry HTTP server and run it until Ctrl-C.
///
/// Storage is initialized before the listener binds and shut down after the
/// server has drained.
pub async fn start_gateway(config: &RosterConfig) -> anyhow::Result<()> {
    let registry = Arc::new(Registry::new(open_storage(config)));
    registry.init_db().await?;

    let master_key = config
        .auth
        .master_key
        .as_ref()
        .map(|key| MasterKey::new(key.expose_secret()));
    if master_key.is_none() {
        warn!("no master key configured, API authentication is disabled");
    }

    let app = build_app(AppState::new(Arc::clone(&registry), master_key));

    let listener =
        tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        storage = ?config.storage.backend,
        auth = config.auth.is_enabled(),
        "roster registry listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped, shutting down storage");
    registry.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let storage = state.registry.health().await;
    let status = if storage.is_ok() {
        "healthy"
    } else {
        "degraded"
    };
    Json(serde_json::json!({
        "status": status,
        "storage": storage,
    }))
}
