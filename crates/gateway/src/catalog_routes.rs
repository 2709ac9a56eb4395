//! Routes shared by the flat catalogs: skills, tools and RAG configs.
//!
//! Each handler is generic over the record type; the router instantiates it
//! once per collection.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use roster_registry::{Catalog, RagConfig, Record, Registry, Skill, Tool};

use crate::{error::ApiResult, server::AppState};

/// A record type exposed under its own route prefix.
pub trait CatalogEntry: Record + 'static {
    /// Key wrapping a single record in the create envelope.
    const SINGULAR: &'static str;
    /// Key wrapping the records in the list envelope.
    const PLURAL: &'static str;

    fn catalog(registry: &Registry) -> &Catalog<Self>;
}

impl CatalogEntry for Skill {
    const PLURAL: &'static str = "skills";
    const SINGULAR: &'static str = "skill";

    fn catalog(registry: &Registry) -> &Catalog<Self> {
        registry.skills()
    }
}

impl CatalogEntry for Tool {
    const PLURAL: &'static str = "tools";
    const SINGULAR: &'static str = "tool";

    fn catalog(registry: &Registry) -> &Catalog<Self> {
        registry.tools()
    }
}

impl CatalogEntry for RagConfig {
    const PLURAL: &'static str = "rag_configs";
    const SINGULAR: &'static str = "rag";

    fn catalog(registry: &Registry) -> &Catalog<Self> {
        registry.rag()
    }
}

pub async fn create<T: CatalogEntry>(
    State(state): State<AppState>,
    Json(record): Json<T>,
) -> ApiResult<impl IntoResponse> {
    let record = T::catalog(&state.registry).create(record).await?;
    Ok(Json(serde_json::json!({
        "status": "created",
        (T::SINGULAR): record,
    })))
}

pub async fn get<T: CatalogEntry>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<T>> {
    Ok(Json(T::catalog(&state.registry).get(&id).await?))
}

pub async fn list<T: CatalogEntry>(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = T::catalog(&state.registry).list().await?;
    Ok(Json(serde_json::json!({
        "count": records.len(),
        (T::PLURAL): records,
    })))
}

pub async fn delete<T: CatalogEntry>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    T::catalog(&state.registry).delete(&id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted", "id": id })))
}
