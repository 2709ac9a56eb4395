use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use roster_registry::{Architecture, ArchitectureSpec};

use crate::{error::ApiResult, server::AppState};

pub async fn create(
    State(state): State<AppState>,
    Json(spec): Json<ArchitectureSpec>,
) -> ApiResult<impl IntoResponse> {
    let architecture = state.registry.architectures().create(spec).await?;
    Ok(Json(serde_json::json!({
        "status": "created",
        "architecture_id": architecture.id,
        "architecture": architecture,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Architecture>> {
    Ok(Json(state.registry.architectures().get(&id).await?))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let architectures = state.registry.architectures().list().await?;
    Ok(Json(serde_json::json!({
        "architectures": architectures,
        "count": architectures.len(),
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.registry.architectures().delete(&id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted", "id": id })))
}
