use {
    axum::{
        Json,
        extract::{Path, Query, State},
        response::IntoResponse,
    },
    serde::Deserialize,
};

use roster_registry::{Agent, AgentFilter, AgentSpec};

use crate::{error::ApiResult, server::AppState};

pub async fn create(
    State(state): State<AppState>,
    Json(spec): Json<AgentSpec>,
) -> ApiResult<impl IntoResponse> {
    let agent = state.registry.agents().create(spec).await?;
    Ok(Json(serde_json::json!({
        "status": "created",
        "agent_id": agent.id(),
        "agent": agent,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Agent>> {
    Ok(Json(state.registry.agents().get(&id).await?))
}

/// `GET /agents[?tag=][&agent_type=]`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AgentFilter>,
) -> ApiResult<impl IntoResponse> {
    let agents = state.registry.agents().list(&filter).await?;
    Ok(Json(serde_json::json!({
        "agents": agents,
        "count": agents.len(),
    })))
}

/// Full replacement of the client-owned fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(spec): Json<AgentSpec>,
) -> ApiResult<impl IntoResponse> {
    let agent = state.registry.agents().update(&id, spec).await?;
    Ok(Json(serde_json::json!({
        "status": "updated",
        "agent": agent,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UrlPatch {
    pub url: String,
}

/// Second phase of registration: record the URL once the agent is deployed.
pub async fn patch_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UrlPatch>,
) -> ApiResult<impl IntoResponse> {
    let agent = state.registry.agents().patch_url(&id, body.url).await?;
    Ok(Json(serde_json::json!({
        "status": "updated",
        "agent_id": agent.id(),
        "url": agent.record.url,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.registry.agents().delete(&id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted", "id": id })))
}
