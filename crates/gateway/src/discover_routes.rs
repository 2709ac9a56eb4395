use {
    axum::{
        Json,
        extract::{Query, State},
        response::IntoResponse,
    },
    serde::Deserialize,
};

use roster_registry::DiscoveryOutcome;

use crate::{error::ApiResult, server::AppState};

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(default)]
    pub query: String,
}

/// `GET /discover?query=...` recommends the public agent whose skills best
/// overlap the query.
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> ApiResult<impl IntoResponse> {
    let body = match state.registry.discovery().discover(&params.query).await? {
        DiscoveryOutcome::Recommended(candidate) => serde_json::json!({
            "recommended_agent": candidate.agent,
            "matched_skill": candidate.skill,
            "score": candidate.score,
            "query": params.query,
        }),
        DiscoveryOutcome::NoMatch => serde_json::json!({
            "message": "no matching agent found",
            "query": params.query,
        }),
    };
    Ok(Json(body))
}
