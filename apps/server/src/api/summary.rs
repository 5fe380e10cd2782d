use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sharebook_core::summary::{MemberHoldings, SecurityClassSummary};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryQuery {
    #[serde(default)]
    include_archived: bool,
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsQuery {
    as_of: Option<NaiveDate>,
}

async fn get_security_summary(
    Path(entity_id): Path<String>,
    Query(query): Query<SummaryQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SecurityClassSummary>>> {
    let summary = match query.as_of {
        Some(as_of) => state.summary_service.get_security_summary_as_of(
            &entity_id,
            query.include_archived,
            Some(as_of),
        )?,
        None => state
            .summary_service
            .get_security_summary(&entity_id, query.include_archived)?,
    };
    Ok(Json(summary))
}

async fn get_member_holdings(
    Path((entity_id, security_class_id)): Path<(String, String)>,
    Query(query): Query<HoldingsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MemberHoldings>> {
    let holdings =
        state
            .summary_service
            .get_member_holdings(&entity_id, &security_class_id, query.as_of)?;
    Ok(Json(holdings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/entities/{entity_id}/securities/summary",
            get(get_security_summary),
        )
        .route(
            "/entities/{entity_id}/security-classes/{security_class_id}/holdings",
            get(get_member_holdings),
        )
}
