use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sharebook_core::securities::{NewSecurityClass, SecurityClass};

use super::actor::Actor;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    include_archived: bool,
}

async fn create_security_class(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(mut payload): Json<NewSecurityClass>,
) -> ApiResult<(StatusCode, Json<SecurityClass>)> {
    payload.entity_id = entity_id;
    let class = state
        .security_class_service
        .create_security_class(actor.into_inner(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(class)))
}

async fn list_security_classes(
    Path(entity_id): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SecurityClass>>> {
    let classes = state
        .security_class_service
        .list_security_classes(&entity_id, query.include_archived)?;
    Ok(Json(classes))
}

async fn archive_security_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> ApiResult<Json<SecurityClass>> {
    let class = state
        .security_class_service
        .archive_security_class(actor.into_inner(), &id)
        .await?;
    Ok(Json(class))
}

async fn restore_security_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> ApiResult<Json<SecurityClass>> {
    let class = state
        .security_class_service
        .restore_security_class(actor.into_inner(), &id)
        .await?;
    Ok(Json(class))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/entities/{entity_id}/security-classes",
            get(list_security_classes).post(create_security_class),
        )
        .route(
            "/security-classes/{id}/archive",
            post(archive_security_class),
        )
        .route(
            "/security-classes/{id}/restore",
            post(restore_security_class),
        )
}
