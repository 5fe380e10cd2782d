use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sharebook_core::entities::{Entity, NewEntity};

use super::actor::Actor;
use crate::{error::ApiResult, main_lib::AppState};

async fn create_entity(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<NewEntity>,
) -> ApiResult<(StatusCode, Json<Entity>)> {
    let entity = state
        .entity_service
        .create_entity(actor.into_inner(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

async fn list_entities(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Entity>>> {
    Ok(Json(state.entity_service.list_entities()?))
}

async fn get_entity(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Entity>> {
    Ok(Json(state.entity_service.get_entity(&entity_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/entities", get(list_entities).post(create_entity))
        .route("/entities/{entity_id}", get(get_entity))
}
