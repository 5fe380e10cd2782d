use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use sharebook_core::members::{Member, NewMember};

use super::actor::Actor;
use crate::{error::ApiResult, main_lib::AppState};

async fn create_member(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(mut payload): Json<NewMember>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    payload.entity_id = entity_id;
    let member = state
        .member_service
        .create_member(actor.into_inner(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn list_members(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Member>>> {
    Ok(Json(state.member_service.list_members(&entity_id)?))
}

async fn delete_member(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> ApiResult<StatusCode> {
    state
        .member_service
        .delete_member(actor.into_inner(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/entities/{entity_id}/members",
            get(list_members).post(create_member),
        )
        .route("/members/{id}", delete(delete_member))
}
