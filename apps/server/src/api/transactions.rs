use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sharebook_core::transactions::{
    BulkCreateResult, NewBulkTransactions, NewTransaction, Transaction, TransactionUpdate,
};

use super::actor::Actor;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    security_class_id: Option<String>,
}

async fn create_transaction(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(mut payload): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    payload.entity_id = entity_id;
    let created = state
        .transaction_service
        .create_transaction(actor.into_inner(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_transactions_bulk(
    Path(entity_id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(mut payload): Json<NewBulkTransactions>,
) -> ApiResult<(StatusCode, Json<BulkCreateResult>)> {
    payload.entity_id = entity_id;
    let result = state
        .transaction_service
        .create_transactions_bulk(actor.into_inner(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list_transactions(
    Path(entity_id): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state
        .transaction_service
        .list_transactions(&entity_id, query.security_class_id.as_deref())?;
    Ok(Json(transactions))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.transaction_service.get_transaction(&id)?))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(patch): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .transaction_service
        .update_transaction(actor.into_inner(), &id, patch)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(actor.into_inner(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/entities/{entity_id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/entities/{entity_id}/transactions/bulk",
            post(create_transactions_bulk),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}
