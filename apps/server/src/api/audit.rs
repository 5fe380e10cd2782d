use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sharebook_core::audit::{AuditAction, AuditLogFilter, Pagination};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditQuery {
    format: Option<String>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    actor_id: Option<String>,
    table_name: Option<String>,
    record_id: Option<String>,
    action: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl AuditQuery {
    fn filter(&self) -> ApiResult<AuditLogFilter> {
        let action = self
            .action
            .as_deref()
            .map(AuditAction::from_str)
            .transpose()
            .map_err(ApiError::BadRequest)?;
        Ok(AuditLogFilter {
            from_date: self.from_date,
            to_date: self.to_date,
            actor_id: self.actor_id.clone(),
            table_name: self.table_name.clone(),
            record_id: self.record_id.clone(),
            action,
        })
    }
}

async fn query_audit_log(
    Path(entity_id): Path<String>,
    Query(query): Query<AuditQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let filter = query.filter()?;

    match query.format.as_deref() {
        None | Some("json") => {
            let page = state.audit_service.query_audit_log(
                &entity_id,
                &filter,
                Pagination::new(query.limit, query.offset),
            )?;
            Ok(Json(page).into_response())
        }
        Some("csv") => {
            // The export is rendered in full before the response starts.
            let mut body = Vec::new();
            let rows = state
                .audit_service
                .export_audit_log_csv(&entity_id, &filter, &mut body)?;
            tracing::debug!("Exported {} audit rows for {}", rows, entity_id);
            let disposition = format!("attachment; filename=\"audit-{}.csv\"", entity_id);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unsupported format '{}', expected json or csv",
            other
        ))),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/entities/{entity_id}/audit-log", get(query_audit_log))
}
