//! Notification record query endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use notifier::{NotificationFilter, NotificationKind, NotificationRecord, NotificationStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::bookings::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub recipient_id: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub recipient_id: String,
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub related_id: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub sent_at: Option<String>,
    pub created_at: String,
}

impl From<&NotificationRecord> for NotificationResponse {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            kind: record.kind.to_string(),
            recipient_id: record.recipient_id.clone(),
            recipient_email: record.recipient_email.clone(),
            subject: record.subject.clone(),
            content: record.content.clone(),
            related_id: record.related_id.clone(),
            status: record.status.to_string(),
            error: record.error.clone(),
            sent_at: record.sent_at.map(|t| t.to_rfc3339()),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct NotificationPageResponse {
    pub items: Vec<NotificationResponse>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// GET /notifications — query processed notifications, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationPageResponse>, ApiError> {
    state.authenticate(&headers).await?;

    let kind = query
        .kind
        .as_deref()
        .map(|k| {
            NotificationKind::parse(k)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid notification kind: {k}")))
        })
        .transpose()?;
    let status = query
        .status
        .as_deref()
        .map(|s| {
            NotificationStatus::parse(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid notification status: {s}")))
        })
        .transpose()?;

    let filter = NotificationFilter {
        recipient_id: query.recipient_id,
        kind,
        status,
    };
    let page = state
        .notifications
        .query(&filter, query.page.unwrap_or(1), query.per_page.unwrap_or(20))
        .await;

    Ok(Json(NotificationPageResponse {
        items: page.items.iter().map(NotificationResponse::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}
