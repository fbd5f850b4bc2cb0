use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::workflow::access;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct AuditFilter {
    /// Filter by leave request
    #[param(example = 1)]
    pub leave_request_id: Option<u64>,
    /// Filter by acting user
    #[param(example = 2)]
    pub actor_id: Option<u64>,
    /// Pagination page number (starts at 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditEntryResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub leave_request_id: u64,
    #[schema(example = "draft", value_type = String)]
    pub from_status: String,
    #[schema(example = "submitted", value_type = String)]
    pub to_status: String,
    #[schema(example = 2)]
    pub actor_id: u64,
    /// username of the acting user
    #[schema(example = "bob")]
    pub actor: String,
    #[schema(example = "Looks fine", nullable = true)]
    pub comment: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct AuditListResponse {
    pub data: Vec<AuditEntryResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
    #[schema(example = 1)]
    pub total: i64,
}

const AUDIT_COLUMNS: &str = "t.id, t.leave_request_id, t.from_status, t.to_status, t.actor_id, \
                             u.username AS actor, t.comment, t.created_at";

/* =========================
Audit log listing (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/audit-log",
    params(AuditFilter),
    responses(
        (status = 200, description = "Paginated transition audit log", body = AuditListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Audit Log"
)]
pub async fn audit_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AuditFilter>,
) -> Result<HttpResponse, ApiError> {
    if !access::can_read_audit(auth.role) {
        return Err(ApiError::Forbidden("HR only".to_string()));
    }

    let page_size = query.page_size.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * page_size;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<u64> = Vec::new();

    if let Some(leave_request_id) = query.leave_request_id {
        where_sql.push_str(" AND t.leave_request_id = ?");
        args.push(leave_request_id);
    }

    if let Some(actor_id) = query.actor_id {
        where_sql.push_str(" AND t.actor_id = ?");
        args.push(actor_id);
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_transitions t{where_sql}");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = count_q.bind(*arg);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count audit entries");
        ApiError::Database(e)
    })?;

    let data_sql = format!(
        "SELECT {AUDIT_COLUMNS} FROM leave_transitions t \
         JOIN users u ON u.id = t.actor_id{where_sql} \
         ORDER BY t.created_at DESC, t.id DESC LIMIT ? OFFSET ?"
    );

    let mut data_q = sqlx::query_as::<_, AuditEntryResponse>(&data_sql);
    for arg in &args {
        data_q = data_q.bind(*arg);
    }

    let entries = data_q
        .bind(page_size)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch audit log");
            ApiError::Database(e)
        })?;

    Ok(HttpResponse::Ok().json(AuditListResponse {
        data: entries,
        page: page as u32,
        page_size: page_size as u32,
        total,
    }))
}

/* =========================
Audit entry detail (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/audit-log/{entry_id}",
    params(
        ("entry_id" = u64, Path, description = "ID of the audit entry to fetch")
    ),
    responses(
        (status = 200, description = "Audit entry found", body = AuditEntryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Audit entry not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Audit Log"
)]
pub async fn audit_detail(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    if !access::can_read_audit(auth.role) {
        return Err(ApiError::Forbidden("HR only".to_string()));
    }

    let entry_id = path.into_inner();

    let sql = format!(
        "SELECT {AUDIT_COLUMNS} FROM leave_transitions t \
         JOIN users u ON u.id = t.actor_id WHERE t.id = ?"
    );

    let entry = sqlx::query_as::<_, AuditEntryResponse>(&sql)
        .bind(entry_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, entry_id, "Failed to fetch audit entry");
            ApiError::Database(e)
        })?;

    match entry {
        Some(entry) => Ok(HttpResponse::Ok().json(entry)),
        None => Err(ApiError::NotFound("Audit entry not found")),
    }
}
