use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::workflow::access::{self, ListScope};
use crate::workflow::engine::{LeaveAction, TransitionCtx, plan_transition};
use actix_web::{HttpResponse, web};
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-07-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "CL")]
    pub leave_type: LeaveType,
    #[schema(example = "Vacation")]
    pub reason: String,
}

/// Optional body for the workflow action endpoints.
#[derive(Deserialize, ToSchema)]
pub struct ActionBody {
    #[schema(example = "Looks fine, enjoy")]
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Filter by status
    #[param(example = "submitted")]
    pub status: Option<String>,
    /// Filter by leave type
    #[param(example = "CL")]
    pub leave_type: Option<String>,
    /// Only requests starting on or after this date
    #[param(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: Option<NaiveDate>,
    /// Only requests ending on or before this date
    #[param(example = "2026-12-31", value_type = String, format = "date")]
    pub end_date: Option<NaiveDate>,
    /// Pagination page number (starts at 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    /// owner of the request
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "CL", value_type = String)]
    pub leave_type: String,
    #[schema(example = "2026-07-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Vacation")]
    pub reason: String,
    #[schema(example = "draft", value_type = String)]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
#[derive(Debug, PartialEq)]
enum SqlParam {
    U64(u64),
    Str(&'static str),
    Date(NaiveDate),
}

const LEAVE_COLUMNS: &str =
    "id, employee_id, leave_type, start_date, end_date, reason, status, created_at, updated_at";

/// Leave request joined with its owner's manager, enough for every
/// visibility and transition decision.
#[derive(FromRow)]
struct LeaveWithOwner {
    id: u64,
    employee_id: u64,
    status: String,
    owner_manager_id: Option<u64>,
}

impl LeaveWithOwner {
    fn status(&self) -> Result<LeaveStatus, ApiError> {
        self.status.parse().map_err(|_| {
            ApiError::Internal(anyhow!(
                "unknown status `{}` on leave request {}",
                self.status,
                self.id
            ))
        })
    }
}

async fn fetch_with_owner(
    pool: &MySqlPool,
    leave_id: u64,
) -> Result<Option<LeaveWithOwner>, ApiError> {
    let row = sqlx::query_as::<_, LeaveWithOwner>(
        r#"
        SELECT lr.id, lr.employee_id, lr.status, u.manager_id AS owner_manager_id
        FROM leave_requests lr
        JOIN users u ON u.id = lr.employee_id
        WHERE lr.id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

async fn fetch_response(pool: &MySqlPool, leave_id: u64) -> Result<LeaveResponse, ApiError> {
    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
    sqlx::query_as::<_, LeaveResponse>(&sql)
        .bind(leave_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Leave request not found"))
}

fn validate_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<(), ApiError> {
    if end < start {
        return Err(ApiError::Validation(
            "end_date cannot be before start_date".to_string(),
        ));
    }
    if start < today {
        return Err(ApiError::Validation(
            "start_date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

fn parse_status_filter(raw: &str) -> Result<LeaveStatus, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::Validation(format!(
            "invalid status `{raw}`; allowed: draft, submitted, approved_manager, approved_hr, rejected, cancelled"
        ))
    })
}

fn parse_type_filter(raw: &str) -> Result<LeaveType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("invalid leave type `{raw}`; allowed: CL, SL, PL")))
}

/// WHERE clause for the list endpoint: visibility scope first, then the
/// caller's filters.
fn build_leave_where(
    scope: ListScope,
    status: Option<LeaveStatus>,
    leave_type: Option<LeaveType>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> (String, Vec<SqlParam>) {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<SqlParam> = Vec::new();

    match scope {
        ListScope::All => {}
        ListScope::Team(manager_id) => {
            where_sql.push_str(
                " AND (employee_id = ? OR employee_id IN (SELECT id FROM users WHERE manager_id = ?))",
            );
            args.push(SqlParam::U64(manager_id));
            args.push(SqlParam::U64(manager_id));
        }
        ListScope::Own(user_id) => {
            where_sql.push_str(" AND employee_id = ?");
            args.push(SqlParam::U64(user_id));
        }
    }

    if let Some(status) = status {
        where_sql.push_str(" AND status = ?");
        args.push(SqlParam::Str(status.as_str()));
    }

    if let Some(lt) = leave_type {
        where_sql.push_str(" AND leave_type = ?");
        args.push(SqlParam::Str(lt.as_str()));
    }

    if let Some(from) = from {
        where_sql.push_str(" AND start_date >= ?");
        args.push(SqlParam::Date(from));
    }

    if let Some(to) = to {
        where_sql.push_str(" AND end_date <= ?");
        args.push(SqlParam::Date(to));
    }

    (where_sql, args)
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leaves",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created in draft", body = LeaveResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    validate_dates(
        payload.start_date,
        payload.end_date,
        Utc::now().date_naive(),
    )?;

    if payload.reason.trim().is_empty() {
        return Err(ApiError::Validation("reason must not be empty".to_string()));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.leave_type.as_str())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.reason.trim())
    .bind(LeaveStatus::Draft.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = auth.user_id, "Failed to create leave request");
        ApiError::Database(e)
    })?;

    let created = fetch_response(pool.get_ref(), result.last_insert_id()).await?;
    Ok(HttpResponse::Created().json(created))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated, role-scoped leave list", body = LeaveListResponse),
        (status = 400, description = "Bad filter value"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    let page_size = query.page_size.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * page_size;

    let status = query.status.as_deref().map(parse_status_filter).transpose()?;
    let leave_type = query.leave_type.as_deref().map(parse_type_filter).transpose()?;

    let scope = access::list_scope(auth.role, auth.user_id);
    let (where_sql, args) =
        build_leave_where(scope, status, leave_type, query.start_date, query.end_date);

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{where_sql}");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            SqlParam::U64(v) => count_q.bind(*v),
            SqlParam::Str(s) => count_q.bind(*s),
            SqlParam::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        ApiError::Database(e)
    })?;

    let data_sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests{where_sql} ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in &args {
        data_q = match arg {
            SqlParam::U64(v) => data_q.bind(*v),
            SqlParam::Str(s) => data_q.bind(*s),
            SqlParam::Date(d) => data_q.bind(*d),
        };
    }

    let leaves = data_q
        .bind(page_size)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            ApiError::Database(e)
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        page_size: page_size as u32,
        total,
    }))
}

/* =========================
Leave request detail
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found or not visible")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let row = fetch_with_owner(pool.get_ref(), leave_id)
        .await?
        .ok_or(ApiError::NotFound("Leave request not found"))?;

    // out-of-scope reads as not-found, never as forbidden
    if !access::can_view(auth.role, auth.user_id, row.employee_id, row.owner_manager_id) {
        return Err(ApiError::NotFound("Leave request not found"));
    }

    let leave = fetch_response(pool.get_ref(), leave_id).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Update draft leave request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to update")
    ),
    request_body(content = CreateLeave, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave request updated", body = LeaveResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or not a draft"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Request left draft status concurrently")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let row = fetch_with_owner(pool.get_ref(), leave_id)
        .await?
        .ok_or(ApiError::NotFound("Leave request not found"))?;

    if !access::can_view(auth.role, auth.user_id, row.employee_id, row.owner_manager_id) {
        return Err(ApiError::NotFound("Leave request not found"));
    }

    if !access::can_modify(auth.user_id, row.employee_id, row.status()?) {
        return Err(ApiError::Forbidden(
            "only the owner may edit a request, and only while it is a draft".to_string(),
        ));
    }

    validate_dates(
        payload.start_date,
        payload.end_date,
        Utc::now().date_naive(),
    )?;

    if payload.reason.trim().is_empty() {
        return Err(ApiError::Validation("reason must not be empty".to_string()));
    }

    // conditioned on the status so a racing submit cannot be overwritten
    let updated = sqlx::query(
        r#"
        UPDATE leave_requests
        SET leave_type = ?, start_date = ?, end_date = ?, reason = ?, updated_at = NOW()
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(payload.leave_type.as_str())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.reason.trim())
    .bind(leave_id)
    .bind(LeaveStatus::Draft.as_str())
    .execute(pool.get_ref())
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::InvalidTransition(format!(
            "leave request {leave_id} is no longer a draft"
        )));
    }

    let leave = fetch_response(pool.get_ref(), leave_id).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Delete draft leave request
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 204, description = "Leave request deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or not a draft"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Request left draft status concurrently")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let row = fetch_with_owner(pool.get_ref(), leave_id)
        .await?
        .ok_or(ApiError::NotFound("Leave request not found"))?;

    if !access::can_view(auth.role, auth.user_id, row.employee_id, row.owner_manager_id) {
        return Err(ApiError::NotFound("Leave request not found"));
    }

    if !access::can_modify(auth.user_id, row.employee_id, row.status()?) {
        return Err(ApiError::Forbidden(
            "only the owner may delete a request, and only while it is a draft".to_string(),
        ));
    }

    let deleted = sqlx::query("DELETE FROM leave_requests WHERE id = ? AND status = ?")
        .bind(leave_id)
        .bind(LeaveStatus::Draft.as_str())
        .execute(pool.get_ref())
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::InvalidTransition(format!(
            "leave request {leave_id} is no longer a draft"
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}

/* =========================
Workflow actions
========================= */

/// Resolve and apply one workflow action: visibility, then the engine's
/// checks, then a conditional status write plus one audit row in a single
/// transaction. The write lands only if the status is still the one the plan
/// was made against.
async fn apply_action(
    action: LeaveAction,
    auth: &AuthUser,
    pool: &MySqlPool,
    leave_id: u64,
    comment: Option<String>,
) -> Result<LeaveResponse, ApiError> {
    let row = fetch_with_owner(pool, leave_id)
        .await?
        .ok_or(ApiError::NotFound("Leave request not found"))?;

    if !access::can_view(auth.role, auth.user_id, row.employee_id, row.owner_manager_id) {
        return Err(ApiError::NotFound("Leave request not found"));
    }

    let current = row.status()?;
    let ctx = TransitionCtx {
        actor_id: auth.user_id,
        actor_role: auth.role,
        owner_id: row.employee_id,
        owner_manager_id: row.owner_manager_id,
    };

    let next = plan_transition(current, action, &ctx)?;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, updated_at = NOW()
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(next.as_str())
    .bind(leave_id)
    .bind(current.as_str())
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // lost the race: another transition landed between read and write
        return Err(ApiError::InvalidTransition(format!(
            "status of leave request {leave_id} changed concurrently"
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_transitions
            (leave_request_id, from_status, to_status, actor_id, comment)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(leave_id)
    .bind(current.as_str())
    .bind(next.as_str())
    .bind(auth.user_id)
    .bind(comment.as_deref())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        leave_id,
        from = current.as_str(),
        to = next.as_str(),
        actor_id = auth.user_id,
        "Leave transition applied"
    );

    fetch_response(pool, leave_id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/leaves/{leave_id}/submit",
    params(
        ("leave_id" = u64, Path, description = "ID of the draft to submit")
    ),
    request_body(content = ActionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Submitted for approval", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Not a draft, or changed concurrently")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<ActionBody>>,
) -> Result<HttpResponse, ApiError> {
    let comment = body.and_then(|b| b.into_inner().comment);
    let leave = apply_action(
        LeaveAction::Submit,
        &auth,
        pool.get_ref(),
        path.into_inner(),
        comment,
    )
    .await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    post,
    path = "/api/v1/leaves/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = ActionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Approved (manager step or HR step)", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Wrong role, wrong team, or own request"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Not approvable from the current status")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<ActionBody>>,
) -> Result<HttpResponse, ApiError> {
    let comment = body.and_then(|b| b.into_inner().comment);
    let leave = apply_action(
        LeaveAction::Approve,
        &auth,
        pool.get_ref(),
        path.into_inner(),
        comment,
    )
    .await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    post,
    path = "/api/v1/leaves/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = ActionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Rejected", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Wrong role, wrong team, or own request"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Not rejectable from the current status")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<ActionBody>>,
) -> Result<HttpResponse, ApiError> {
    let comment = body.and_then(|b| b.into_inner().comment);
    let leave = apply_action(
        LeaveAction::Reject,
        &auth,
        pool.get_ref(),
        path.into_inner(),
        comment,
    )
    .await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    post,
    path = "/api/v1/leaves/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    request_body(content = ActionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Cancelled", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Leave request not found or not visible"),
        (status = 409, description = "Already in a terminal status")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<ActionBody>>,
) -> Result<HttpResponse, ApiError> {
    let comment = body.and_then(|b| b.into_inner().comment);
    let leave = apply_action(
        LeaveAction::Cancel,
        &auth,
        pool.get_ref(),
        path.into_inner(),
        comment,
    )
    .await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn date_validation() {
        let today = d("2026-01-10");
        assert!(validate_dates(d("2026-01-15"), d("2026-01-16"), today).is_ok());
        assert!(validate_dates(d("2026-01-15"), d("2026-01-15"), today).is_ok());
        assert!(matches!(
            validate_dates(d("2026-01-16"), d("2026-01-15"), today),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_dates(d("2026-01-05"), d("2026-01-15"), today),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(
            parse_status_filter("approved_manager").unwrap(),
            LeaveStatus::ApprovedManager
        );
        assert!(matches!(
            parse_status_filter("pending"),
            Err(ApiError::Validation(_))
        ));
        assert_eq!(parse_type_filter("SL").unwrap(), LeaveType::Sl);
        assert!(matches!(
            parse_type_filter("XX"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn where_clause_scopes() {
        let (sql, args) = build_leave_where(ListScope::All, None, None, None, None);
        assert_eq!(sql, " WHERE 1=1");
        assert!(args.is_empty());

        let (sql, args) = build_leave_where(ListScope::Own(7), None, None, None, None);
        assert_eq!(sql, " WHERE 1=1 AND employee_id = ?");
        assert_eq!(args, vec![SqlParam::U64(7)]);

        let (sql, args) = build_leave_where(ListScope::Team(9), None, None, None, None);
        assert!(sql.contains("employee_id IN (SELECT id FROM users WHERE manager_id = ?)"));
        assert_eq!(args, vec![SqlParam::U64(9), SqlParam::U64(9)]);
    }

    #[test]
    fn where_clause_filters_stack_in_order() {
        let (sql, args) = build_leave_where(
            ListScope::Own(7),
            Some(LeaveStatus::Submitted),
            Some(LeaveType::Cl),
            Some(d("2026-01-01")),
            Some(d("2026-12-31")),
        );
        assert_eq!(
            sql,
            " WHERE 1=1 AND employee_id = ? AND status = ? AND leave_type = ? \
             AND start_date >= ? AND end_date <= ?"
        );
        assert_eq!(
            args,
            vec![
                SqlParam::U64(7),
                SqlParam::Str("submitted"),
                SqlParam::Str("CL"),
                SqlParam::Date(d("2026-01-01")),
                SqlParam::Date(d("2026-12-31")),
            ]
        );
    }
}
