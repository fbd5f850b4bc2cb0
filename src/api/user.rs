use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct UserQuery {
    /// Pagination page number (starts at 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "employee")]
    pub role: String,
    /// username of this user's manager, if any
    #[schema(example = "bob", nullable = true)]
    pub manager: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
    #[schema(example = 1)]
    pub total: i64,
}

const USER_COLUMNS: &str = "u.id, u.username, \
     CASE u.role_id WHEN 1 THEN 'employee' WHEN 2 THEN 'manager' WHEN 3 THEN 'hr' ELSE 'unknown' END AS role, \
     m.username AS manager";

/* =========================
User listing
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Paginated user list", body = UserListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn list_users(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    let page_size = query.page_size.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * page_size;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count users");
            ApiError::Database(e)
        })?;

    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users u \
         LEFT JOIN users m ON m.id = u.manager_id \
         ORDER BY u.id LIMIT ? OFFSET ?"
    );

    let users = sqlx::query_as::<_, UserResponse>(&sql)
        .bind(page_size)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch user list");
            ApiError::Database(e)
        })?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        data: users,
        page: page as u32,
        page_size: page_size as u32,
        total,
    }))
}

/* =========================
User detail
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(
        ("user_id" = u64, Path, description = "ID of the user to fetch")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn get_user(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users u \
         LEFT JOIN users m ON m.id = u.manager_id \
         WHERE u.id = ?"
    );

    let user = sqlx::query_as::<_, UserResponse>(&sql)
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Failed to fetch user");
            ApiError::Database(e)
        })?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(ApiError::NotFound("User not found")),
    }
}
