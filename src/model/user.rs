use sqlx::FromRow;

/// Credential row fetched at login. Manager relationships are resolved in
/// SQL joins, not carried here.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: u64, // BIGINT UNSIGNED
    pub username: String,
    pub password: String,
    pub role_id: u8,
    pub is_active: bool,
}
