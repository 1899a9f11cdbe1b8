use axum::extract::Query;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder};

use crate::database::manager::DatabaseManager;
use crate::database::models::StaffUser;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

use super::utils::{db_error, Pagination};

const USER_COLUMNS: &str = "id, email, full_name, role, last_sign_in_at, created_at";

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/admin/users - directory of admin-panel users
pub async fn list(Query(query): Query<UserListQuery>) -> Result<ApiResponse<Value>, ApiError> {
    let paging = Pagination::from_params(query.page, query.per_page);
    let pool = DatabaseManager::pool().await?;

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM profiles");
    push_filters(&mut count, &query);
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(&pool)
        .await
        .map_err(db_error)?;

    let mut select = QueryBuilder::new(format!("SELECT {} FROM profiles", USER_COLUMNS));
    push_filters(&mut select, &query);
    select
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(paging.per_page)
        .push(" OFFSET ")
        .push_bind(paging.offset());

    let users: Vec<StaffUser> = select
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(db_error)?;

    Ok(ApiResponse::success(json!({
        "items": users,
        "page": paging.page,
        "per_page": paging.per_page,
        "total": total,
    })))
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &UserListQuery) {
    qb.push(" WHERE 1=1");

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR full_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
