use axum::{
    extract::{Path, Query},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder};

use crate::database::manager::DatabaseManager;
use crate::database::models::booking::{is_valid_status, Booking, BOOKING_STATUSES};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

use super::utils::{db_error, Pagination};

const BOOKING_COLUMNS: &str =
    "id, reference, customer_name, customer_email, category_id, status, amount, currency, notes, starts_at, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/admin/bookings - filtered search over bookings
pub async fn list(Query(query): Query<BookingListQuery>) -> Result<ApiResponse<Value>, ApiError> {
    if let Some(status) = &query.status {
        if !is_valid_status(status) {
            return Err(ApiError::bad_request(format!(
                "unknown booking status '{}', expected one of {:?}",
                status, BOOKING_STATUSES
            )));
        }
    }

    let paging = Pagination::from_params(query.page, query.per_page);
    let pool = DatabaseManager::pool().await?;

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM bookings");
    push_filters(&mut count, &query);
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(&pool)
        .await
        .map_err(db_error)?;

    let mut select = QueryBuilder::new(format!("SELECT {} FROM bookings", BOOKING_COLUMNS));
    push_filters(&mut select, &query);
    select
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(paging.per_page)
        .push(" OFFSET ")
        .push_bind(paging.offset());

    let bookings: Vec<Booking> = select
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(db_error)?;

    Ok(ApiResponse::success(json!({
        "items": bookings,
        "page": paging.page,
        "per_page": paging.per_page,
        "total": total,
    })))
}

/// GET /api/admin/bookings/:id - single booking
pub async fn get(Path(id): Path<i64>) -> Result<ApiResponse<Booking>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?
    .ok_or_else(|| ApiError::not_found(format!("booking {} not found", id)))?;

    Ok(ApiResponse::success(booking))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// PATCH /api/admin/bookings/:id - update status (and optionally notes)
pub async fn patch(
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<ApiResponse<Booking>, ApiError> {
    if !is_valid_status(&payload.status) {
        return Err(ApiError::bad_request(format!(
            "unknown booking status '{}', expected one of {:?}",
            payload.status, BOOKING_STATUSES
        )));
    }

    let pool = DatabaseManager::pool().await?;

    let updated = sqlx::query_as::<_, Booking>(&format!(
        "UPDATE bookings SET status = $1, notes = COALESCE($2, notes), updated_at = NOW() WHERE id = $3 RETURNING {}",
        BOOKING_COLUMNS
    ))
    .bind(&payload.status)
    .bind(&payload.notes)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?
    .ok_or_else(|| ApiError::not_found(format!("booking {} not found", id)))?;

    tracing::info!(booking = id, status = %payload.status, "booking updated");
    Ok(ApiResponse::success(updated))
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &BookingListQuery) {
    qb.push(" WHERE 1=1");

    if let Some(status) = &query.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (customer_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR reference ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(from) = query.from {
        qb.push(" AND starts_at >= ").push_bind(day_start(from));
    }
    if let Some(to) = query.to {
        // inclusive upper bound: anything before the start of the next day
        qb.push(" AND starts_at < ")
            .push_bind(day_start(to.succ_opt().unwrap_or(to)));
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
