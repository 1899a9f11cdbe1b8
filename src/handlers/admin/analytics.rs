use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::booking::BOOKING_STATUSES;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

use super::utils::db_error;

/// GET /api/admin/analytics - dashboard summary: status counts, revenue,
/// six-month trend and top categories. The page shells render charts from
/// this payload; all shaping happens here.
pub async fn summary() -> Result<ApiResponse<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let status_rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
            .fetch_all(&pool)
            .await
            .map_err(db_error)?;

    let total_bookings: i64 = status_rows.iter().map(|(_, count)| count).sum();
    let mut by_status = Map::new();
    for status in BOOKING_STATUSES {
        by_status.insert(status.to_string(), json!(0));
    }
    for (status, count) in status_rows {
        by_status.insert(status, json!(count));
    }

    let (total_revenue, completed_revenue): (Decimal, Decimal) = sqlx::query_as(
        "SELECT \
             COALESCE(SUM(amount) FILTER (WHERE status <> 'cancelled'), 0), \
             COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) \
         FROM bookings",
    )
    .fetch_one(&pool)
    .await
    .map_err(db_error)?;

    let monthly_rows: Vec<(DateTime<Utc>, i64, Decimal)> = sqlx::query_as(
        "SELECT date_trunc('month', starts_at) AS month, COUNT(*), COALESCE(SUM(amount), 0) \
         FROM bookings \
         WHERE starts_at >= date_trunc('month', NOW()) - INTERVAL '5 months' \
         GROUP BY month ORDER BY month",
    )
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    let monthly: Vec<Value> = monthly_rows
        .into_iter()
        .map(|(month, bookings, revenue)| {
            json!({
                "month": month.format("%Y-%m").to_string(),
                "bookings": bookings,
                "revenue": revenue,
            })
        })
        .collect();

    let top_rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT c.name, COUNT(b.id) \
         FROM categories c JOIN bookings b ON b.category_id = c.id \
         GROUP BY c.name ORDER BY COUNT(b.id) DESC, c.name LIMIT 5",
    )
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    let top_categories: Vec<Value> = top_rows
        .into_iter()
        .map(|(name, bookings)| json!({ "name": name, "bookings": bookings }))
        .collect();

    Ok(ApiResponse::success(json!({
        "totals": {
            "bookings": total_bookings,
            "by_status": by_status,
            "revenue": total_revenue,
            "completed_revenue": completed_revenue,
        },
        "monthly": monthly,
        "top_categories": top_categories,
    })))
}
