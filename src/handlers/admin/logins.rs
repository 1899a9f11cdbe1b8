use axum::extract::Query;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::database::manager::DatabaseManager;
use crate::database::models::LoginEvent;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

use super::utils::db_error;

#[derive(Debug, Deserialize)]
pub struct LoginsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginSummary {
    pub email: String,
    pub count: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// GET /api/admin/logins - login activity grouped per account
pub async fn list(Query(query): Query<LoginsQuery>) -> Result<ApiResponse<Value>, ApiError> {
    let days = query.days.unwrap_or(30).clamp(1, 365);
    let cutoff = Utc::now() - Duration::days(days);

    let pool = DatabaseManager::pool().await?;
    let events = sqlx::query_as::<_, LoginEvent>(
        "SELECT id, user_id, email, ip_address, user_agent, created_at FROM login_events WHERE created_at >= $1 ORDER BY created_at",
    )
    .bind(cutoff)
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    let total_events = events.len();
    let accounts = group_by_email(events);

    Ok(ApiResponse::success(json!({
        "days": days,
        "total_events": total_events,
        "accounts": accounts,
    })))
}

/// Single pass over the fetched rows: one summary per email, busiest first
pub fn group_by_email(events: Vec<LoginEvent>) -> Vec<LoginSummary> {
    let mut grouped: HashMap<String, LoginSummary> = HashMap::new();

    for event in events {
        match grouped.entry(event.email.clone()) {
            Entry::Occupied(mut entry) => {
                let summary = entry.get_mut();
                summary.count += 1;
                if event.created_at < summary.first_seen {
                    summary.first_seen = event.created_at;
                }
                if event.created_at > summary.last_seen {
                    summary.last_seen = event.created_at;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(LoginSummary {
                    email: event.email,
                    count: 1,
                    first_seen: event.created_at,
                    last_seen: event.created_at,
                });
            }
        }
    }

    let mut summaries: Vec<LoginSummary> = grouped.into_values().collect();
    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.email.cmp(&b.email)));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(email: &str, day: u32) -> LoginEvent {
        LoginEvent {
            id: day as i64,
            user_id: None,
            email: email.to_string(),
            ip_address: None,
            user_agent: None,
            created_at: Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_events_per_email() {
        let events = vec![
            event("ana@example.com", 1),
            event("ben@example.com", 2),
            event("ana@example.com", 5),
            event("ana@example.com", 3),
        ];

        let summaries = group_by_email(events);
        assert_eq!(summaries.len(), 2);

        let ana = &summaries[0];
        assert_eq!(ana.email, "ana@example.com");
        assert_eq!(ana.count, 3);
        assert_eq!(ana.first_seen, Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap());
        assert_eq!(ana.last_seen, Utc.with_ymd_and_hms(2026, 7, 5, 12, 0, 0).unwrap());

        assert_eq!(summaries[1].email, "ben@example.com");
        assert_eq!(summaries[1].count, 1);
    }

    #[test]
    fn equal_counts_order_by_email() {
        let events = vec![event("zoe@example.com", 1), event("abe@example.com", 2)];
        let summaries = group_by_email(events);
        assert_eq!(summaries[0].email, "abe@example.com");
        assert_eq!(summaries[1].email, "zoe@example.com");
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group_by_email(Vec::new()).is_empty());
    }
}
