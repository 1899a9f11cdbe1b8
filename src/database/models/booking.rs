use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Allowed values for bookings.status
pub const BOOKING_STATUSES: &[&str] = &["pending", "confirmed", "completed", "cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub category_id: Option<Uuid>,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn is_valid_status(status: &str) -> bool {
    BOOKING_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_booking_statuses() {
        assert!(is_valid_status("pending"));
        assert!(is_valid_status("cancelled"));
        assert!(!is_valid_status("Pending"));
        assert!(!is_valid_status("archived"));
    }
}
