pub mod analytics;
pub mod bookings;
pub mod categories;
pub mod logins;
pub mod users;
pub mod utils;
