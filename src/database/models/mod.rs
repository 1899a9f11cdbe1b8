pub mod booking;
pub mod category;
pub mod login_event;
pub mod staff_user;

pub use booking::Booking;
pub use category::Category;
pub use login_event::LoginEvent;
pub use staff_user::StaffUser;
