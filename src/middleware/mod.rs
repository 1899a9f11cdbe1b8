pub mod gate;
pub mod response;

pub use gate::{access_gate, classify, AccessGate, RouteClass, CSRF_COOKIE, CSRF_HEADER, SESSION_CHECK_PATH};
pub use response::{ApiResponse, ApiResult, IntoApiResponse};
