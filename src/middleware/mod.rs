pub mod auth;
pub mod category;
pub mod response;

pub use auth::{require_identity, AuthUser};
pub use category::validate_category;
pub use response::{ApiResponse, ApiResult};
