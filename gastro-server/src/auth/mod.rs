//! Authentication: session tokens, access guards and rate limiting

pub mod rate_limit;
pub mod session;

pub use session::{CurrentUser, require_login_page, require_staff, require_user};
