pub mod current_user;
pub mod metrics;

pub use current_user::{client_ip, CurrentUser, USER_CODE_HEADER};
pub use metrics::metrics_middleware;
