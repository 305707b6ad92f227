pub mod api;
pub mod session;
pub mod storage;

pub use session::{provide_session, use_session, AdminSession, AuthState};
