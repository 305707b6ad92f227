use contracts::system::auth::{AdminInfo, AdminLoginResponse};
use leptos::prelude::*;

use super::storage;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub admin: Option<AdminInfo>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value of the `Authorization` header, if any
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Сессия администратора
///
/// Passed explicitly to [`crate::shared::http::ApiClient::new`]; requests
/// read the token at send time, so a logout affects the next request.
#[derive(Clone, Copy)]
pub struct AdminSession {
    state: RwSignal<AuthState>,
}

impl AdminSession {
    /// Empty session (not logged in)
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(AuthState::default()),
        }
    }

    /// Session restored from localStorage
    pub fn restore() -> Self {
        let token = storage::get_token();
        let admin = token.as_ref().and_then(|_| storage::get_admin());
        if token.is_some() {
            log::debug!("admin session restored");
        }
        Self {
            state: RwSignal::new(AuthState { token, admin }),
        }
    }

    /// Reactive snapshot
    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(AuthState::is_authenticated)
    }

    /// `Authorization` header for the request being sent (not tracked)
    pub fn bearer(&self) -> Option<String> {
        self.state.with_untracked(AuthState::bearer)
    }

    pub fn admin_name(&self) -> Option<String> {
        self.state
            .with(|s| s.admin.as_ref().map(|a| a.display_name().to_string()))
    }

    pub fn login(&self, response: AdminLoginResponse) {
        storage::save_session(&response.token, &response.admin);
        log::info!("admin '{}' logged in", response.admin.admin_id);
        self.state.set(AuthState {
            token: Some(response.token),
            admin: Some(response.admin),
        });
    }

    pub fn logout(&self) {
        storage::clear_session();
        self.state.set(AuthState::default());
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Makes `session` available to the component tree
pub fn provide_session(session: AdminSession) {
    provide_context(session);
}

/// Session from context; restored from storage when no provider is mounted
pub fn use_session() -> AdminSession {
    use_context::<AdminSession>().unwrap_or_else(AdminSession::restore)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_only_with_token() {
        assert_eq!(AuthState::default().bearer(), None);
        let state = AuthState {
            token: Some("abc".into()),
            admin: None,
        };
        assert!(state.is_authenticated());
        assert_eq!(state.bearer().as_deref(), Some("Bearer abc"));
    }
}
