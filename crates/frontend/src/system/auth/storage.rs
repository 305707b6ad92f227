use contracts::system::auth::AdminInfo;
use web_sys::window;

pub const TOKEN_KEY: &str = "admin-token";
pub const ADMIN_KEY: &str = "admin-data";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save token and admin info to localStorage
pub fn save_session(token: &str, admin: &AdminInfo) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
        match serde_json::to_string(admin) {
            Ok(json) => {
                let _ = storage.set_item(ADMIN_KEY, &json);
            }
            Err(e) => log::warn!("admin info not persisted: {}", e),
        }
    }
}

/// Get token from localStorage
pub fn get_token() -> Option<String> {
    get_local_storage()?
        .get_item(TOKEN_KEY)
        .ok()?
        .filter(|t| !t.trim().is_empty())
}

/// Get admin info from localStorage; unreadable data counts as absent
pub fn get_admin() -> Option<AdminInfo> {
    let json = get_local_storage()?.get_item(ADMIN_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(admin) => Some(admin),
        Err(e) => {
            log::warn!("stored admin info ignored: {}", e);
            None
        }
    }
}

/// Clear token and admin info
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(ADMIN_KEY);
    }
}
