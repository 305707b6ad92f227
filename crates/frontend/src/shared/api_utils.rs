//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

/// Base URL fixed at build time (`ADMIN_API_BASE_URL=https://api.example.com trunk build`)
const BUILD_API_BASE: Option<&str> = option_env!("ADMIN_API_BASE_URL");

/// Get the base URL for API requests
///
/// Uses `ADMIN_API_BASE_URL` when it was set at build time, otherwise
/// derives it from the current window location with port 3000.
///
/// # Returns
/// - API base URL like "http://localhost:3000", without a trailing slash
/// - Empty string if window is not available
pub fn api_base() -> String {
    if let Some(base) = configured_base(BUILD_API_BASE) {
        return base;
    }

    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

fn configured_base(value: Option<&str>) -> Option<String> {
    let value = value?.trim().trim_end_matches('/');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url("/api/colonies");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Path segment for a record id
pub fn id_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
