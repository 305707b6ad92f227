//! Browser side of the society-services admin panel: HTTP client, admin
//! session, per-entity API calls and reactive list controllers.
//!
//! Pages and styling live outside this crate and drive it through
//! [`shared::list_controller::ListController`].

pub mod domain;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

use system::auth::AdminSession;

/// Logging, panic hook and the stored session
pub fn init() -> AdminSession {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    let session = AdminSession::restore();
    log::info!(
        "admin panel started (api: {}, logged in: {})",
        shared::api_utils::api_base(),
        session.bearer().is_some()
    );
    session
}

#[wasm_bindgen(start)]
pub fn start() {
    init();
}
