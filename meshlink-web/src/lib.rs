/// meshlink web - browser bindings for the meshlink geometry core
///
/// Realizes core drawables and scene configuration as three.js objects and
/// exposes the exchange helpers (STL, PLY, CSV, downloads, file reads) to
/// JavaScript under camelCase names.

use wasm_bindgen::prelude::*;

pub mod api;
pub mod download;
pub mod file;
pub mod realize;
pub mod scene;
pub mod three;

/// Convert a core error into a thrown JS `Error`
pub(crate) fn to_js(err: meshlink_core::Error) -> JsValue {
    log::error!("{}", err);
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second start in the same page leaves the first logger in place
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("meshlink web {} ready", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}
