//! Browser front end for the memory game.
//!
//! - `api`: PokeAPI client used as the deck's sprite source
//! - `timers`: ownership of scheduled timer callbacks
//! - `app`: DOM driver that feeds page events into a game session (wasm only)

pub mod api;
pub mod error;
pub mod timers;

#[cfg(target_arch = "wasm32")]
mod app;

pub use api::PokeApiClient;
pub use error::DriverError;

/// Entry point run by the wasm-bindgen loader.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        let err = DriverError::Logger(e.to_string());
        web_sys::console::warn_1(&err.to_string().into());
    }

    log::info!("Memory game starting...");
    app::mount().map_err(wasm_bindgen::JsValue::from)
}
