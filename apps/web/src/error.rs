//! Errors raised while binding the game to the page.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no window object")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("missing element #{0}")]
    MissingElement(String),

    #[error("element #{0} has the wrong type")]
    WrongElement(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("console logger unavailable: {0}")]
    Logger(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DriverError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        DriverError::Dom(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DriverError> for wasm_bindgen::JsValue {
    fn from(error: DriverError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}
