//! Browser console logging with the plugin's tag.
//!
//! Calls are compiled out on native targets so unit tests never touch JS.

const TAG: &str = "[AI Cover]";

pub fn info(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!("{} {}", TAG, message)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (TAG, message);
}

pub fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!("{} {}", TAG, message)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (TAG, message);
}

pub fn error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(&format!("{} {}", TAG, message)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (TAG, message);
}
