//! WASM bindings for the extension's content script.
//!
//! The content script runs in the page and only needs the pure rules:
//! turning a key event into a canonical chord, looking it up in the
//! shortcut mapping, and extracting `owner/repo` from the page URL.
//! Storage stays on the JavaScript side; the mapping is passed in as JSON.
//!
//! ```javascript
//! import init, { resolveKeyEvent } from './readon.js';
//!
//! await init();
//! document.addEventListener('keydown', (e) => {
//!     const hit = JSON.parse(resolveKeyEvent(JSON.stringify(eventJson(e)), mappingJson));
//!     if (hit) { e.preventDefault(); window.open(hit.url); }
//! });
//! ```

mod bindings;

pub use bindings::*;

/// Initialize WASM panic hook for better error messages in browser console
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
