//! JavaScript bindings for the content script.
//!
//! Every export exchanges JSON strings. The helpers behind them are plain
//! Rust functions returning `Result<String, String>` so they can be tested
//! on any target; the `#[wasm_bindgen]` wrappers only exist on wasm32.

use crate::dispatch::{self, KeyEvent, ShortcutMapping};
use crate::models::Chord;
use crate::repo::RepoPath;
use crate::shortcuts;
use serde::Serialize;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Navigation target handed back to the content script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Hit<'a> {
    site_id: &'a str,
    shortcut: String,
    url: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn chord_from_json(chord_json: &str) -> Result<Chord, String> {
    serde_json::from_str(chord_json).map_err(|e| format!("invalid chord: {}", e))
}

/// Canonical string of a chord given as JSON.
pub fn format_shortcut_json(chord_json: &str) -> Result<String, String> {
    Ok(shortcuts::format_shortcut_string(&chord_from_json(chord_json)?))
}

/// Parse a chord string into chord JSON (`null` when unparsable).
pub fn parse_shortcut_json(s: &str) -> Result<String, String> {
    to_json(&shortcuts::parse_shortcut_string(s))
}

/// Whether a chord given as JSON can be assigned.
pub fn validate_shortcut_json(chord_json: &str) -> Result<bool, String> {
    Ok(shortcuts::validate_shortcut(&chord_from_json(chord_json)?))
}

/// Resolve a DOM key event against a shortcut mapping.
///
/// Returns `null` for a miss, otherwise `{siteId, shortcut, url}`.
pub fn resolve_key_event_json(
    event_json: &str,
    mapping_json: &str,
    repo_path: &str,
) -> Result<String, String> {
    let event: KeyEvent =
        serde_json::from_str(event_json).map_err(|e| format!("invalid key event: {}", e))?;
    let mapping: ShortcutMapping =
        serde_json::from_str(mapping_json).map_err(|e| format!("invalid mapping: {}", e))?;

    let hit = dispatch::resolve(&event, &mapping).map(|site| Hit {
        site_id: &site.id,
        shortcut: site.active_shortcut().map(Chord::canonical).unwrap_or_default(),
        url: site.url_for(repo_path),
    });
    to_json(&hit)
}

/// `owner/repo` from a page URL, or `null` when the page is not a repository.
pub fn repo_path_from_url_json(url: &str) -> Result<String, String> {
    to_json(&RepoPath::parse(url).ok().map(|r| r.as_path()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = formatShortcut)]
pub fn format_shortcut(chord_json: &str) -> Result<String, JsValue> {
    format_shortcut_json(chord_json).map_err(|e| JsValue::from_str(&e))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = parseShortcut)]
pub fn parse_shortcut(s: &str) -> Result<String, JsValue> {
    parse_shortcut_json(s).map_err(|e| JsValue::from_str(&e))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = validateShortcut)]
pub fn validate_shortcut(chord_json: &str) -> Result<bool, JsValue> {
    validate_shortcut_json(chord_json).map_err(|e| JsValue::from_str(&e))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = resolveKeyEvent)]
pub fn resolve_key_event(
    event_json: &str,
    mapping_json: &str,
    repo_path: &str,
) -> Result<String, JsValue> {
    resolve_key_event_json(event_json, mapping_json, repo_path)
        .map_err(|e| JsValue::from_str(&e))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = repoPathFromUrl)]
pub fn repo_path_from_url(url: &str) -> Result<String, JsValue> {
    repo_path_from_url_json(url).map_err(|e| JsValue::from_str(&e))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    super::init_panic_hook();
}
