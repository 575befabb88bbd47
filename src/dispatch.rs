//! Keyboard shortcut dispatch.
//!
//! The content script forwards every key-down it observes while shortcuts
//! are enabled. [`resolve`] turns the event into a canonical chord string
//! and looks it up in the mapping built by [`build_shortcut_mapping`]:
//!
//! 1. Events aimed at text inputs are ignored.
//! 2. Events without any modifier are ignored.
//! 3. The key is normalized (`F1`..`F12` upper-case, everything else
//!    lower-case), preferring the physical `code` when present.
//! 4. The canonical string is looked up; a hit means navigate.

use crate::models::{Chord, Modifier, Site};
use crate::shortcuts::format_parts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical chord string to the site it opens.
pub type ShortcutMapping = BTreeMap<String, Site>;

/// `<input>` types that do not accept typed text.
const NON_TEXT_INPUT_TYPES: &[&str] = &[
    "button", "checkbox", "color", "file", "hidden", "image", "radio", "range", "reset", "submit",
];

/// The element a key event was aimed at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTarget {
    /// Element tag name (`INPUT`, `textarea`, `div`, ...)
    pub tag_name: String,
    /// `type` attribute for `<input>` elements
    #[serde(default, rename = "type")]
    pub input_type: Option<String>,
    /// Whether the element is content-editable
    #[serde(default)]
    pub is_content_editable: bool,
}

impl EventTarget {
    /// Whether typing into this element would be hijacked by a shortcut.
    pub fn is_text_input(&self) -> bool {
        if self.is_content_editable {
            return true;
        }
        match self.tag_name.to_lowercase().as_str() {
            "textarea" | "select" => true,
            "input" => {
                let input_type = self
                    .input_type
                    .as_deref()
                    .unwrap_or("text")
                    .to_lowercase();
                !NON_TEXT_INPUT_TYPES.contains(&input_type.as_str())
            }
            _ => false,
        }
    }
}

/// A key-down event as reported by the browser.
///
/// Field names follow the DOM `KeyboardEvent` so the content script can
/// forward events unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// Logical key (`"1"`, `"!"`, `"K"`, `"F5"`)
    pub key: String,
    /// Physical key (`"Digit1"`, `"KeyK"`, `"F5"`)
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub target: Option<EventTarget>,
}

impl KeyEvent {
    /// The event a user pressing `chord` on the page body would produce.
    pub fn from_chord(chord: &Chord) -> Self {
        let has = |m: Modifier| chord.modifiers.contains(&m);
        Self {
            key: chord.key.clone(),
            code: None,
            ctrl_key: has(Modifier::Ctrl),
            alt_key: has(Modifier::Alt),
            shift_key: has(Modifier::Shift),
            meta_key: has(Modifier::Meta),
            target: None,
        }
    }

    /// Modifiers held during the event.
    pub fn modifiers(&self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        if self.ctrl_key {
            modifiers.push(Modifier::Ctrl);
        }
        if self.alt_key {
            modifiers.push(Modifier::Alt);
        }
        if self.shift_key {
            modifiers.push(Modifier::Shift);
        }
        if self.meta_key {
            modifiers.push(Modifier::Meta);
        }
        modifiers
    }

    fn targets_text_input(&self) -> bool {
        self.target.as_ref().is_some_and(EventTarget::is_text_input)
    }
}

/// Where a matched shortcut leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub site_id: String,
    pub site_name: String,
    pub shortcut: String,
    pub url: String,
    pub open_in_new_tab: bool,
    /// The browser's default handling of the key must be suppressed
    pub prevent_default: bool,
}

/// Parse `F1`..`F12` in any case.
fn function_key(s: &str) -> Option<String> {
    let rest = s.strip_prefix('F').or_else(|| s.strip_prefix('f'))?;
    match rest.parse::<u8>() {
        Ok(n @ 1..=12) if !rest.starts_with('0') => Some(format!("F{}", n)),
        _ => None,
    }
}

/// Key token from a physical `code` value, when it names a digit, letter,
/// or function key.
fn key_from_code(code: &str) -> Option<String> {
    if let Some(d) = code.strip_prefix("Digit") {
        if d.len() == 1 && d.chars().all(|c| c.is_ascii_digit()) {
            return Some(d.to_string());
        }
    }
    if let Some(l) = code.strip_prefix("Key") {
        if l.len() == 1 && l.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(l.to_lowercase());
        }
    }
    function_key(code)
}

/// Normalize an event key into a shortcut key token.
pub fn normalize_key(key: &str, code: Option<&str>) -> String {
    if let Some(from_code) = code.and_then(key_from_code) {
        return from_code;
    }
    function_key(key).unwrap_or_else(|| key.to_lowercase())
}

/// Canonical chord string for an event, or `None` when the event must be
/// left alone (text input target, no modifier held).
pub fn canonical_chord_for_event(event: &KeyEvent) -> Option<String> {
    if event.targets_text_input() {
        return None;
    }
    let modifiers = event.modifiers();
    if modifiers.is_empty() {
        return None;
    }
    let key = normalize_key(&event.key, event.code.as_deref());
    Some(format_parts(&modifiers, &key))
}

/// Look up the site an event triggers.
pub fn resolve<'a>(event: &KeyEvent, mapping: &'a ShortcutMapping) -> Option<&'a Site> {
    let canonical = canonical_chord_for_event(event)?;
    let site = mapping.get(&canonical);
    if let Some(site) = site {
        tracing::debug!(shortcut = %canonical, site = %site.id, "shortcut matched");
    }
    site
}

/// Map every active shortcut of an enabled site to that site.
///
/// Sites are visited by ascending `order`; if two sites share a chord the
/// later one wins. Uniqueness is enforced when shortcuts are assigned, not
/// here.
pub fn build_shortcut_mapping(sites: &[Site]) -> ShortcutMapping {
    let mut enabled: Vec<&Site> = sites.iter().filter(|s| s.enabled).collect();
    enabled.sort_by_key(|s| s.order);

    let mut mapping = ShortcutMapping::new();
    for site in enabled {
        if let Some(chord) = site.active_shortcut() {
            mapping.insert(chord.canonical(), site.clone());
        }
    }
    mapping
}
