//! Keyboard shortcut rules.
//!
//! A chord's identity is its canonical string: modifiers deduplicated and
//! sorted lexicographically, then the key, all joined by `+`
//! (`[shift, ctrl] + "1"` becomes `ctrl+shift+1`). Every equality check and
//! lookup in the crate goes through [`format_shortcut_string`].

use crate::models::{Chord, Modifier, Site};
use crate::registry::{self, SUGGESTION_KEYS, SUGGESTION_MODIFIERS};
use std::collections::BTreeSet;

/// Canonical string for a chord.
pub fn format_shortcut_string(chord: &Chord) -> String {
    format_parts(&chord.modifiers, &chord.key)
}

/// Canonical string for a modifier set and key.
pub fn format_parts(modifiers: &[Modifier], key: &str) -> String {
    let sorted: BTreeSet<Modifier> = modifiers.iter().copied().collect();
    let mut parts: Vec<&str> = sorted.iter().map(|m| m.as_str()).collect();
    parts.push(key);
    parts.join("+")
}

/// Parse a canonical (or any `+`-joined) chord string.
///
/// The last token is the key and the rest are modifiers. Returns `None` for
/// fewer than two tokens or an unknown modifier name. The result is enabled.
pub fn parse_shortcut_string(s: &str) -> Option<Chord> {
    let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
    if tokens.len() < 2 {
        return None;
    }
    let (key, modifier_tokens) = tokens.split_last()?;
    let modifiers = modifier_tokens
        .iter()
        .map(|t| Modifier::parse(t))
        .collect::<Option<Vec<_>>>()?;
    Some(Chord::new(*key, &modifiers))
}

/// Whether a chord can be assigned: at least one allowed modifier and an
/// allowed key (digit, lowercase letter, or `F1`..`F12`).
pub fn validate_shortcut(chord: &Chord) -> bool {
    !chord.modifiers.is_empty()
        && chord
            .modifiers
            .iter()
            .all(|m| registry::ALLOWED_MODIFIERS.contains(m))
        && registry::is_allowed_key(&chord.key)
}

/// Sites other than `exclude_id` whose active shortcut matches `chord`.
pub fn check_shortcut_conflicts<'a>(
    sites: &'a [Site],
    exclude_id: Option<&str>,
    chord: &Chord,
) -> Vec<&'a Site> {
    let wanted = format_shortcut_string(chord);
    sites
        .iter()
        .filter(|site| Some(site.id.as_str()) != exclude_id)
        .filter(|site| {
            site.active_shortcut()
                .is_some_and(|c| format_shortcut_string(c) == wanted)
        })
        .collect()
}

/// First free `ctrl+shift+<digit>` chord, scanning `1`..`9` then `0`.
///
/// A combination is taken when an enabled site other than `exclude_id` holds
/// it as an active shortcut. Chords of disabled sites count as free.
pub fn get_suggested_shortcut(sites: &[Site], exclude_id: Option<&str>) -> Option<Chord> {
    let enabled: Vec<Site> = sites.iter().filter(|s| s.enabled).cloned().collect();
    SUGGESTION_KEYS
        .iter()
        .map(|key| Chord::new(*key, &SUGGESTION_MODIFIERS))
        .find(|candidate| check_shortcut_conflicts(&enabled, exclude_id, candidate).is_empty())
}
