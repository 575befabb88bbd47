//! Data models for Readon.
//!
//! This module defines the persisted configuration document:
//! - `Site` - One external destination a repository can be opened in
//! - `Chord` - A keyboard shortcut attached to a site
//! - `Settings` - Global preferences
//! - `Configuration` - The whole synced document
//!
//! Plus the input types accepted by the manager (`NewSite`, `SitePatch`,
//! `SettingsPatch`). Field names serialize in camelCase so the document is
//! shared verbatim with the extension's JavaScript side.

use crate::Error;
use crate::registry::REPO_PATH_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of destination a site offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Source browsing (online editors, code search)
    Source,
    /// AI generated repository summaries
    Ai,
}

impl Category {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Source => "source",
            Category::Ai => "ai",
        }
    }

    /// Human-facing group label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Source => "Source code",
            Category::Ai => "AI analysis",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(Category::Source),
            "ai" => Ok(Category::Ai),
            _ => Err(Error::Validation(format!(
                "category must be 'source' or 'ai', got: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A modifier key that can take part in a shortcut.
///
/// Variants are declared in lexicographic order of their names, so the
/// derived `Ord` matches the canonical chord ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Alt,
    Ctrl,
    Meta,
    Shift,
}

impl Modifier {
    /// Every modifier, in canonical order.
    pub const ALL: [Modifier; 4] = [Modifier::Alt, Modifier::Ctrl, Modifier::Meta, Modifier::Shift];

    /// Parse a modifier name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "alt" => Some(Modifier::Alt),
            "ctrl" => Some(Modifier::Ctrl),
            "meta" => Some(Modifier::Meta),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Alt => "alt",
            Modifier::Ctrl => "ctrl",
            Modifier::Meta => "meta",
            Modifier::Shift => "shift",
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A keyboard shortcut: a main key plus a set of modifiers.
///
/// Two chords are the same shortcut iff their canonical strings
/// (see [`crate::shortcuts::format_shortcut_string`]) are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    /// Main key token (`"1"`, `"k"`, `"F5"`)
    pub key: String,
    /// Modifier keys that must be held
    pub modifiers: Vec<Modifier>,
    /// Whether this shortcut is active
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Chord {
    /// Create an enabled chord.
    pub fn new(key: impl Into<String>, modifiers: &[Modifier]) -> Self {
        Self {
            key: key.into(),
            modifiers: modifiers.to_vec(),
            enabled: true,
        }
    }

    /// Same chord with the given enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Canonical string form, e.g. `ctrl+shift+1`.
    pub fn canonical(&self) -> String {
        crate::shortcuts::format_shortcut_string(self)
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// One external destination a repository can be opened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Source browsing or AI analysis
    pub category: Category,
    /// URL containing the `{REPO_PATH}` placeholder
    pub url_template: String,
    /// Icon identifier
    pub icon: String,
    /// Whether the site is offered for default use and shortcuts
    pub enabled: bool,
    /// Display and priority ordering (not necessarily unique)
    pub order: i64,
    /// Shipped defaults can be disabled but never deleted
    #[serde(default)]
    pub is_built_in: bool,
    /// Optional keyboard shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Chord>,
}

impl Site {
    /// Whether the site was added by the user.
    pub fn is_custom(&self) -> bool {
        !self.is_built_in
    }

    /// The site's shortcut, if it has one and it is enabled.
    pub fn active_shortcut(&self) -> Option<&Chord> {
        self.shortcuts.as_ref().filter(|chord| chord.enabled)
    }

    /// Build the URL for a repository path (`owner/repo`).
    ///
    /// Only the first placeholder is substituted; the path is inserted as-is.
    pub fn url_for(&self, repo_path: &str) -> String {
        self.url_template.replacen(REPO_PATH_PLACEHOLDER, repo_path, 1)
    }
}

/// Global preferences.
///
/// Missing fields in a stored document take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Site used by the main button and `readon open`
    pub default_site_id: String,
    /// Open destinations in a new tab
    pub open_in_new_tab: bool,
    /// Reveal the site menu on hover (stored, currently unused)
    pub show_on_hover: bool,
    /// Master switch for keyboard shortcuts
    pub enable_shortcuts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        crate::registry::default_settings()
    }
}

/// The whole persisted configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub sites: Vec<Site>,
    pub settings: Settings,
    pub version: String,
}

impl Configuration {
    /// Look up a site by id.
    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    /// Look up a site by id, mutably.
    pub fn site_mut(&mut self, id: &str) -> Option<&mut Site> {
        self.sites.iter_mut().find(|s| s.id == id)
    }

    /// Number of user-added sites.
    pub fn custom_site_count(&self) -> usize {
        self.sites.iter().filter(|s| s.is_custom()).count()
    }

    /// Highest `order` value, or 0 when there are no sites.
    pub fn max_order(&self) -> i64 {
        self.sites.iter().map(|s| s.order).max().unwrap_or(0)
    }
}

/// Input for adding a custom site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub url_template: String,
    pub icon: String,
}

/// Partial update of a site. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub url_template: Option<String>,
    pub icon: Option<String>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

impl SitePatch {
    /// Patch that only flips `enabled`.
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    /// Apply this patch onto a site (shallow merge).
    pub fn apply(&self, site: &mut Site) {
        if let Some(ref name) = self.name {
            site.name = name.clone();
        }
        if let Some(ref description) = self.description {
            site.description = description.clone();
        }
        if let Some(category) = self.category {
            site.category = category;
        }
        if let Some(ref url_template) = self.url_template {
            site.url_template = url_template.clone();
        }
        if let Some(ref icon) = self.icon {
            site.icon = icon.clone();
        }
        if let Some(enabled) = self.enabled {
            site.enabled = enabled;
        }
        if let Some(order) = self.order {
            site.order = order;
        }
    }
}

/// Partial update of the global settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub default_site_id: Option<String>,
    pub open_in_new_tab: Option<bool>,
    pub show_on_hover: Option<bool>,
    pub enable_shortcuts: Option<bool>,
}

impl SettingsPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.default_site_id.is_none()
            && self.open_in_new_tab.is_none()
            && self.show_on_hover.is_none()
            && self.enable_shortcuts.is_none()
    }

    /// Apply this patch onto settings (shallow merge).
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref id) = self.default_site_id {
            settings.default_site_id = id.clone();
        }
        if let Some(v) = self.open_in_new_tab {
            settings.open_in_new_tab = v;
        }
        if let Some(v) = self.show_on_hover {
            settings.show_on_hover = v;
        }
        if let Some(v) = self.enable_shortcuts {
            settings.enable_shortcuts = v;
        }
    }
}
