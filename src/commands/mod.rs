//! Command implementations for the Readon CLI.
//!
//! Each command runs against a [`ConfigManager`] and returns a result type
//! that can be rendered as JSON (default) or for humans (`-H`).

use crate::dispatch::{KeyEvent, Navigation};
use crate::manager::ConfigManager;
use crate::models::{
    Category, Chord, Configuration, NewSite, Settings, SettingsPatch, Site, SitePatch,
};
use crate::repo::RepoPath;
use crate::shortcuts;
use crate::storage::SyncStore;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

fn describe_site(site: &Site) -> String {
    let mut line = format!(
        "{:>3}. {} ({}) [{}]",
        site.order, site.name, site.id, site.category
    );
    if !site.enabled {
        line.push_str(" (disabled)");
    }
    if let Some(chord) = &site.shortcuts {
        let _ = write!(line, "  {}", chord.canonical());
        if !chord.enabled {
            line.push_str(" (off)");
        }
    }
    line
}

fn parse_chord(s: &str) -> Result<Chord> {
    shortcuts::parse_shortcut_string(s).ok_or_else(|| {
        Error::Validation(format!(
            "invalid chord '{}': expected modifier+...+key, e.g. ctrl+shift+6",
            s
        ))
    })
}

// ============================================================================
// Sites
// ============================================================================

/// A list of sites.
#[derive(Serialize)]
pub struct SiteList {
    pub count: usize,
    pub sites: Vec<Site>,
}

impl Output for SiteList {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.sites.is_empty() {
            return "No sites.".to_string();
        }
        let mut lines = vec![format!("{} site(s):", self.count)];
        lines.extend(self.sites.iter().map(describe_site));
        lines.join("\n")
    }
}

/// A single site.
#[derive(Serialize)]
#[serde(transparent)]
pub struct SiteResult(pub Site);

impl Output for SiteResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let site = &self.0;
        let mut out = describe_site(site);
        let _ = write!(out, "\n     url: {}", site.url_template);
        if !site.description.is_empty() {
            let _ = write!(out, "\n     {}", site.description);
        }
        let _ = write!(
            out,
            "\n     {}, {}",
            site.category.label(),
            if site.is_built_in { "built-in" } else { "custom" }
        );
        out
    }
}

/// Outcome of a mutation without a richer payload.
#[derive(Serialize)]
pub struct Message {
    pub ok: bool,
    pub message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

impl Output for Message {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// List sites, optionally including disabled ones or one category.
pub fn site_list<S: SyncStore>(
    manager: &ConfigManager<S>,
    all: bool,
    category: Option<&str>,
) -> Result<SiteList> {
    let category = category.map(str::parse::<Category>).transpose()?;
    let sites: Vec<Site> = if all {
        manager.get_all_sites()?
    } else {
        manager.get_enabled_sites()?
    }
    .into_iter()
    .filter(|s| category.is_none_or(|c| s.category == c))
    .collect();
    Ok(SiteList {
        count: sites.len(),
        sites,
    })
}

/// Show a site.
pub fn site_show<S: SyncStore>(manager: &ConfigManager<S>, id: &str) -> Result<SiteResult> {
    Ok(SiteResult(manager.get_site(id)?))
}

/// Add a custom site.
pub fn site_add<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    name: String,
    url: String,
    category: &str,
    icon: String,
    description: String,
) -> Result<SiteResult> {
    let input = NewSite {
        name,
        description,
        category: category.parse::<Category>()?,
        url_template: url,
        icon,
    };
    Ok(SiteResult(manager.add_site(input)?))
}

/// Update fields of a site.
pub fn site_update<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    id: &str,
    patch: SitePatchArgs,
) -> Result<SiteResult> {
    let patch = SitePatch {
        name: patch.name,
        description: patch.description,
        category: patch.category.as_deref().map(str::parse::<Category>).transpose()?,
        url_template: patch.url,
        icon: patch.icon,
        enabled: None,
        order: None,
    };
    Ok(SiteResult(manager.update_site(id, patch)?))
}

/// Raw `site update` arguments.
#[derive(Debug, Default)]
pub struct SitePatchArgs {
    pub name: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// Delete a custom site.
pub fn site_rm<S: SyncStore>(manager: &mut ConfigManager<S>, id: &str) -> Result<Message> {
    manager.delete_site(id)?;
    Ok(Message::new(format!("Deleted site {}", id)))
}

/// Enable or disable a site.
pub fn site_toggle<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    id: &str,
    enabled: bool,
) -> Result<SiteResult> {
    Ok(SiteResult(manager.toggle_site(id, enabled)?))
}

/// Reorder sites.
pub fn site_reorder<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    ids: &[String],
) -> Result<SiteList> {
    let sites = manager.reorder_sites(ids)?;
    Ok(SiteList {
        count: sites.len(),
        sites,
    })
}

// ============================================================================
// Shortcuts
// ============================================================================

/// One active shortcut.
#[derive(Serialize)]
pub struct ShortcutEntry {
    pub shortcut: String,
    pub site_id: String,
    pub site_name: String,
}

/// Active shortcuts, by canonical chord.
#[derive(Serialize)]
pub struct ShortcutList {
    pub enabled: bool,
    pub shortcuts: Vec<ShortcutEntry>,
}

impl Output for ShortcutList {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if !self.enabled {
            lines.push("Shortcuts are disabled in settings.".to_string());
        }
        if self.shortcuts.is_empty() {
            lines.push("No active shortcuts.".to_string());
        }
        for entry in &self.shortcuts {
            lines.push(format!("{:<18} {} ({})", entry.shortcut, entry.site_name, entry.site_id));
        }
        lines.join("\n")
    }
}

/// Suggested free chord.
#[derive(Serialize)]
pub struct Suggestion {
    pub shortcut: Option<String>,
    pub chord: Option<Chord>,
}

impl Output for Suggestion {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match &self.shortcut {
            Some(s) => s.clone(),
            None => "No free ctrl+shift+<digit> shortcut.".to_string(),
        }
    }
}

/// List active shortcuts.
pub fn shortcut_list<S: SyncStore>(manager: &ConfigManager<S>) -> Result<ShortcutList> {
    let enabled = manager.get_settings()?.enable_shortcuts;
    let shortcuts = manager
        .get_shortcut_mapping()?
        .into_iter()
        .map(|(shortcut, site)| ShortcutEntry {
            shortcut,
            site_id: site.id,
            site_name: site.name,
        })
        .collect();
    Ok(ShortcutList { enabled, shortcuts })
}

/// Assign a shortcut.
pub fn shortcut_set<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    id: &str,
    chord: &str,
    disabled: bool,
) -> Result<SiteResult> {
    let chord = parse_chord(chord)?.with_enabled(!disabled);
    Ok(SiteResult(manager.update_site_shortcut(id, Some(chord))?))
}

/// Remove a shortcut.
pub fn shortcut_clear<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    id: &str,
) -> Result<SiteResult> {
    Ok(SiteResult(manager.update_site_shortcut(id, None)?))
}

/// Suggest a free chord.
pub fn shortcut_suggest<S: SyncStore>(
    manager: &ConfigManager<S>,
    exclude: Option<&str>,
) -> Result<Suggestion> {
    let chord = manager.get_suggested_shortcut(exclude)?;
    Ok(Suggestion {
        shortcut: chord.as_ref().map(Chord::canonical),
        chord,
    })
}

// ============================================================================
// Settings
// ============================================================================

/// Global settings.
#[derive(Serialize)]
#[serde(transparent)]
pub struct SettingsResult(pub Settings);

impl Output for SettingsResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let s = &self.0;
        format!(
            "default site:    {}\nopen in new tab: {}\nshow on hover:   {}\nshortcuts:       {}",
            s.default_site_id, s.open_in_new_tab, s.show_on_hover, s.enable_shortcuts
        )
    }
}

/// Show settings.
pub fn settings_show<S: SyncStore>(manager: &ConfigManager<S>) -> Result<SettingsResult> {
    Ok(SettingsResult(manager.get_settings()?))
}

/// Change settings.
pub fn settings_set<S: SyncStore>(
    manager: &mut ConfigManager<S>,
    patch: SettingsPatch,
) -> Result<SettingsResult> {
    if patch.is_empty() {
        return Err(Error::Validation(
            "nothing to change: pass at least one setting".to_string(),
        ));
    }
    Ok(SettingsResult(manager.update_settings(patch)?))
}

// ============================================================================
// URLs and dispatch
// ============================================================================

/// A generated destination URL.
#[derive(Serialize)]
pub struct UrlResult {
    pub site_id: String,
    pub repo: String,
    pub url: String,
}

impl Output for UrlResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        self.url.clone()
    }
}

/// URL of a repository on a site.
pub fn url<S: SyncStore>(
    manager: &ConfigManager<S>,
    site_id: &str,
    repo: &str,
) -> Result<UrlResult> {
    let repo = RepoPath::parse(repo)?;
    let site = manager.get_site(site_id)?;
    Ok(UrlResult {
        url: ConfigManager::<S>::generate_site_url(&site, &repo.as_path()),
        site_id: site.id,
        repo: repo.as_path(),
    })
}

/// URL of a repository on the default site.
pub fn open<S: SyncStore>(manager: &ConfigManager<S>, repo: &str) -> Result<UrlResult> {
    let repo = RepoPath::parse(repo)?;
    let site = manager
        .get_default_site()?
        .ok_or_else(|| Error::NotFound("no enabled site".to_string()))?;
    Ok(UrlResult {
        url: site.url_for(&repo.as_path()),
        site_id: site.id,
        repo: repo.as_path(),
    })
}

/// Outcome of a simulated key-down.
#[derive(Serialize)]
pub struct KeyResult {
    pub shortcut: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
}

impl Output for KeyResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match &self.navigation {
            Some(nav) => format!(
                "{} -> {} {}{}",
                self.shortcut,
                nav.site_name,
                nav.url,
                if nav.open_in_new_tab { " (new tab)" } else { "" }
            ),
            None => format!("{} -> no match", self.shortcut),
        }
    }
}

/// Run the dispatch rule for a chord pressed on a repository page.
pub fn key<S: SyncStore>(manager: &ConfigManager<S>, chord: &str, repo: &str) -> Result<KeyResult> {
    let repo = RepoPath::parse(repo)?;
    let chord = parse_chord(chord)?;
    let event = KeyEvent::from_chord(&chord);
    let navigation = manager.dispatch_key_event(&event, &repo.as_path())?;
    Ok(KeyResult {
        shortcut: chord.canonical(),
        matched: navigation.is_some(),
        navigation,
    })
}

// ============================================================================
// Whole document
// ============================================================================

/// A configuration document.
#[derive(Serialize)]
#[serde(transparent)]
pub struct ConfigResult(pub Configuration);

impl Output for ConfigResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Configuration {} with {} site(s) ({} custom)",
            self.0.version,
            self.0.sites.len(),
            self.0.custom_site_count()
        )
    }
}

/// Export the configuration snapshot text.
pub fn export<S: SyncStore>(manager: &ConfigManager<S>) -> Result<String> {
    manager.export_config()
}

/// Import a snapshot.
pub fn import<S: SyncStore>(manager: &mut ConfigManager<S>, text: &str) -> Result<ConfigResult> {
    Ok(ConfigResult(manager.import_config(text)?))
}

/// Restore defaults (or wipe the stored document).
pub fn reset<S: SyncStore>(manager: &mut ConfigManager<S>, wipe: bool) -> Result<Message> {
    if wipe {
        manager.clear_all()?;
        Ok(Message::new("Stored configuration removed"))
    } else {
        manager.reset_to_default()?;
        Ok(Message::new("Configuration reset to defaults"))
    }
}
