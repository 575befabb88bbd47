//! Configuration manager: the public API over the stored configuration.
//!
//! Every operation loads the whole document, applies its business rule,
//! and saves the whole document back (at most one read and one write).
//! There is no locking; when two writers overlap the last save wins.

use crate::dispatch::{self, KeyEvent, Navigation, ShortcutMapping};
use crate::models::{
    Category, Chord, Configuration, NewSite, Settings, SettingsPatch, Site, SitePatch,
};
use crate::registry::{self, MAX_CUSTOM_SITES};
use crate::shortcuts;
use crate::storage::{ConfigStore, SyncStore};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `http(s)://` followed somewhere by the `{REPO_PATH}` placeholder.
static URL_TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://.*\{REPO_PATH\}").expect("URL template pattern is valid")
});

/// Enabled sites split by category, each in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SitesByCategory {
    pub source: Vec<Site>,
    pub ai: Vec<Site>,
}

/// Stateless service over an injected sync store.
#[derive(Debug)]
pub struct ConfigManager<S: SyncStore> {
    storage: ConfigStore<S>,
}

impl<S: SyncStore> ConfigManager<S> {
    /// Create a manager over a sync store.
    pub fn new(store: S) -> Self {
        Self {
            storage: ConfigStore::new(store),
        }
    }

    /// Borrow the persistence adapter.
    pub fn storage(&self) -> &ConfigStore<S> {
        &self.storage
    }

    /// Load the current configuration.
    pub fn load(&self) -> Result<Configuration> {
        self.storage.load()
    }

    // ---------------------------------------------------------------------
    // Sites
    // ---------------------------------------------------------------------

    /// All sites, sorted by `order`.
    pub fn get_all_sites(&self) -> Result<Vec<Site>> {
        let mut sites = self.load()?.sites;
        sites.sort_by_key(|s| s.order);
        Ok(sites)
    }

    /// A single site by id.
    pub fn get_site(&self, id: &str) -> Result<Site> {
        self.load()?
            .site(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Enabled sites, sorted by `order`.
    pub fn get_enabled_sites(&self) -> Result<Vec<Site>> {
        Ok(enabled_sorted(&self.load()?.sites))
    }

    /// Enabled sites split into source and AI buckets.
    pub fn get_sites_by_category(&self) -> Result<SitesByCategory> {
        let (source, ai): (Vec<Site>, Vec<Site>) = self
            .get_enabled_sites()?
            .into_iter()
            .partition(|s| s.category == Category::Source);
        Ok(SitesByCategory { source, ai })
    }

    /// Number of user-added sites.
    pub fn custom_site_count(&self) -> Result<usize> {
        Ok(self.load()?.custom_site_count())
    }

    /// Add a custom site, stamping its id with the current time.
    pub fn add_site(&mut self, input: NewSite) -> Result<Site> {
        self.add_site_at(input, Utc::now())
    }

    /// Add a custom site whose id is derived from `name` and `created_at`.
    pub fn add_site_at(&mut self, input: NewSite, created_at: DateTime<Utc>) -> Result<Site> {
        let mut config = self.load()?;

        if config.custom_site_count() >= MAX_CUSTOM_SITES {
            return Err(Error::LimitExceeded(MAX_CUSTOM_SITES));
        }
        validate_name(&input.name)?;
        validate_url_template(&input.url_template)?;
        validate_icon(&input.icon)?;

        let id = generate_site_id(&input.name, created_at);
        if config.site(&id).is_some() {
            return Err(Error::DuplicateId(id));
        }

        let site = Site {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            category: input.category,
            url_template: input.url_template,
            icon: input.icon,
            enabled: true,
            order: config.max_order() + 1,
            is_built_in: false,
            shortcuts: None,
        };
        config.sites.push(site.clone());
        self.storage.save(&config)?;
        tracing::debug!(id = %site.id, "added site");
        Ok(site)
    }

    /// Shallow-merge `patch` onto a site, validating the fields it sets.
    pub fn update_site(&mut self, id: &str, mut patch: SitePatch) -> Result<Site> {
        let mut config = self.load()?;
        let site = config
            .site_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(ref mut name) = patch.name {
            validate_name(name)?;
            *name = name.trim().to_string();
        }
        if let Some(ref url_template) = patch.url_template {
            validate_url_template(url_template)?;
        }
        if let Some(ref icon) = patch.icon {
            validate_icon(icon)?;
        }

        patch.apply(site);
        let updated = site.clone();
        self.storage.save(&config)?;
        Ok(updated)
    }

    /// Delete a custom site. Built-in sites can only be disabled.
    pub fn delete_site(&mut self, id: &str) -> Result<()> {
        let mut config = self.load()?;
        let site = config
            .site(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if site.is_built_in {
            return Err(Error::Immutable(id.to_string()));
        }
        config.sites.retain(|s| s.id != id);
        self.storage.save(&config)?;
        tracing::debug!(id, "deleted site");
        Ok(())
    }

    /// Enable or disable a site.
    pub fn toggle_site(&mut self, id: &str, enabled: bool) -> Result<Site> {
        self.update_site(id, SitePatch::enabled(enabled))
    }

    /// Give the listed sites orders 1..N in sequence; unlisted sites follow
    /// in their previous relative order. Returns all sites in new order.
    pub fn reorder_sites(&mut self, ordered_ids: &[String]) -> Result<Vec<Site>> {
        let mut config = self.load()?;

        let mut seen = HashSet::new();
        for id in ordered_ids {
            if config.site(id).is_none() {
                return Err(Error::NotFound(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(Error::Validation(format!("site listed twice: {}", id)));
            }
        }

        let mut rest: Vec<Site> = config
            .sites
            .iter()
            .filter(|s| !seen.contains(s.id.as_str()))
            .cloned()
            .collect();
        rest.sort_by_key(|s| s.order);

        let mut reordered: Vec<Site> = ordered_ids
            .iter()
            .filter_map(|id| config.site(id).cloned())
            .collect();
        reordered.extend(rest);
        for (i, site) in reordered.iter_mut().enumerate() {
            site.order = i as i64 + 1;
        }

        config.sites = reordered;
        self.storage.save(&config)?;
        Ok(config.sites)
    }

    /// Substitute the repository path into a site's URL template.
    pub fn generate_site_url(site: &Site, repo_path: &str) -> String {
        site.url_for(repo_path)
    }

    // ---------------------------------------------------------------------
    // Shortcuts
    // ---------------------------------------------------------------------

    /// Assign (or clear, with `None`) a site's shortcut.
    ///
    /// An enabled chord already active on another site is refused with the
    /// names of every conflicting site.
    pub fn update_site_shortcut(&mut self, id: &str, chord: Option<Chord>) -> Result<Site> {
        let mut config = self.load()?;
        if config.site(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }

        if let Some(ref chord) = chord {
            if !shortcuts::validate_shortcut(chord) {
                return Err(Error::Validation(format!(
                    "invalid shortcut: {} (needs a ctrl/alt/shift/meta modifier and a digit, lowercase letter or F1-F12)",
                    chord.canonical()
                )));
            }
            if chord.enabled {
                let conflicts = shortcuts::check_shortcut_conflicts(&config.sites, Some(id), chord);
                if !conflicts.is_empty() {
                    return Err(Error::Conflict {
                        shortcut: chord.canonical(),
                        sites: conflicts.iter().map(|s| s.name.clone()).collect(),
                    });
                }
            }
        }

        let site = config
            .site_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        site.shortcuts = chord;
        let updated = site.clone();
        self.storage.save(&config)?;
        Ok(updated)
    }

    /// Canonical chord string to site, over enabled sites with an active
    /// shortcut.
    pub fn get_shortcut_mapping(&self) -> Result<ShortcutMapping> {
        Ok(dispatch::build_shortcut_mapping(&self.load()?.sites))
    }

    /// Sites other than `exclude_id` whose active shortcut equals `chord`.
    pub fn check_shortcut_conflicts<'a>(
        all_sites: &'a [Site],
        exclude_id: Option<&str>,
        chord: &Chord,
    ) -> Vec<&'a Site> {
        shortcuts::check_shortcut_conflicts(all_sites, exclude_id, chord)
    }

    /// Canonical string of a chord.
    pub fn format_shortcut_string(chord: &Chord) -> String {
        shortcuts::format_shortcut_string(chord)
    }

    /// Parse a chord string.
    pub fn parse_shortcut_string(s: &str) -> Option<Chord> {
        shortcuts::parse_shortcut_string(s)
    }

    /// Whether a chord can be assigned.
    pub fn validate_shortcut(chord: &Chord) -> bool {
        shortcuts::validate_shortcut(chord)
    }

    /// First free `ctrl+shift+<digit>` chord for `exclude_id`.
    pub fn get_suggested_shortcut(&self, exclude_id: Option<&str>) -> Result<Option<Chord>> {
        Ok(shortcuts::get_suggested_shortcut(&self.load()?.sites, exclude_id))
    }

    /// Run the dispatch rule for a key-down on a repository page.
    ///
    /// Returns `None` when shortcuts are globally disabled or nothing
    /// matches.
    pub fn dispatch_key_event(
        &self,
        event: &KeyEvent,
        repo_path: &str,
    ) -> Result<Option<Navigation>> {
        let config = self.load()?;
        if !config.settings.enable_shortcuts {
            return Ok(None);
        }
        let mapping = dispatch::build_shortcut_mapping(&config.sites);
        let Some(site) = dispatch::resolve(event, &mapping) else {
            return Ok(None);
        };
        Ok(Some(Navigation {
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            shortcut: site
                .active_shortcut()
                .map(Chord::canonical)
                .unwrap_or_default(),
            url: site.url_for(repo_path),
            open_in_new_tab: config.settings.open_in_new_tab,
            prevent_default: true,
        }))
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Current global settings.
    pub fn get_settings(&self) -> Result<Settings> {
        Ok(self.load()?.settings)
    }

    /// Shallow-merge a settings patch. The default site must exist.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings> {
        let mut config = self.load()?;
        if let Some(ref id) = patch.default_site_id {
            if config.site(id).is_none() {
                return Err(Error::NotFound(id.clone()));
            }
        }
        patch.apply(&mut config.settings);
        self.storage.save(&config)?;
        Ok(config.settings)
    }

    /// The site used by default: the configured one when it exists and is
    /// enabled, otherwise the first enabled site.
    pub fn get_default_site(&self) -> Result<Option<Site>> {
        let config = self.load()?;
        let configured = config
            .site(&config.settings.default_site_id)
            .filter(|s| s.enabled)
            .cloned();
        Ok(configured.or_else(|| enabled_sorted(&config.sites).into_iter().next()))
    }

    // ---------------------------------------------------------------------
    // Whole-document operations
    // ---------------------------------------------------------------------

    /// Replace the configuration with the defaults.
    pub fn reset_to_default(&mut self) -> Result<Configuration> {
        let config = registry::default_configuration();
        self.storage.save(&config)?;
        tracing::info!("configuration reset to defaults");
        Ok(config)
    }

    /// Remove every stored key (next load yields the defaults).
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.clear()?;
        tracing::info!("stored configuration cleared");
        Ok(())
    }

    /// Export the configuration as a timestamped JSON snapshot.
    pub fn export_config(&self) -> Result<String> {
        self.storage.export_snapshot()
    }

    /// Import a snapshot, merging it onto the defaults.
    pub fn import_config(&mut self, text: &str) -> Result<Configuration> {
        self.storage.import_snapshot(text)
    }
}

fn enabled_sorted(sites: &[Site]) -> Vec<Site> {
    let mut enabled: Vec<Site> = sites.iter().filter(|s| s.enabled).cloned().collect();
    enabled.sort_by_key(|s| s.order);
    enabled
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("site name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_url_template(template: &str) -> Result<()> {
    if !URL_TEMPLATE_RE.is_match(template) {
        return Err(Error::Validation(format!(
            "URL template must start with http:// or https:// and contain {}: {}",
            registry::REPO_PATH_PLACEHOLDER,
            template
        )));
    }
    Ok(())
}

fn validate_icon(icon: &str) -> Result<()> {
    if icon.trim().is_empty() {
        return Err(Error::Validation("site icon cannot be empty".to_string()));
    }
    Ok(())
}

/// Generate a custom site id from its name and creation time.
///
/// Format: `custom_<slug>_<unix millis>`
pub fn generate_site_id(name: &str, created_at: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug: String = if slug.is_empty() {
        "site".to_string()
    } else {
        slug.chars().take(24).collect()
    };
    format!("custom_{}_{}", slug, created_at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Modifier;
    use crate::storage::MemoryStore;
    use crate::test_utils::{memory_manager, new_site};
    use chrono::TimeZone;

    fn ctrl_shift(key: &str) -> Chord {
        Chord::new(key, &[Modifier::Ctrl, Modifier::Shift])
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    const BUILT_IN_IDS: [&str; 5] = ["github1s", "github_dev", "sourcegraph", "deepwiki", "zread"];

    // ==================== Id Tests ====================

    #[test]
    fn test_generate_site_id() {
        assert_eq!(
            generate_site_id("My Code Host!", at(1_700_000_000_000)),
            "custom_my_code_host_1700000000000"
        );
        assert_eq!(generate_site_id("  ***  ", at(5)), "custom_site_5");
    }

    // ==================== Add Tests ====================

    #[test]
    fn test_add_site_assigns_fields() {
        let mut manager = memory_manager();
        let site = manager.add_site_at(new_site("Mirror"), at(42)).unwrap();

        assert_eq!(site.id, "custom_mirror_42");
        assert!(!site.is_built_in);
        assert!(site.enabled);
        assert_eq!(site.order, 6);
        assert_eq!(manager.get_site("custom_mirror_42").unwrap(), site);
        assert_eq!(manager.custom_site_count().unwrap(), 1);
    }

    #[test]
    fn test_add_site_order_follows_max() {
        let mut manager = memory_manager();
        manager
            .update_site(
                "zread",
                SitePatch {
                    order: Some(40),
                    ..Default::default()
                },
            )
            .unwrap();
        let site = manager.add_site_at(new_site("Late"), at(1)).unwrap();
        assert_eq!(site.order, 41);
    }

    #[test]
    fn test_add_site_without_placeholder_is_rejected() {
        let mut manager = memory_manager();
        for template in [
            "https://example.com/",
            "https://example.com/{OWNER}",
            "ftp://example.com/{REPO_PATH}",
            "example.com/{REPO_PATH}",
        ] {
            let mut input = new_site("Bad");
            input.url_template = template.to_string();
            let result = manager.add_site(input);
            assert!(matches!(result, Err(Error::Validation(_))), "{}", template);
        }
        assert_eq!(manager.custom_site_count().unwrap(), 0);
    }

    #[test]
    fn test_add_site_accepts_template_with_spaces() {
        let mut manager = memory_manager();
        let mut input = new_site("Spaced");
        input.url_template = "https://x.test/{REPO_PATH}?q=a b".to_string();
        let site = manager.add_site(input).unwrap();
        assert_eq!(site.url_for("o/r"), "https://x.test/o/r?q=a b");
    }

    #[test]
    fn test_add_site_rejects_blank_name_and_icon() {
        let mut manager = memory_manager();
        let mut input = new_site("x");
        input.name = "   ".to_string();
        assert!(matches!(manager.add_site(input), Err(Error::Validation(_))));

        let mut input = new_site("x");
        input.icon = String::new();
        assert!(matches!(manager.add_site(input), Err(Error::Validation(_))));
    }

    #[test]
    fn test_add_site_limit() {
        let mut manager = memory_manager();
        for i in 0..MAX_CUSTOM_SITES {
            manager.add_site_at(new_site("Mirror"), at(i as i64)).unwrap();
        }
        let result = manager.add_site_at(new_site("One more"), at(999));
        assert!(matches!(result, Err(Error::LimitExceeded(n)) if n == MAX_CUSTOM_SITES));
    }

    #[test]
    fn test_add_site_duplicate_id() {
        let mut manager = memory_manager();
        manager.add_site_at(new_site("Twin"), at(7)).unwrap();
        let result = manager.add_site_at(new_site("Twin"), at(7));
        assert!(matches!(result, Err(Error::DuplicateId(_))));
        assert_eq!(result.unwrap_err().kind(), "conflict");
    }

    // ==================== Update / Delete Tests ====================

    #[test]
    fn test_update_site_merges_patch() {
        let mut manager = memory_manager();
        let updated = manager
            .update_site(
                "deepwiki",
                SitePatch {
                    name: Some("Deep Wiki".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Deep Wiki");
        assert_eq!(updated.url_template, "https://deepwiki.com/{REPO_PATH}");
        assert!(updated.is_built_in);
    }

    #[test]
    fn test_add_and_update_store_trimmed_names() {
        let mut manager = memory_manager();
        let site = manager.add_site_at(new_site("  Padded  "), at(9)).unwrap();
        assert_eq!(site.name, "Padded");

        let patch = SitePatch {
            name: Some("  Renamed  ".to_string()),
            ..Default::default()
        };
        let updated = manager.update_site(&site.id, patch).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(manager.get_site(&site.id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_update_site_validates_present_fields() {
        let mut manager = memory_manager();
        let patch = SitePatch {
            url_template: Some("https://nowhere.test".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            manager.update_site("zread", patch),
            Err(Error::Validation(_))
        ));
        assert_eq!(
            manager.get_site("zread").unwrap().url_template,
            "https://zread.ai/{REPO_PATH}"
        );
    }

    #[test]
    fn test_update_unknown_site() {
        let mut manager = memory_manager();
        let result = manager.update_site("nope", SitePatch::enabled(false));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_built_ins_cannot_be_deleted_but_can_be_disabled() {
        let mut manager = memory_manager();
        for id in BUILT_IN_IDS {
            assert!(matches!(manager.delete_site(id), Err(Error::Immutable(_))));
            let site = manager.toggle_site(id, false).unwrap();
            assert!(!site.enabled);
        }
        assert!(manager.get_enabled_sites().unwrap().is_empty());
        assert_eq!(manager.get_all_sites().unwrap().len(), 5);
    }

    #[test]
    fn test_delete_custom_site() {
        let mut manager = memory_manager();
        let site = manager.add_site_at(new_site("Gone"), at(3)).unwrap();
        manager.delete_site(&site.id).unwrap();
        assert!(matches!(manager.get_site(&site.id), Err(Error::NotFound(_))));
        assert!(matches!(manager.delete_site(&site.id), Err(Error::NotFound(_))));
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_reorder_sites_appends_unmentioned() {
        let mut manager = memory_manager();
        let ids = vec!["deepwiki".to_string(), "github1s".to_string()];
        let sites = manager.reorder_sites(&ids).unwrap();

        let order: Vec<(&str, i64)> = sites.iter().map(|s| (s.id.as_str(), s.order)).collect();
        assert_eq!(
            order,
            vec![
                ("deepwiki", 1),
                ("github1s", 2),
                ("github_dev", 3),
                ("sourcegraph", 4),
                ("zread", 5),
            ]
        );
        assert_eq!(manager.get_enabled_sites().unwrap()[0].id, "deepwiki");
    }

    #[test]
    fn test_reorder_three_sites() {
        // Only custom sites a, b, c
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.import_config(r#"{"sites": [], "settings": {}}"#).unwrap();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            manager.add_site_at(new_site(name), at(i as i64)).unwrap();
        }
        let a = "custom_a_0".to_string();
        let b = "custom_b_1".to_string();

        let sites = manager.reorder_sites(&[b, a]).unwrap();
        let order: Vec<(&str, i64)> = sites.iter().map(|s| (s.name.as_str(), s.order)).collect();
        assert_eq!(order, vec![("b", 1), ("a", 2), ("c", 3)]);
    }

    #[test]
    fn test_reorder_rejects_unknown_and_repeated_ids() {
        let mut manager = memory_manager();
        let before = manager.get_all_sites().unwrap();

        let result = manager.reorder_sites(&["zread".to_string(), "ghost".to_string()]);
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = manager.reorder_sites(&["zread".to_string(), "zread".to_string()]);
        assert!(matches!(result, Err(Error::Validation(_))));

        assert_eq!(manager.get_all_sites().unwrap(), before);
    }

    #[test]
    fn test_sites_by_category() {
        let mut manager = memory_manager();
        manager.toggle_site("sourcegraph", false).unwrap();
        let buckets = manager.get_sites_by_category().unwrap();
        let source: Vec<&str> = buckets.source.iter().map(|s| s.id.as_str()).collect();
        let ai: Vec<&str> = buckets.ai.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(source, vec!["github1s", "github_dev"]);
        assert_eq!(ai, vec!["deepwiki", "zread"]);
    }

    // ==================== URL Tests ====================

    #[test]
    fn test_generate_site_url_for_every_built_in() {
        let manager = memory_manager();
        for site in manager.get_all_sites().unwrap() {
            let url = ConfigManager::<MemoryStore>::generate_site_url(&site, "owner/repo");
            assert!(url.contains("owner/repo"), "{}", url);
            assert!(!url.contains(registry::REPO_PATH_PLACEHOLDER), "{}", url);
        }
    }

    // ==================== Shortcut Tests ====================

    #[test]
    fn test_shortcut_conflict_then_success() {
        let mut manager = memory_manager();

        let result = manager.update_site_shortcut("github_dev", Some(ctrl_shift("1")));
        match result {
            Err(Error::Conflict { shortcut, sites }) => {
                assert_eq!(shortcut, "ctrl+shift+1");
                assert_eq!(sites, vec!["GitHub1s".to_string()]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        // Nothing changed
        assert_eq!(
            manager.get_site("github_dev").unwrap().shortcuts.unwrap().canonical(),
            "ctrl+shift+2"
        );
        assert_eq!(
            manager.get_site("github1s").unwrap().shortcuts.unwrap().canonical(),
            "ctrl+shift+1"
        );

        manager
            .update_site_shortcut("github_dev", Some(ctrl_shift("9")))
            .unwrap();
        let mapping = manager.get_shortcut_mapping().unwrap();
        assert_eq!(mapping["ctrl+shift+9"].id, "github_dev");
        assert!(!mapping.contains_key("ctrl+shift+2"));
    }

    #[test]
    fn test_disabled_chord_does_not_conflict() {
        let mut manager = memory_manager();
        let site = manager
            .update_site_shortcut("github_dev", Some(ctrl_shift("1").with_enabled(false)))
            .unwrap();
        assert!(!site.shortcuts.unwrap().enabled);
        assert_eq!(manager.get_shortcut_mapping().unwrap()["ctrl+shift+1"].id, "github1s");
    }

    #[test]
    fn test_shortcut_validation_and_clearing() {
        let mut manager = memory_manager();
        let result = manager.update_site_shortcut("zread", Some(Chord::new("z", &[])));
        assert!(matches!(result, Err(Error::Validation(_))));
        let result = manager.update_site_shortcut("ghost", None);
        assert!(matches!(result, Err(Error::NotFound(_))));

        let site = manager.update_site_shortcut("zread", None).unwrap();
        assert!(site.shortcuts.is_none());
        assert!(!manager.get_shortcut_mapping().unwrap().contains_key("ctrl+shift+5"));
    }

    #[test]
    fn test_suggested_shortcut() {
        let mut manager = memory_manager();
        let chord = manager.get_suggested_shortcut(None).unwrap().unwrap();
        assert_eq!(chord.key, "6");
        assert_eq!(chord.modifiers, vec![Modifier::Ctrl, Modifier::Shift]);

        manager.update_site_shortcut("zread", Some(ctrl_shift("6"))).unwrap();
        let chord = manager.get_suggested_shortcut(None).unwrap().unwrap();
        assert_eq!(chord.key, "5");
    }

    #[test]
    fn test_dispatch_key_event() {
        let mut manager = memory_manager();
        let event = KeyEvent::from_chord(&ctrl_shift("4"));

        let nav = manager.dispatch_key_event(&event, "rust-lang/rust").unwrap().unwrap();
        assert_eq!(nav.site_id, "deepwiki");
        assert_eq!(nav.url, "https://deepwiki.com/rust-lang/rust");
        assert!(nav.open_in_new_tab);
        assert!(nav.prevent_default);

        manager
            .update_settings(SettingsPatch {
                enable_shortcuts: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert!(manager.dispatch_key_event(&event, "rust-lang/rust").unwrap().is_none());
    }

    // ==================== Settings Tests ====================

    #[test]
    fn test_update_settings_requires_existing_default_site() {
        let mut manager = memory_manager();
        let result = manager.update_settings(SettingsPatch {
            default_site_id: Some("ghost".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::NotFound(_))));

        let settings = manager
            .update_settings(SettingsPatch {
                default_site_id: Some("zread".to_string()),
                show_on_hover: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.default_site_id, "zread");
        assert!(settings.show_on_hover);
        assert_eq!(manager.get_settings().unwrap(), settings);
    }

    #[test]
    fn test_default_site_falls_back_to_first_enabled() {
        let mut manager = memory_manager();
        assert_eq!(manager.get_default_site().unwrap().unwrap().id, "github1s");

        manager.toggle_site("github1s", false).unwrap();
        assert_eq!(manager.get_default_site().unwrap().unwrap().id, "github_dev");

        for id in BUILT_IN_IDS {
            manager.toggle_site(id, false).unwrap();
        }
        assert!(manager.get_default_site().unwrap().is_none());
    }

    // ==================== Reset / Snapshot Tests ====================

    #[test]
    fn test_reset_to_default() {
        let mut manager = memory_manager();
        manager.add_site_at(new_site("Temp"), at(1)).unwrap();
        manager.toggle_site("zread", false).unwrap();

        let config = manager.reset_to_default().unwrap();
        assert_eq!(config, registry::default_configuration());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_clear_all() {
        let mut manager = memory_manager();
        manager.toggle_site("zread", false).unwrap();
        manager.clear_all().unwrap();
        assert!(manager.storage().inner().is_empty());
        assert!(manager.get_site("zread").unwrap().enabled);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut manager = memory_manager();
        manager.add_site_at(new_site("Kept"), at(11)).unwrap();
        manager
            .update_site_shortcut("custom_kept_11", Some(Chord::new("k", &[Modifier::Alt])))
            .unwrap();
        let before = manager.load().unwrap();
        let snapshot = manager.export_config().unwrap();

        manager.reset_to_default().unwrap();
        let imported = manager.import_config(&snapshot).unwrap();
        assert_eq!(imported, before);
        assert_eq!(manager.load().unwrap(), before);
    }
}
