//! Persistence of the configuration document.
//!
//! The whole configuration lives under a single key (`readonConfig`) of a
//! [`SyncStore`]. [`ConfigStore`] is the only code that touches the
//! serialized form:
//!
//! - `load` falls back to the defaults when the document is absent or has
//!   the wrong shape, and migrates documents written by older versions
//! - `save` refuses documents with the wrong shape and stamps the current
//!   version
//! - `export_snapshot` / `import_snapshot` move the document in and out as
//!   pretty-printed JSON text
//!
//! ## Shape
//!
//! A document has the right shape when it is a JSON object with a `sites`
//! array and a `settings` object. Deeper checks belong to the manager.

pub mod backend;

#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileStore;
pub use backend::{MemoryStore, SyncStore};

use crate::models::Configuration;
use crate::registry::{self, CONFIG_VERSION, STORAGE_KEY, STORAGE_KEYS};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "READON_DATA_DIR";

/// Exported document: the configuration plus the export time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    #[serde(flatten)]
    config: &'a Configuration,
    export_date: DateTime<Utc>,
}

/// Reads and writes the configuration document through a sync store.
#[derive(Debug)]
pub struct ConfigStore<S: SyncStore> {
    store: S,
}

impl<S: SyncStore> ConfigStore<S> {
    /// Wrap a sync store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the configuration.
    ///
    /// Absent, wrongly shaped, or undecodable documents yield the defaults.
    /// Only failures of the store itself are returned as errors.
    pub fn load(&self) -> Result<Configuration> {
        let Some(mut raw) = self.store.get(STORAGE_KEY)? else {
            tracing::debug!("no stored configuration, using defaults");
            return Ok(registry::default_configuration());
        };

        if let Err(reason) = validate_shape(&raw) {
            tracing::warn!(%reason, "stored configuration is malformed, using defaults");
            return Ok(registry::default_configuration());
        }

        let stored_version = raw.get("version").and_then(Value::as_str).map(str::to_string);
        if stored_version.as_deref() != Some(CONFIG_VERSION) {
            tracing::debug!(
                from = stored_version.as_deref().unwrap_or("none"),
                to = CONFIG_VERSION,
                "migrating stored configuration"
            );
            migrate(&mut raw);
        }

        match serde_json::from_value::<Configuration>(raw) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "stored configuration could not be decoded, using defaults"
                );
                Ok(registry::default_configuration())
            }
        }
    }

    /// Overwrite the stored document, stamping the current version.
    pub fn save(&mut self, config: &Configuration) -> Result<()> {
        let mut value = serde_json::to_value(config)?;
        validate_shape(&value).map_err(Error::MalformedDocument)?;
        value["version"] = Value::String(CONFIG_VERSION.to_string());
        self.store.set(STORAGE_KEY, value)?;
        tracing::debug!(sites = config.sites.len(), "saved configuration");
        Ok(())
    }

    /// Serialize the current configuration plus an export timestamp.
    pub fn export_snapshot(&self) -> Result<String> {
        let config = self.load()?;
        let snapshot = Snapshot {
            config: &config,
            export_date: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Import a snapshot: validate, merge onto the defaults, persist.
    ///
    /// Imported `sites` replace the default sites; imported `settings`
    /// override the default settings key by key.
    pub fn import_snapshot(&mut self, text: &str) -> Result<Configuration> {
        let mut imported: Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedDocument(format!("not valid JSON: {}", e)))?;
        validate_shape(&imported).map_err(Error::MalformedDocument)?;
        migrate(&mut imported);

        let defaults = serde_json::to_value(registry::default_configuration())?;
        let merged = merge_onto_defaults(defaults, imported);
        let config: Configuration = serde_json::from_value(merged)
            .map_err(|e| Error::MalformedDocument(e.to_string()))?;

        self.save(&config)?;
        tracing::debug!(sites = config.sites.len(), "imported configuration");
        Ok(config)
    }

    /// Remove every key this crate stores.
    pub fn clear(&mut self) -> Result<()> {
        for key in STORAGE_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }
}

/// Check the top-level shape of a configuration document.
pub fn validate_shape(value: &Value) -> std::result::Result<(), String> {
    let Some(obj) = value.as_object() else {
        return Err("document is not a JSON object".to_string());
    };
    if !obj.get("sites").is_some_and(Value::is_array) {
        return Err("`sites` must be an array".to_string());
    }
    if !obj.get("settings").is_some_and(Value::is_object) {
        return Err("`settings` must be an object".to_string());
    }
    Ok(())
}

/// Bring a shape-valid document up to the current version.
///
/// Every shortcut gets an explicit `enabled` flag (default true).
fn migrate(value: &mut Value) {
    if let Some(sites) = value.get_mut("sites").and_then(Value::as_array_mut) {
        for site in sites {
            if let Some(chord) = site.get_mut("shortcuts").and_then(Value::as_object_mut) {
                if !chord.get("enabled").is_some_and(Value::is_boolean) {
                    chord.insert("enabled".to_string(), Value::Bool(true));
                }
            }
        }
    }
    value["version"] = Value::String(CONFIG_VERSION.to_string());
}

fn merge_onto_defaults(mut defaults: Value, imported: Value) -> Value {
    let Value::Object(imported) = imported else {
        return defaults;
    };
    if let Some(sites) = imported.get("sites") {
        defaults["sites"] = sites.clone();
    }
    if let (Some(Value::Object(base)), Some(Value::Object(overrides))) =
        (defaults.get_mut("settings"), imported.get("settings"))
    {
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
    }
    defaults["version"] = Value::String(CONFIG_VERSION.to_string());
    defaults
}

/// Get the data directory for the CLI's file-backed store.
///
/// `READON_DATA_DIR` wins; otherwise `<platform data dir>/readon`.
#[cfg(not(target_arch = "wasm32"))]
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("readon"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chord, Modifier};
    use serde_json::json;

    fn store_with(value: Value) -> ConfigStore<MemoryStore> {
        ConfigStore::new(MemoryStore::with_entry(STORAGE_KEY, value))
    }

    /// A stored document as written by the previous version (no `enabled`
    /// on shortcuts).
    fn legacy_document() -> Value {
        let mut value = serde_json::to_value(registry::default_configuration()).unwrap();
        for site in value["sites"].as_array_mut().unwrap() {
            site["shortcuts"].as_object_mut().unwrap().remove("enabled");
        }
        value["version"] = json!("1.0.0");
        value
    }

    /// Stores that always fail.
    struct BrokenStore;

    impl SyncStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(Error::Storage("unavailable".to_string()))
        }
        fn set(&mut self, _key: &str, _value: Value) -> Result<()> {
            Err(Error::Storage("unavailable".to_string()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("unavailable".to_string()))
        }
        fn location(&self) -> String {
            "broken".to_string()
        }
    }

    // ==================== Shape Tests ====================

    #[test]
    fn test_validate_shape() {
        assert!(validate_shape(&json!({"sites": [], "settings": {}})).is_ok());
        assert!(validate_shape(&json!([])).is_err());
        assert!(validate_shape(&json!({"sites": {}, "settings": {}})).is_err());
        assert!(validate_shape(&json!({"sites": []})).is_err());
        assert!(validate_shape(&json!({"sites": [], "settings": "x"})).is_err());
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_load_absent_returns_defaults() {
        let store = ConfigStore::new(MemoryStore::new());
        assert_eq!(store.load().unwrap(), registry::default_configuration());
        // Loading does not write
        assert!(store.inner().is_empty());
    }

    #[test]
    fn test_load_malformed_returns_defaults() {
        let store = store_with(json!({"sites": "nope", "settings": {}}));
        assert_eq!(store.load().unwrap(), registry::default_configuration());
    }

    #[test]
    fn test_load_undecodable_sites_returns_defaults() {
        let store = store_with(json!({
            "sites": [{"id": "x"}],
            "settings": {},
            "version": CONFIG_VERSION
        }));
        assert_eq!(store.load().unwrap(), registry::default_configuration());
    }

    #[test]
    fn test_load_migrates_old_version() {
        let mut legacy = legacy_document();
        legacy["sites"][0]["shortcuts"]["enabled"] = json!(false);
        let store = store_with(legacy);

        let config = store.load().unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        // Explicit flags survive, missing ones are backfilled to true
        assert!(!config.sites[0].shortcuts.as_ref().unwrap().enabled);
        assert!(config.sites[1..].iter().all(|s| s.shortcuts.as_ref().unwrap().enabled));
    }

    #[test]
    fn test_load_propagates_store_failure() {
        let store = ConfigStore::new(BrokenStore);
        assert!(matches!(store.load(), Err(Error::Storage(_))));
    }

    // ==================== Save Tests ====================

    #[test]
    fn test_save_stamps_current_version() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let mut config = registry::default_configuration();
        config.version = "0.9.0".to_string();
        config.settings.open_in_new_tab = false;
        store.save(&config).unwrap();

        let raw = store.inner().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw["version"], json!(CONFIG_VERSION));
        let loaded = store.load().unwrap();
        assert!(!loaded.settings.open_in_new_tab);
    }

    #[test]
    fn test_save_propagates_store_failure() {
        let mut store = ConfigStore::new(BrokenStore);
        let result = store.save(&registry::default_configuration());
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    // ==================== Snapshot Tests ====================

    #[test]
    fn test_export_contains_export_date() {
        let store = ConfigStore::new(MemoryStore::new());
        let text = store.export_snapshot().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let date = value["exportDate"].as_str().unwrap();
        assert!(date.parse::<DateTime<Utc>>().is_ok());
        assert_eq!(value["version"], json!(CONFIG_VERSION));
        assert_eq!(value["sites"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let mut config = registry::default_configuration();
        config.sites[2].enabled = false;
        config.sites[3].shortcuts = Some(Chord::new("k", &[Modifier::Alt]).with_enabled(false));
        config.settings.default_site_id = "deepwiki".to_string();
        store.save(&config).unwrap();

        let before = store.load().unwrap();
        let text = store.export_snapshot().unwrap();

        let mut other = ConfigStore::new(MemoryStore::new());
        let imported = other.import_snapshot(&text).unwrap();
        assert_eq!(imported, before);
        assert_eq!(other.load().unwrap(), before);
    }

    #[test]
    fn test_import_merges_settings_onto_defaults() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let text = json!({
            "sites": [],
            "settings": {"openInNewTab": false}
        })
        .to_string();
        let config = store.import_snapshot(&text).unwrap();

        assert!(config.sites.is_empty());
        assert!(!config.settings.open_in_new_tab);
        assert!(config.settings.enable_shortcuts); // From defaults
        assert_eq!(config.settings.default_site_id, "github1s");
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_import_backfills_shortcut_flags() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let config = store.import_snapshot(&legacy_document().to_string()).unwrap();
        assert!(config.sites.iter().all(|s| s.shortcuts.as_ref().unwrap().enabled));
    }

    #[test]
    fn test_import_rejects_bad_shape_and_keeps_state() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let mut config = registry::default_configuration();
        config.settings.show_on_hover = true;
        store.save(&config).unwrap();

        let result = store.import_snapshot(r#"{"sites": {}}"#);
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
        let result = store.import_snapshot("not json");
        assert!(matches!(result, Err(Error::MalformedDocument(_))));

        assert!(store.load().unwrap().settings.show_on_hover);
    }

    #[test]
    fn test_import_rejects_undecodable_sites() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let result = store.import_snapshot(r#"{"sites": [{"id": 1}], "settings": {}}"#);
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
        assert!(store.inner().is_empty());
    }

    // ==================== Clear Tests ====================

    #[test]
    fn test_clear_removes_document() {
        let mut store = ConfigStore::new(MemoryStore::new());
        store.save(&registry::default_configuration()).unwrap();
        assert_eq!(store.inner().len(), 1);
        store.clear().unwrap();
        assert!(store.inner().is_empty());
    }
}
