//! Built-in site registry and global constants.
//!
//! The five shipped sites are fixed literals. They can be disabled, have
//! their shortcuts changed, or be reordered, but never deleted.

use crate::models::{Category, Chord, Configuration, Modifier, Settings, Site};

/// Version stamped on every saved document.
pub const CONFIG_VERSION: &str = "1.1.0";

/// Key of the configuration document in the sync store.
pub const STORAGE_KEY: &str = "readonConfig";

/// Every key this crate writes to the sync store (cleared on full reset).
pub const STORAGE_KEYS: &[&str] = &[STORAGE_KEY];

/// Placeholder substituted with `owner/repo` in URL templates.
pub const REPO_PATH_PLACEHOLDER: &str = "{REPO_PATH}";

/// Maximum number of user-added sites.
pub const MAX_CUSTOM_SITES: usize = 10;

/// Modifiers a shortcut may use.
pub const ALLOWED_MODIFIERS: [Modifier; 4] = Modifier::ALL;

/// Function keys a shortcut may use, in addition to digits and lowercase letters.
pub const FUNCTION_KEYS: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Digit keys scanned when suggesting a shortcut, in keyboard order.
pub const SUGGESTION_KEYS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// Modifiers paired with suggested digit keys.
pub const SUGGESTION_MODIFIERS: [Modifier; 2] = [Modifier::Ctrl, Modifier::Shift];

/// Icons shipped with the extension.
pub const AVAILABLE_ICONS: &[&str] = &[
    "github1s",
    "github_dev",
    "sourcegraph",
    "deepwiki",
    "zread",
    "code",
    "book",
    "robot",
    "search",
    "link",
];

/// Whether `key` is an allowed main key for a shortcut.
pub fn is_allowed_key(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_digit() || c.is_ascii_lowercase(),
        _ => FUNCTION_KEYS.contains(&key),
    }
}

fn built_in(
    id: &str,
    name: &str,
    description: &str,
    category: Category,
    url_template: &str,
    order: i64,
) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        url_template: url_template.to_string(),
        icon: id.to_string(),
        enabled: true,
        order,
        is_built_in: true,
        shortcuts: Some(Chord::new(
            order.to_string(),
            &[Modifier::Ctrl, Modifier::Shift],
        )),
    }
}

/// The built-in sites, in default order.
pub fn default_sites() -> Vec<Site> {
    vec![
        built_in(
            "github1s",
            "GitHub1s",
            "Browse the repository in a VS Code style web editor",
            Category::Source,
            "https://github1s.com/{REPO_PATH}",
            1,
        ),
        built_in(
            "github_dev",
            "GitHub.dev",
            "Open the repository in GitHub's web editor",
            Category::Source,
            "https://github.dev/{REPO_PATH}",
            2,
        ),
        built_in(
            "sourcegraph",
            "Sourcegraph",
            "Search and navigate the code with Sourcegraph",
            Category::Source,
            "https://sourcegraph.com/github.com/{REPO_PATH}",
            3,
        ),
        built_in(
            "deepwiki",
            "DeepWiki",
            "Read an AI generated wiki of the repository",
            Category::Ai,
            "https://deepwiki.com/{REPO_PATH}",
            4,
        ),
        built_in(
            "zread",
            "Zread",
            "Read an AI guided walkthrough of the repository",
            Category::Ai,
            "https://zread.ai/{REPO_PATH}",
            5,
        ),
    ]
}

/// Default global settings.
pub fn default_settings() -> Settings {
    Settings {
        default_site_id: "github1s".to_string(),
        open_in_new_tab: true,
        show_on_hover: false,
        enable_shortcuts: true,
    }
}

/// A fresh copy of the default configuration.
pub fn default_configuration() -> Configuration {
    Configuration {
        sites: default_sites(),
        settings: default_settings(),
        version: CONFIG_VERSION.to_string(),
    }
}
