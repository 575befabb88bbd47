//! CLI argument definitions for Readon.

use clap::{Parser, Subcommand};

/// Readon - open GitHub repositories on external reading sites.
///
/// Manages the same configuration the browser extension syncs: the list of
/// sites, their keyboard shortcuts, and global settings.
#[derive(Parser, Debug)]
#[command(name = "readon")]
#[command(author, version, about = "Open GitHub repositories on external code-reading and AI-analysis sites", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Site management commands
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },

    /// Keyboard shortcut commands
    Shortcut {
        #[command(subcommand)]
        command: ShortcutCommands,
    },

    /// Global settings commands
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Print the URL of a repository on a site
    Url {
        /// Site ID (e.g., github1s, deepwiki)
        site_id: String,

        /// Repository as owner/repo or a github.com URL
        repo: String,
    },

    /// Print the URL of a repository on the default site
    Open {
        /// Repository as owner/repo or a github.com URL
        repo: String,
    },

    /// Simulate a key-down on a repository page and show where it leads
    Key {
        /// Chord as pressed (e.g., ctrl+shift+1)
        chord: String,

        /// Repository as owner/repo or a github.com URL
        #[arg(short, long)]
        repo: String,
    },

    /// Export the configuration as a JSON snapshot
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Import a JSON snapshot (merged onto the defaults)
    Import {
        /// Snapshot file ("-" for stdin)
        file: std::path::PathBuf,
    },

    /// Restore the default configuration
    Reset {
        /// Remove the stored document entirely instead of writing defaults
        #[arg(long)]
        wipe: bool,
    },
}

/// Site subcommands
#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// List sites (enabled only, unless --all)
    List {
        /// Include disabled sites
        #[arg(short, long)]
        all: bool,

        /// Filter by category (source, ai)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show a site
    Show {
        /// Site ID
        id: String,
    },

    /// Add a custom site
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// URL template containing {REPO_PATH}
        #[arg(short, long)]
        url: String,

        /// Category (source, ai)
        #[arg(short, long)]
        category: String,

        /// Icon identifier
        #[arg(short, long, default_value = "link")]
        icon: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Update a site
    Update {
        /// Site ID
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New URL template
        #[arg(long)]
        url: Option<String>,

        /// New category (source, ai)
        #[arg(long)]
        category: Option<String>,

        /// New icon identifier
        #[arg(long)]
        icon: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a custom site
    Rm {
        /// Site ID
        id: String,
    },

    /// Enable a site
    Enable {
        /// Site ID
        id: String,
    },

    /// Disable a site
    Disable {
        /// Site ID
        id: String,
    },

    /// Reorder sites (listed IDs first, the rest keep their relative order)
    Reorder {
        /// Site IDs in the desired order
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Shortcut subcommands
#[derive(Subcommand, Debug)]
pub enum ShortcutCommands {
    /// List active shortcuts
    List,

    /// Assign a shortcut to a site
    Set {
        /// Site ID
        id: String,

        /// Chord (e.g., ctrl+shift+6)
        chord: String,

        /// Store the shortcut but keep it inactive
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a site's shortcut
    Clear {
        /// Site ID
        id: String,
    },

    /// Suggest a free ctrl+shift+<digit> shortcut
    Suggest {
        /// Treat this site's own shortcut as free
        #[arg(long)]
        exclude: Option<String>,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show global settings
    Show,

    /// Change global settings
    Set {
        /// Default site ID
        #[arg(long)]
        default_site: Option<String>,

        /// Open sites in a new tab
        #[arg(long)]
        new_tab: Option<bool>,

        /// Show the site menu on hover
        #[arg(long)]
        show_on_hover: Option<bool>,

        /// Enable keyboard shortcuts
        #[arg(long)]
        shortcuts: Option<bool>,
    },
}
