//! Readon CLI - manage the "read on" site configuration from a terminal.

use clap::Parser;
use readon::cli::{Cli, Commands, SettingsCommands, ShortcutCommands, SiteCommands};
use readon::commands::{self, Output, SitePatchArgs};
use readon::logging;
use readon::manager::ConfigManager;
use readon::models::SettingsPatch;
use readon::storage::{FileStore, SyncStore, get_data_dir};
use std::io::Read;
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    logging::init();

    if let Err(e) = run(cli.command, human) {
        tracing::debug!(kind = e.kind(), "command failed");
        if human {
            eprintln!("Error: {}", e);
        } else {
            let err = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
            });
            eprintln!("{}", err);
        }
        process::exit(1);
    }
}

fn run(command: Commands, human: bool) -> Result<(), readon::Error> {
    let data_dir = get_data_dir()?;
    let store = FileStore::in_dir(&data_dir);
    tracing::debug!(store = %store.location(), "using file store");
    let mut manager = ConfigManager::new(store);

    match command {
        Commands::Site { command } => match command {
            SiteCommands::List { all, category } => {
                output(&commands::site_list(&manager, all, category.as_deref())?, human)
            }
            SiteCommands::Show { id } => output(&commands::site_show(&manager, &id)?, human),
            SiteCommands::Add {
                name,
                url,
                category,
                icon,
                description,
            } => output(
                &commands::site_add(&mut manager, name, url, &category, icon, description)?,
                human,
            ),
            SiteCommands::Update {
                id,
                name,
                url,
                category,
                icon,
                description,
            } => {
                let patch = SitePatchArgs {
                    name,
                    url,
                    category,
                    icon,
                    description,
                };
                output(&commands::site_update(&mut manager, &id, patch)?, human)
            }
            SiteCommands::Rm { id } => output(&commands::site_rm(&mut manager, &id)?, human),
            SiteCommands::Enable { id } => {
                output(&commands::site_toggle(&mut manager, &id, true)?, human)
            }
            SiteCommands::Disable { id } => {
                output(&commands::site_toggle(&mut manager, &id, false)?, human)
            }
            SiteCommands::Reorder { ids } => {
                output(&commands::site_reorder(&mut manager, &ids)?, human)
            }
        },
        Commands::Shortcut { command } => match command {
            ShortcutCommands::List => output(&commands::shortcut_list(&manager)?, human),
            ShortcutCommands::Set {
                id,
                chord,
                disabled,
            } => output(
                &commands::shortcut_set(&mut manager, &id, &chord, disabled)?,
                human,
            ),
            ShortcutCommands::Clear { id } => {
                output(&commands::shortcut_clear(&mut manager, &id)?, human)
            }
            ShortcutCommands::Suggest { exclude } => output(
                &commands::shortcut_suggest(&manager, exclude.as_deref())?,
                human,
            ),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show => output(&commands::settings_show(&manager)?, human),
            SettingsCommands::Set {
                default_site,
                new_tab,
                show_on_hover,
                shortcuts,
            } => {
                let patch = SettingsPatch {
                    default_site_id: default_site,
                    open_in_new_tab: new_tab,
                    show_on_hover,
                    enable_shortcuts: shortcuts,
                };
                output(&commands::settings_set(&mut manager, patch)?, human)
            }
        },
        Commands::Url { site_id, repo } => {
            output(&commands::url(&manager, &site_id, &repo)?, human)
        }
        Commands::Open { repo } => output(&commands::open(&manager, &repo)?, human),
        Commands::Key { chord, repo } => output(&commands::key(&manager, &chord, &repo)?, human),
        Commands::Export { output: path } => {
            let snapshot = commands::export(&manager)?;
            match path {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", snapshot))?;
                    if human {
                        println!("Exported configuration to {}", path.display());
                    } else {
                        println!("{}", serde_json::json!({"ok": true, "path": path}));
                    }
                }
                None => println!("{}", snapshot),
            }
        }
        Commands::Import { file } => {
            let text = if file.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&file)?
            };
            output(&commands::import(&mut manager, &text)?, human)
        }
        Commands::Reset { wipe } => output(&commands::reset(&mut manager, wipe)?, human),
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
