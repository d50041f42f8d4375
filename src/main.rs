mod app;
mod config;
mod keys;
mod log;
mod ui;
mod workspace;

use clap::{Parser, Subcommand};
use workspace::storage::{FileStorage, load_or_default};

#[derive(Parser)]
#[command(
    name = "tessera",
    about = "Keyboard-driven workspace shell with split panes and persistent tabs",
    version
)]
struct Cli {
    /// Location to open on startup, e.g. /finance/ledger
    #[arg(long)]
    location: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forget all persisted tabs
    Reset,
    /// Show debug information
    Debug,
    /// List persisted tabs
    Tabs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_dir = config::get_config_dir()?;
    let config = config::Config::load(&config_dir).unwrap_or_default();

    match cli.command {
        Some(Commands::Reset) => {
            log::initialize(log::LogTarget::Discard);
            println!("Resetting workspace tabs...");
            FileStorage::new(&config_dir).clear()?;
            println!("All tabs closed.");
            Ok(())
        }
        Some(Commands::Debug) => {
            log::initialize(log::LogTarget::Discard);
            let storage = FileStorage::new(&config_dir);
            let record = load_or_default(&storage);
            println!("Debug information:");
            println!("  Config directory: {}", config_dir.display());
            println!("  Home location: {}", config.home_location);
            println!("  Restore tabs: {}", config.restore_tabs);
            println!("  Tab record: {}", storage.path().display());
            println!("  Stored tabs: {}", record.len());
            println!("  Log file: {}", log::log_file_path().display());
            Ok(())
        }
        Some(Commands::Tabs) => {
            log::initialize(log::LogTarget::Discard);
            let storage = FileStorage::new(&config_dir);
            let record = load_or_default(&storage);
            if record.is_empty() {
                println!("No open tabs.");
            }
            for tab in record.tabs() {
                let marker = if record.active_tab_id() == Some(tab.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}\t{}", marker, tab.title, tab.href);
            }
            Ok(())
        }
        None => {
            log::initialize(log::LogTarget::File);
            let config = config::Config::load_or_init(&config_dir).unwrap_or(config);
            app::run(config, config_dir, cli.location)
        }
    }
}
