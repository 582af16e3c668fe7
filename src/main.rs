use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden::backup::{ApplicationRegistry, BlocklistStore};
use warden::cli::{handle_backup_command, BackupCommands};
use warden::config::{paths::WardenPaths, settings::Settings};
use warden::storage::Storage;

#[derive(Parser)]
#[command(
    name = "warden",
    version,
    about = "Backup and restore for a per-application firewall configuration",
    long_about = "Warden exports the firewall configuration (settings, custom domain \
                  rules, blocklist subscriptions and per-application network rules) \
                  to a single JSON backup and restores it again."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Backup(BackupCommands),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = WardenPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            let action = cmd.action();
            let storage = Storage::open(paths.clone()).await?;
            handle_backup_command(&storage, &settings, cmd)
                .await
                .with_context(|| format!("{} failed", action))?;
        }
        Some(Commands::Config) => {
            println!("Warden Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();

            let storage = Storage::open(paths.clone()).await?;
            println!("Stored:");
            println!("  Custom domains:      {}", storage.domains.count().await);
            println!(
                "  Blocklists:          {}",
                storage.blocklists.load().await?.len()
            );
            println!(
                "  Applications:        {}",
                storage.applications.list_applications().await?.len()
            );
            println!();
            println!("Settings:");
            println!("  Ad blocker:          {}", settings.ad_blocker);
            println!("  Tracker protection:  {}", settings.tracker_protection);
            println!("  Malware protection:  {}", settings.malware_protection);
            println!(
                "  Blocklist refresh:   every {} h",
                settings.auto_update_interval / (60 * 60 * 1000)
            );
        }
        None => {
            println!("Warden - firewall configuration backups");
            println!();
            println!("Run 'warden --help' for usage information.");
        }
    }

    Ok(())
}
