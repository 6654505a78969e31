//! tracker-daemon: Records the day a note was last modified in its frontmatter.
//!
//! Watches a vault directory for markdown edits and appends today's date to
//! a configurable frontmatter property, once per file per day. The daemon's
//! own writes re-trigger the watcher; those echoes are suppressed by the
//! tracker so each edit results in at most one rewrite.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

// Use library exports
use tracker_daemon::native_fs::NativeFs;
use tracker_daemon::settings::SettingsStore;
use tracker_daemon::watcher::{FileEvent, FileEventKind, FileWatcher};

use tracker_core::{ModifiedDateTracker, NoteStore, TrackOutcome};

#[derive(Parser, Debug)]
#[command(name = "tracker-daemon")]
#[command(about = "Frontmatter modified-date tracking daemon")]
struct Args {
    /// Path to the vault directory
    #[arg(short, long)]
    vault: PathBuf,

    /// Frontmatter property to record dates under (persisted for later runs)
    #[arg(short, long)]
    property: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

/// Daemon state holding all components.
struct Daemon {
    /// Modified-date tracker with its echo guard
    tracker: ModifiedDateTracker,
    /// Frontmatter store over the vault
    store: NoteStore<NativeFs>,
    /// Persisted settings
    settings: SettingsStore,
    /// File watcher
    watcher: FileWatcher,
}

impl Daemon {
    /// Handle a file change event from the watcher.
    async fn on_file_event(&mut self, event: FileEvent) {
        match event.kind {
            FileEventKind::Modified => {
                self.on_file_modified(&event.path).await;
            }
            FileEventKind::Deleted => {
                debug!("File deleted: {}", event.path);
                // Drop any pending echo mark so a recreated file's first
                // edit isn't swallowed
                self.tracker.forget(&event.path);
            }
        }
    }

    /// Handle a file modification.
    async fn on_file_modified(&mut self, path: &str) {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let property = self.settings.property_name().to_string();

        match self
            .tracker
            .handle_modify(&self.store, path, &property, &today)
            .await
        {
            Ok(TrackOutcome::Updated) => {
                info!("Recorded {} under '{}' for {}", today, property, path);
            }
            Ok(TrackOutcome::AlreadyRecorded) => {
                debug!("{} already records {}", path, today);
            }
            Ok(TrackOutcome::SkippedEcho) => {
                debug!("Skipped self-triggered event for {}", path);
            }
            Err(e) => {
                // The user's edit is untouched; this file is simply picked
                // up again on its next save
                error!("Failed to update '{}' for {}: {}", property, path, e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging - respects RUST_LOG env var, defaults to info (or debug with --verbose)
    let default_filter = if args.verbose {
        "debug,tracker_daemon=debug"
    } else {
        "info,tracker_daemon=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting tracker-daemon");
    info!("Vault path: {:?}", args.vault);

    // Load settings, applying any property override from the CLI
    let mut settings = SettingsStore::new(&args.vault)?;
    if let Some(property) = &args.property {
        settings.set_property_name(property)?;
    }
    info!("Tracking property: '{}'", settings.property_name());

    // Create filesystem-backed note store
    let store = NoteStore::new(NativeFs::new(args.vault.clone()));

    // Create file watcher
    let watcher = FileWatcher::new(args.vault.clone())?;
    info!("File watcher started");

    // Create daemon state
    let mut daemon = Daemon {
        tracker: ModifiedDateTracker::new(),
        store,
        settings,
        watcher,
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    // Main event loop
    loop {
        tokio::select! {
            // Handle file watcher events
            Some(event) = daemon.watcher.event_rx().recv() => {
                daemon.on_file_event(event).await;
            }

            // Handle graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
