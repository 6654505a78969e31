//! tracker-daemon library: Exposes internal modules for testing.
//!
//! This is a thin library layer over the daemon components,
//! allowing integration tests to access internal types.

pub mod native_fs;
pub mod settings;
pub mod watcher;

// Re-export key types for convenience
pub use native_fs::NativeFs;
pub use settings::{Settings, SettingsStore, STATE_DIR};
pub use watcher::{FileEvent, FileEventKind, FileWatcher};
