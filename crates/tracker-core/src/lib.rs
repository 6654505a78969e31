//! tracker-core: Library for tracking modified dates in markdown frontmatter.
//!
//! This crate provides the core functionality for:
//! - Parsing/serializing markdown with YAML frontmatter
//! - Reading and merging the modified-dates field
//! - The re-entrancy guard that suppresses self-triggered change events
//! - FileSystem trait abstraction so the logic runs against any backend

pub mod date_field;
pub mod frontmatter;
pub mod fs;
pub mod store;
pub mod tracker;

pub use date_field::{merge_today, FieldValue, DEFAULT_FIELD_NAME};
pub use frontmatter::{Frontmatter, ParsedNote};
pub use fs::{FileSystem, FsError, InMemoryFs};
pub use store::{Mutation, NoteStore, StoreError};
pub use tracker::{InFlightSet, ModifiedDateTracker, TrackOutcome, TrackerError};
