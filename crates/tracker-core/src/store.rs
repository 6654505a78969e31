//! Read-modify-write access to a note's frontmatter.
//!
//! `NoteStore` is the mutation capability handed to the tracker: it applies
//! a synchronous transform to the parsed frontmatter and persists the note
//! only when the mapping actually changed. An unchanged mapping means no
//! write, and therefore no change notification for the tracker to consume.

use crate::frontmatter::{self, Frontmatter, FrontmatterError};
use crate::fs::{FileSystem, FsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("Note is not valid UTF-8: {0}")]
    NotUtf8(String),

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of a frontmatter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The mapping changed and the note was written back.
    Changed,
    /// The transform made no observable change; nothing was written.
    Unchanged,
}

/// Frontmatter store over a vault filesystem.
pub struct NoteStore<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> NoteStore<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Apply `transform` to the note's frontmatter and persist if changed.
    ///
    /// A note without a frontmatter block is presented to the transform as
    /// an empty mapping; if the transform populates it, a new block is
    /// written above the existing content.
    pub async fn update_frontmatter<T>(&self, path: &str, transform: T) -> Result<Mutation>
    where
        T: FnOnce(&mut Frontmatter),
    {
        let raw = self.fs.read(path).await?;
        let raw = String::from_utf8(raw).map_err(|_| StoreError::NotUtf8(path.to_string()))?;

        let parsed = frontmatter::parse(&raw);
        let original = parsed.frontmatter.unwrap_or_default();

        let mut updated = original.clone();
        transform(&mut updated);

        if updated == original {
            return Ok(Mutation::Unchanged);
        }

        let rebuilt = frontmatter::build(&updated, &parsed.body)?;
        self.fs.write(path, rebuilt.as_bytes()).await?;
        Ok(Mutation::Changed)
    }
}
