//! One file, start to finish
//!
//! [`FileFixer`] ties a path to an engine: open the file, fix it, save it with
//! or without a backup. Each call to `fix` or `describe` builds a fresh tree.

use crate::document::{HtmlDocument, DEFAULT_BACKUP_SUFFIX};
use crate::engine::GridEngine;
use crate::error::GridError;
use crate::options::EngineOptions;
use crate::rewrite::RewriteStats;
use std::path::{Path, PathBuf};

pub struct FileFixer {
    path: PathBuf,
    engine: GridEngine,
    backup_suffix: String,
    document: Option<HtmlDocument>,
}

impl FileFixer {
    pub fn new(path: impl Into<PathBuf>, options: EngineOptions) -> Self {
        FileFixer {
            path: path.into(),
            engine: GridEngine::new(options),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            document: None,
        }
    }

    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&mut self) -> Result<(), GridError> {
        self.document = Some(HtmlDocument::open(&self.path)?);
        Ok(())
    }

    fn document(&self) -> Result<&HtmlDocument, GridError> {
        self.document.as_ref().ok_or(GridError::NotOpened)
    }

    pub fn fix(&mut self) -> Result<RewriteStats, GridError> {
        let document = self.document()?;
        let tree = self.engine.size_document(document)?;
        let stats = self.engine.fix(&tree);
        log::info!(
            "{}: {} tables removed, {} rows, {} columns",
            self.path.display(),
            stats.tables_removed,
            stats.rows,
            stats.columns
        );
        Ok(stats)
    }

    /// Size the open document and report the tree, leaving the document as is
    pub fn describe(&self) -> Result<String, GridError> {
        let tree = self.engine.size_document(self.document()?)?;
        Ok(self.engine.describe(&tree))
    }

    /// Save back to the opened path. Returns the backup path when one was made.
    pub fn save(&self, make_backup: bool) -> Result<Option<PathBuf>, GridError> {
        let suffix = make_backup.then_some(self.backup_suffix.as_str());
        self.document()?.save(suffix)
    }

    pub fn to_html(&self) -> Result<String, GridError> {
        self.document()?.to_html()
    }
}
