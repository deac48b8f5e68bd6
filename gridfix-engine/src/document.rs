//! Loading and saving HTML documents
//!
//! Parsing is html5ever's HTML5 tree construction into an `RcDom`, which never
//! fails: malformed markup is repaired the way a browser would repair it. Note
//! that this inserts an implicit `<tbody>` into every table without one.

use crate::dom;
use crate::error::GridError;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};
use std::fs;
use std::path::{Path, PathBuf};

/// Backup file suffix used when none is configured
pub const DEFAULT_BACKUP_SUFFIX: &str = "bak";

pub struct HtmlDocument {
    dom: RcDom,
    path: Option<PathBuf>,
}

impl HtmlDocument {
    /// Parse a document held in memory. It has no path and cannot be saved.
    pub fn parse(source: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);
        HtmlDocument { dom, path: None }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let mut file = fs::File::open(path).map_err(|e| GridError::io(path, e))?;
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut file)
            .map_err(|e| GridError::io(path, e))?;

        log::debug!("parsed {}", path.display());
        Ok(HtmlDocument {
            dom,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The document node itself
    pub fn document(&self) -> Handle {
        self.dom.document.clone()
    }

    /// First element matching `selector`, a tag name optionally followed by
    /// `#id` (`body`, `div#content`)
    pub fn select_root(&self, selector: &str) -> Option<Handle> {
        let (tag, id) = match selector.trim().split_once('#') {
            Some((tag, id)) => (tag, Some(id)),
            None => (selector.trim(), None),
        };
        dom::find_descendant(&self.dom.document, tag, id)
    }

    pub fn to_html(&self) -> Result<String, GridError> {
        let mut output = Vec::new();
        let document = SerializableHandle::from(self.dom.document.clone());
        serialize(&mut output, &document, SerializeOpts::default())
            .map_err(|e| GridError::Serialize(format!("HTML serialization failed: {}", e)))?;

        String::from_utf8(output)
            .map_err(|e| GridError::Serialize(format!("UTF-8 conversion failed: {}", e)))
    }

    /// Write the document back to the file it was opened from. With a backup
    /// suffix the file on disk is copied to `<file>.<suffix>` first; the path
    /// of that copy is returned.
    pub fn save(&self, backup_suffix: Option<&str>) -> Result<Option<PathBuf>, GridError> {
        let path = self.path.as_ref().ok_or(GridError::NoPath)?;

        let backup = match backup_suffix {
            Some(suffix) if path.exists() => {
                let backup = backup_path(path, suffix);
                fs::copy(path, &backup).map_err(|e| GridError::io(&backup, e))?;
                log::info!("backed up {} to {}", path.display(), backup.display());
                Some(backup)
            }
            _ => None,
        };

        let html = self.to_html()?;
        fs::write(path, html).map_err(|e| GridError::io(path, e))?;
        log::info!("saved {}", path.display());
        Ok(backup)
    }
}

/// `page.html` with suffix `bak` gives `page.html.bak`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
