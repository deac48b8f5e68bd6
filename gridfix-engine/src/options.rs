//! Engine options
//!
//! Plain data consumed by the passes. `gridfix-config` builds these from the
//! layered TOML configuration; tests build them directly.

use crate::grid::GridStrategy;
use crate::roles::TagRoles;

/// Pixel constants used by width inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstants {
    /// Widest a row may be; also the width given to the document-root tag
    pub max_row_width: u32,
    /// Default width of form controls
    pub control_width: u32,
    /// Floor used for cells and starved leaves
    pub min_width: u32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        LayoutConstants {
            max_row_width: 760,
            control_width: 120,
            min_width: 40,
        }
    }
}

/// Markup written in place of rows and cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    pub row_tag: String,
    /// Class marking a rewritten row as a grid row
    pub row_class: String,
    pub column_tag: String,
    /// Prefix of the class carrying the grid value, e.g. `col-` gives `col-4`
    pub column_class_prefix: String,
}

impl RewriteOptions {
    pub fn column_class(&self, grid_value: u8) -> String {
        format!("{}{}", self.column_class_prefix, grid_value)
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            row_tag: "div".to_string(),
            row_class: "row".to_string(),
            column_tag: "div".to_string(),
            column_class_prefix: "col-".to_string(),
        }
    }
}

/// Everything one engine run needs
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub constants: LayoutConstants,
    pub roles: TagRoles,
    pub strategy: GridStrategy,
    pub rewrite: RewriteOptions,
    /// Element the engine processes: a tag name, optionally `tag#id`
    pub root_selector: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            constants: LayoutConstants::default(),
            roles: TagRoles::default(),
            strategy: GridStrategy::default(),
            rewrite: RewriteOptions::default(),
            root_selector: "body".to_string(),
        }
    }
}
