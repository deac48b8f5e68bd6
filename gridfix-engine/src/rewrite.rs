//! Rewriting the source document
//!
//! Walks the mirror tree depth first, parents before children, and mutates
//! each live source element it points at:
//!
//! | Source      | Result                                             |
//! |-------------|----------------------------------------------------|
//! | table-like  | removed, children spliced into the former parent   |
//! | row-like    | row tag, attributes cleared, row class added       |
//! | column-like | column tag, attributes cleared, `col-N` class      |
//!
//! Every visited element also loses its `width` attribute and any `width:`
//! style declaration.
//!
//! Roles are taken from the element's current name, not from the mirror, so
//! rewriting an already rewritten document changes nothing.

use crate::dom;
use crate::options::RewriteOptions;
use crate::roles::{Role, TagRoles};
use crate::tree::LayoutTree;
use crate::units::{declares_width, strip_style_width};
use markup5ever_rcdom::Handle;

/// Counts of what a rewrite changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub tables_removed: usize,
    pub rows: usize,
    pub columns: usize,
    pub widths_stripped: usize,
}

impl RewriteStats {
    pub fn is_noop(&self) -> bool {
        *self == RewriteStats::default()
    }
}

pub struct DomRewriter<'a> {
    roles: &'a TagRoles,
    options: &'a RewriteOptions,
}

impl<'a> DomRewriter<'a> {
    pub fn new(roles: &'a TagRoles, options: &'a RewriteOptions) -> Self {
        DomRewriter { roles, options }
    }

    pub fn fix(&self, tree: &LayoutTree) -> RewriteStats {
        let mut stats = RewriteStats::default();
        if tree.is_empty() {
            return stats;
        }

        for id in tree.pre_order() {
            let node = tree.node(id);
            let Some(handle) = node.source() else {
                continue;
            };
            let Some(name) = dom::element_name(&handle) else {
                continue;
            };

            if strip_width(&handle) {
                stats.widths_stripped += 1;
            }

            match self.roles.classify(&name) {
                Role::Table | Role::Section => {
                    dom::unwrap(&handle);
                    stats.tables_removed += 1;
                }
                Role::Row => {
                    let row = dom::rename(&handle, &self.options.row_tag);
                    dom::clear_attrs(&row);
                    dom::set_attr(&row, "class", &self.options.row_class);
                    stats.rows += 1;
                }
                Role::Column => {
                    let column = dom::rename(&handle, &self.options.column_tag);
                    dom::clear_attrs(&column);
                    dom::set_attr(
                        &column,
                        "class",
                        &self.options.column_class(node.grid_value),
                    );
                    stats.columns += 1;
                }
                Role::Control | Role::Other => {}
            }
        }

        log::debug!("rewrite finished: {:?}", stats);
        stats
    }
}

/// Drop the `width` attribute and `width:` style declarations. Returns
/// whether anything changed.
pub fn strip_width(handle: &Handle) -> bool {
    let mut changed = dom::remove_attr(handle, "width");

    if let Some(style) = dom::attr(handle, "style") {
        if declares_width(&style) {
            match strip_style_width(&style) {
                Some(stripped) => dom::set_attr(handle, "style", &stripped),
                None => {
                    dom::remove_attr(handle, "style");
                }
            }
            changed = true;
        }
    }

    changed
}
