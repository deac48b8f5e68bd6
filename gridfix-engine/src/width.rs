//! Width inference
//!
//! Assigns `width` and `available_width` to every node, top-down from the
//! root, with a bottom-up redistribution step for rows.
//!
//! Per node:
//!
//! 1. An explicit width is read from the `width` attribute and from a `width:`
//!    style declaration; a non-zero style value wins. Percentages are taken of
//!    the parent width.
//! 2. Without one, a positional default applies (see [`WidthResolver::default_width`]).
//! 3. Children are resolved in order. Their widths accumulate and the node's
//!    available width shrinks after each child, never below 0.
//! 4. Anything that is not a row and whose children add up to a positive width
//!    no wider than a row is resized to that sum.
//! 5. Rows hand their leftover width to their cells, in proportion to colspan.

use crate::error::GridError;
use crate::options::LayoutConstants;
use crate::pass::LayoutPass;
use crate::roles::{Role, TagRoles};
use crate::tree::{ElementNode, LayoutTree};
use crate::units::{style_width, WidthValue};
use indextree::NodeId;

pub struct WidthResolver {
    constants: LayoutConstants,
    roles: TagRoles,
}

/// What a node knows about its parent when it is sized
#[derive(Debug, Clone, Copy)]
struct ParentContext {
    width: u32,
    available: u32,
    role: Option<Role>,
}

impl WidthResolver {
    pub fn new(constants: LayoutConstants, roles: TagRoles) -> Self {
        WidthResolver { constants, roles }
    }

    fn resolve(&self, tree: &mut LayoutTree, id: NodeId) -> Result<(), GridError> {
        let parent = match tree.parent(id) {
            Some(parent_id) => {
                let parent = tree.node(parent_id);
                ParentContext {
                    width: parent.width,
                    available: parent.available_width,
                    role: Some(parent.role),
                }
            }
            None => ParentContext {
                width: self.constants.max_row_width,
                available: self.constants.max_row_width,
                role: None,
            },
        };

        let explicit = explicit_width(tree.node(id), parent.width)?;
        let width = if explicit > 0 {
            explicit
        } else {
            self.default_width(tree.node(id), parent)
        };

        {
            let node = tree.node_mut(id);
            node.width = width;
            node.available_width = width;
        }

        let mut calculated: u32 = 0;
        for child in tree.children(id) {
            self.resolve(tree, child)?;
            calculated = calculated.saturating_add(tree.node(child).width);
            let node = tree.node_mut(id);
            node.available_width = node.width.saturating_sub(calculated);
        }

        let max_row_width = self.constants.max_row_width;
        let node = tree.node_mut(id);
        if !node.role.is_row() && calculated > 0 && calculated <= max_row_width {
            node.width = calculated;
            node.available_width = 0;
        }
        log::trace!(
            "{}: width={} available={}",
            node.tag,
            node.width,
            node.available_width
        );

        if node.role.is_row() {
            redistribute(tree, id);
        }
        Ok(())
    }

    /// Width of a node that declares none
    ///
    /// Rows and table sections take their parent's width; the document-root
    /// tag gets a full row; controls get the control width. Everything else
    /// gets the floor inside a row or table, what is left of the parent when
    /// that is below the floor, and the parent's width otherwise.
    fn default_width(&self, node: &ElementNode, parent: ParentContext) -> u32 {
        let c = &self.constants;
        match node.role {
            Role::Row | Role::Section => parent.width,
            _ if self.roles.is_root_tag(&node.name) => c.max_row_width,
            Role::Control => c.control_width,
            _ => match parent.role {
                Some(Role::Row) | Some(Role::Table) => c.min_width,
                _ if parent.available < c.min_width => parent.available,
                _ => parent.width,
            },
        }
    }
}

impl LayoutPass for WidthResolver {
    fn name(&self) -> &str {
        "widths"
    }

    fn run(&self, tree: &mut LayoutTree) -> Result<(), GridError> {
        let root = tree.root();
        self.resolve(tree, root)
    }
}

/// Explicit width of a node, 0 when it declares none
fn explicit_width(node: &ElementNode, parent_width: u32) -> Result<u32, GridError> {
    let from_attr = match node.attr("width") {
        Some(text) => parse_width(node, &text)?.resolve(parent_width),
        None => 0,
    };
    let from_style = match node.attr("style").and_then(|style| style_width(&style)) {
        Some(text) => parse_width(node, &text)?.resolve(parent_width),
        None => 0,
    };

    Ok(if from_style > 0 { from_style } else { from_attr })
}

/// Empty text counts as no width; anything else must be a number
fn parse_width(node: &ElementNode, text: &str) -> Result<WidthValue, GridError> {
    if text.trim().is_empty() {
        return Ok(WidthValue::Pixels(0));
    }
    WidthValue::parse(text).ok_or_else(|| GridError::InvalidWidth {
        tag: node.tag.clone(),
        value: text.to_string(),
    })
}

/// Spread a row's leftover width over its cells, proportionally to colspan,
/// then repeat for every row further down
pub fn redistribute(tree: &mut LayoutTree, id: NodeId) {
    if tree.node(id).role.is_row() {
        let columns = tree.column_children(id);
        let total_span: u64 = columns
            .iter()
            .map(|&c| u64::from(tree.node(c).colspan))
            .sum();

        if total_span > 0 {
            // below available_width, so it fits back into u32
            let per_span = (u64::from(tree.node(id).available_width) / total_span) as u32;
            if per_span > 0 {
                for &column in &columns {
                    let share = per_span.saturating_mul(tree.node(column).colspan);

                    let cell = tree.node_mut(column);
                    cell.width = cell.width.saturating_add(share);
                    cell.available_width = cell.available_width.saturating_sub(share);

                    let row = tree.node_mut(id);
                    row.available_width = row.available_width.saturating_sub(share);
                }
            }
        }
    }

    for child in tree.children(id) {
        redistribute(tree, child);
    }
}
