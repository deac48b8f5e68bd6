//! Element tree: a lightweight mirror of the processed document subtree
//!
//! Every element under the selected root becomes one [`ElementNode`] in an
//! `indextree` arena. Text and comments are skipped. Nodes keep a weak handle
//! to their source element: the mirror reads attributes from it during sizing
//! and the rewriter mutates it at the very end, but never keeps it alive.
//!
//! Span counts flow upward while the tree is built. When a node reports a span
//! larger than its parent's, the parent takes it over and notifies its own
//! parent, walking the explicit parent chain until a value stops increasing.

use crate::dom;
use crate::error::GridError;
use crate::roles::{Role, TagRoles};
use indextree::{Arena, NodeId};
use markup5ever_rcdom::{Handle, WeakHandle};
use std::rc::Rc;

/// Grid value given to nodes before calculation, and to the root
pub const FULL_GRID: u8 = 12;

/// Largest colspan honored; larger values are clamped, as browsers do
pub const MAX_COLSPAN: u32 = 1000;

/// Mirror of one element
#[derive(Debug, Clone)]
pub struct ElementNode {
    /// `name` or `name (id)`, informational only
    pub tag: String,
    /// Local name of the source element
    pub name: String,
    pub role: Role,
    /// Depth from the root; the root itself is -1
    pub nesting_level: i32,
    pub source: Option<WeakHandle>,
    pub width: u32,
    pub available_width: u32,
    /// Per-column widths; only meaningful when [`ElementNode::has_columns`]
    pub column_info: Vec<u32>,
    pub grid_value: u8,
    /// Declared `colspan` of a column; 1 everywhere else
    pub colspan: u32,
    /// Column slots this node covers; 0 means it reports no span
    pub span: u32,
}

impl ElementNode {
    fn new(
        tag: String,
        name: String,
        role: Role,
        nesting_level: i32,
        source: Option<WeakHandle>,
    ) -> Self {
        ElementNode {
            tag,
            name,
            role,
            nesting_level,
            source,
            width: 0,
            available_width: 0,
            column_info: Vec::new(),
            grid_value: FULL_GRID,
            colspan: 1,
            span: 0,
        }
    }

    pub fn has_columns(&self) -> bool {
        self.role.has_columns()
    }

    /// The source element, if it is still part of the document
    pub fn source(&self) -> Option<Handle> {
        self.source.as_ref().and_then(|weak| weak.upgrade())
    }

    /// Read an attribute from the live source element
    pub fn attr(&self, name: &str) -> Option<String> {
        self.source().and_then(|handle| dom::attr(&handle, name))
    }
}

/// The mirror tree built for one document run
#[derive(Debug)]
pub struct LayoutTree {
    arena: Arena<ElementNode>,
    root: NodeId,
}

impl LayoutTree {
    /// Mirror the subtree under `root`. A missing root yields a tree holding
    /// only a detached sentinel node.
    pub fn build(root: Option<&Handle>, roles: &TagRoles) -> Result<Self, GridError> {
        let mut arena = Arena::new();

        let Some(root_handle) = root else {
            let sentinel = ElementNode::new(String::new(), String::new(), Role::Other, -1, None);
            let root = arena.new_node(sentinel);
            return Ok(LayoutTree { arena, root });
        };

        let root_node = mirror_element(root_handle, roles, -1)?;
        let root = arena.new_node(root_node);
        let mut tree = LayoutTree { arena, root };
        tree.propagate_span(root);

        let mut stack: Vec<(Handle, NodeId)> = dom::child_elements(root_handle)
            .into_iter()
            .rev()
            .map(|child| (child, root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let level = tree.arena[parent].get().nesting_level + 1;
            let node = mirror_element(&handle, roles, level)?;
            let id = tree.arena.new_node(node);
            parent.append(id, &mut tree.arena);
            tree.propagate_span(id);

            stack.extend(
                dom::child_elements(&handle)
                    .into_iter()
                    .rev()
                    .map(|child| (child, id)),
            );
        }

        log::debug!("element tree built with {} nodes", tree.len());
        Ok(tree)
    }

    /// Push a node's span up the parent chain, stopping at the first ancestor
    /// whose span does not grow
    fn propagate_span(&mut self, from: NodeId) {
        let span = self.arena[from].get().span;
        let mut current = self.arena[from].parent();

        while let Some(id) = current {
            let node = self.arena[id].get_mut();
            if span <= node.span {
                break;
            }
            node.span = span;
            current = self.arena[id].parent();
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ElementNode {
        self.arena[id].get()
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ElementNode {
        self.arena[id].get_mut()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.arena[id].first_child().is_none()
    }

    /// Node ids in depth-first order, parents before children
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.root.descendants(&self.arena).collect()
    }

    /// Node ids with every node after all of its descendants
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut ids = self.pre_order();
        ids.reverse();
        ids
    }

    /// Number of mirrored elements (the sentinel of an empty tree excluded)
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.root.descendants(&self.arena).count()
        }
    }

    /// True when the root selector matched nothing
    pub fn is_empty(&self) -> bool {
        self.node(self.root).source.is_none() && self.is_leaf(self.root)
    }

    /// Rows belonging to a table: direct row children and rows inside its
    /// sections, in document order
    pub fn table_rows(&self, table: NodeId) -> Vec<NodeId> {
        let mut rows = Vec::new();
        for child in self.children(table) {
            match self.node(child).role {
                Role::Row => rows.push(child),
                Role::Section => rows.extend(
                    self.children(child)
                        .into_iter()
                        .filter(|&id| self.node(id).role.is_row()),
                ),
                _ => {}
            }
        }
        rows
    }

    /// Column-typed children of a node
    pub fn column_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|&child| self.node(child).role.is_column())
            .collect()
    }
}

fn mirror_element(handle: &Handle, roles: &TagRoles, level: i32) -> Result<ElementNode, GridError> {
    let name = dom::element_name(handle).unwrap_or_default();
    let tag = match dom::attr(handle, "id").filter(|id| !id.is_empty()) {
        Some(id) => format!("{} ({})", name, id),
        None => name.clone(),
    };
    let role = roles.classify(&name);

    let colspan = if role.is_column() {
        parse_colspan(&name, dom::attr(handle, "colspan"))?
    } else {
        1
    };

    let mut node = ElementNode::new(tag, name, role, level, Some(Rc::downgrade(handle)));
    if role.is_column() {
        node.colspan = colspan;
        node.span = colspan;
    }
    Ok(node)
}

/// Absent means 1. Any run of digits above zero is valid and clamped to
/// [`MAX_COLSPAN`]; anything else is an error.
fn parse_colspan(tag: &str, value: Option<String>) -> Result<u32, GridError> {
    let Some(value) = value else {
        return Ok(1);
    };
    let digits = value.trim();
    let invalid = || GridError::InvalidColspan {
        tag: tag.to_string(),
        value: value.clone(),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match digits.parse::<u64>() {
        Ok(0) => Err(invalid()),
        Ok(span) => Ok(span.min(u64::from(MAX_COLSPAN)) as u32),
        // only overflow is left at this point
        Err(_) => Ok(MAX_COLSPAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{append, create_element};

    fn cell(colspan: Option<&str>) -> Handle {
        match colspan {
            Some(span) => create_element("td", vec![("colspan", span)]),
            None => create_element("td", vec![]),
        }
    }

    #[test]
    fn test_missing_root_is_empty_tree() {
        let tree = LayoutTree::build(None, &TagRoles::default()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.node(tree.root()).nesting_level, -1);
        assert_eq!(tree.node(tree.root()).grid_value, FULL_GRID);
    }

    #[test]
    fn test_mirror_levels_and_tags() {
        let body = create_element("body", vec![]);
        let div = create_element("div", vec![("id", "main")]);
        append(&div, create_element("p", vec![]));
        append(&body, div);

        let tree = LayoutTree::build(Some(&body), &TagRoles::default()).unwrap();
        let root = tree.root();
        let div_id = tree.children(root)[0];
        let p_id = tree.children(div_id)[0];

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(root).nesting_level, -1);
        assert_eq!(tree.node(div_id).tag, "div (main)");
        assert_eq!(tree.node(div_id).nesting_level, 0);
        assert_eq!(tree.node(p_id).nesting_level, 1);
        assert!(tree.is_leaf(p_id));
    }

    #[test]
    fn test_span_propagates_upward_only_when_larger() {
        let table = create_element("table", vec![]);
        let row = create_element("tr", vec![]);
        append(&row, cell(None));
        append(&row, cell(Some("3")));
        append(&row, cell(Some("2")));
        append(&table, row);

        let tree = LayoutTree::build(Some(&table), &TagRoles::default()).unwrap();
        let row_id = tree.children(tree.root())[0];
        let spans: Vec<u32> = tree
            .children(row_id)
            .into_iter()
            .map(|id| tree.node(id).span)
            .collect();

        assert_eq!(spans, vec![1, 3, 2]);
        assert_eq!(tree.node(row_id).span, 3);
        assert_eq!(tree.node(tree.root()).span, 3);
    }

    #[test]
    fn test_invalid_colspan_is_fatal() {
        let row = create_element("tr", vec![]);
        append(&row, cell(Some("two")));

        let err = LayoutTree::build(Some(&row), &TagRoles::default()).unwrap_err();
        assert!(matches!(err, GridError::InvalidColspan { .. }));
    }

    #[test]
    fn test_huge_colspan_is_clamped() {
        let row = create_element("tr", vec![]);
        append(&row, cell(Some("3000000000")));
        append(&row, cell(Some("99999999999999999999999")));
        append(&row, cell(Some(" 12 ")));

        let tree = LayoutTree::build(Some(&row), &TagRoles::default()).unwrap();
        let spans: Vec<u32> = tree
            .children(tree.root())
            .into_iter()
            .map(|id| tree.node(id).colspan)
            .collect();
        assert_eq!(spans, vec![MAX_COLSPAN, MAX_COLSPAN, 12]);
        assert_eq!(tree.node(tree.root()).span, MAX_COLSPAN);
    }

    #[test]
    fn test_colspan_must_be_positive_digits() {
        for bad in ["0", "-2", "+2", "1.5", ""] {
            let row = create_element("tr", vec![]);
            append(&row, cell(Some(bad)));
            let err = LayoutTree::build(Some(&row), &TagRoles::default()).unwrap_err();
            assert!(matches!(err, GridError::InvalidColspan { .. }), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_table_rows_look_through_sections() {
        let table = create_element("table", vec![]);
        let head = create_element("thead", vec![]);
        append(&head, create_element("tr", vec![]));
        let body = create_element("tbody", vec![]);
        append(&body, create_element("tr", vec![]));
        append(&body, create_element("tr", vec![]));
        append(&table, head);
        append(&table, body);

        let tree = LayoutTree::build(Some(&table), &TagRoles::default()).unwrap();
        assert_eq!(tree.table_rows(tree.root()).len(), 3);
    }
}
