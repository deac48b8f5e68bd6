//! Operations on the parsed HTML node graph
//!
//! The engine never owns document nodes. Everything it needs from the
//! `markup5ever_rcdom` graph goes through the helpers here: attribute lookup,
//! ordered child-element enumeration, renaming, attribute edits, unwrapping a
//! node into its parent and descendant lookup by tag name.
//!
//! rcdom element names are immutable, so renaming builds a replacement node
//! and moves the children across. Children are always emptied out of a node
//! before it is dropped: rcdom's `Drop` strips descendants of whatever it is
//! still holding.

use html5ever::{ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Local name of an element, `None` for text, comments and the document node
pub fn element_name(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Value of the attribute `name`, compared ASCII case-insensitively
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| is_named(a, name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Set an attribute, replacing an existing value
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs
            .iter_mut()
            .find(|a| is_named(a, name))
        {
            Some(existing) => existing.value = value.to_string().into(),
            None => attrs.push(new_attribute(name, value)),
        }
    }
}

/// Remove an attribute, returning whether it was present
pub fn remove_attr(node: &Handle, name: &str) -> bool {
    match node.data {
        NodeData::Element { ref attrs, .. } => {
            let mut attrs = attrs.borrow_mut();
            let before = attrs.len();
            attrs.retain(|a| !is_named(a, name));
            attrs.len() != before
        }
        _ => false,
    }
}

pub fn clear_attrs(node: &Handle) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs.borrow_mut().clear();
    }
}

/// Element children in document order; text and comments are skipped
pub fn child_elements(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// Parent of a node, if it is still attached
pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

fn index_in_parent(parent: &Handle, node: &Handle) -> Option<usize> {
    parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, node))
}

/// First descendant element (document order, `root` excluded) with the given
/// tag name and, when `id` is given, that identifier
pub fn find_descendant(root: &Handle, tag: &str, id: Option<&str>) -> Option<Handle> {
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();

    while let Some(node) = stack.pop() {
        if let Some(name) = element_name(&node) {
            let id_matches = match id {
                Some(wanted) => attr(&node, "id").as_deref() == Some(wanted),
                None => true,
            };
            if name.eq_ignore_ascii_case(tag) && id_matches {
                return Some(node);
            }
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }

    None
}

/// Replace an element with a new element named `tag`, keeping its attributes,
/// its children and its position. Returns the replacement.
pub fn rename(node: &Handle, tag: &str) -> Handle {
    let attrs = match node.data {
        NodeData::Element { ref attrs, .. } => attrs.borrow().clone(),
        _ => return node.clone(),
    };

    let renamed = new_element(html_name(tag), attrs);

    let children = node.children.take();
    for child in &children {
        child.parent.set(Some(Rc::downgrade(&renamed)));
    }
    *renamed.children.borrow_mut() = children;

    if let Some(parent) = parent_of(node) {
        if let Some(index) = index_in_parent(&parent, node) {
            parent.children.borrow_mut()[index] = renamed.clone();
            renamed.parent.set(Some(Rc::downgrade(&parent)));
        }
    }
    node.parent.set(None);

    renamed
}

/// Remove a node from the document, splicing its children into the former
/// parent at the node's position
pub fn unwrap(node: &Handle) {
    let Some(parent) = parent_of(node) else {
        return;
    };
    let Some(index) = index_in_parent(&parent, node) else {
        return;
    };

    let children = node.children.take();
    for child in &children {
        child.parent.set(Some(Rc::downgrade(&parent)));
    }

    let mut siblings = parent.children.borrow_mut();
    let tail = siblings.split_off(index + 1);
    siblings.pop();
    siblings.extend(children);
    siblings.extend(tail);
    node.parent.set(None);
}

/// Create a detached HTML element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| new_attribute(name, value))
        .collect();
    new_element(html_name(tag), attributes)
}

/// Append `child` as the last child of `parent`
pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Attribute name comparison, ASCII case-insensitive
fn is_named(attribute: &Attribute, name: &str) -> bool {
    (*attribute.name.local).eq_ignore_ascii_case(name)
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

fn new_attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_string().into(),
    }
}

fn new_element(name: QualName, attrs: Vec<Attribute>) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Handle {
        let root = create_element("div", vec![("id", "root")]);
        let table = create_element("table", vec![("width", "300")]);
        let row = create_element("tr", vec![]);
        append(&row, create_element("td", vec![]));
        append(&table, row);
        append(&root, create_element("p", vec![]));
        append(&root, table);
        append(&root, create_element("span", vec![]));
        root
    }

    fn names(node: &Handle) -> Vec<String> {
        child_elements(node)
            .iter()
            .filter_map(element_name)
            .collect()
    }

    #[test]
    fn test_attribute_roundtrip() {
        let node = create_element("td", vec![("WIDTH", "20")]);
        assert_eq!(attr(&node, "width").as_deref(), Some("20"));

        set_attr(&node, "width", "40");
        assert_eq!(attr(&node, "width").as_deref(), Some("40"));

        assert!(remove_attr(&node, "width"));
        assert!(!remove_attr(&node, "width"));
        assert_eq!(attr(&node, "width"), None);
    }

    #[test]
    fn test_attribute_names_ignore_case() {
        let node = create_element("td", vec![("Style", "color: red"), ("colSpan", "2")]);
        assert_eq!(attr(&node, "STYLE").as_deref(), Some("color: red"));

        set_attr(&node, "COLSPAN", "3");
        assert_eq!(attr(&node, "colspan").as_deref(), Some("3"));
        assert!(remove_attr(&node, "style"));
        assert_eq!(attr(&node, "Style"), None);
    }

    #[test]
    fn test_find_descendant_by_tag_and_id() {
        let root = tree();
        let row = find_descendant(&root, "tr", None).unwrap();
        assert_eq!(element_name(&row).as_deref(), Some("tr"));
        assert!(find_descendant(&root, "table", Some("missing")).is_none());
        assert!(find_descendant(&root, "section", None).is_none());
    }

    #[test]
    fn test_rename_keeps_position_and_children() {
        let root = tree();
        let table = find_descendant(&root, "table", None).unwrap();

        let renamed = rename(&table, "section");

        assert_eq!(names(&root), vec!["p", "section", "span"]);
        assert_eq!(attr(&renamed, "width").as_deref(), Some("300"));
        assert_eq!(names(&renamed), vec!["tr"]);
        let row = child_elements(&renamed).remove(0);
        assert!(Rc::ptr_eq(&parent_of(&row).unwrap(), &renamed));
    }

    #[test]
    fn test_unwrap_splices_children_into_parent() {
        let root = tree();
        let table = find_descendant(&root, "table", None).unwrap();

        unwrap(&table);

        assert_eq!(names(&root), vec!["p", "tr", "span"]);
        let row = find_descendant(&root, "tr", None).unwrap();
        assert!(Rc::ptr_eq(&parent_of(&row).unwrap(), &root));
        assert!(parent_of(&table).is_none());
    }
}
