//! Human-readable report of a sized tree
//!
//! One line per mirrored element, indented two spaces per nesting level:
//!
//! ```text
//! <body> columns=false [] width=760 available=0 grid=12
//!   <table> columns=true [153, 253, 353] width=760 available=0 grid=12
//!     <tbody> columns=true [153, 253, 353] width=760 available=0 grid=12
//!       <tr> columns=true [153, 253, 353] width=760 available=1 grid=12
//!         <td> columns=false [] width=153 available=47 grid=2
//! ```
//!
//! Meant for diagnostics and golden tests, not for machines.

use crate::tree::LayoutTree;
use std::fmt::Write;

pub fn describe(tree: &LayoutTree) -> String {
    let mut output = String::new();
    if tree.is_empty() {
        return output;
    }

    for id in tree.pre_order() {
        let node = tree.node(id);
        let depth = (node.nesting_level + 1).max(0) as usize;
        let _ = writeln!(
            output,
            "{}<{}> columns={} {:?} width={} available={} grid={}",
            "  ".repeat(depth),
            node.tag,
            node.has_columns(),
            node.column_info,
            node.width,
            node.available_width,
            node.grid_value
        );
    }

    output
}
