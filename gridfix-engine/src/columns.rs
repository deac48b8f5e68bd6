//! Column envelopes
//!
//! Every row records the width of its cells per column slot; every table (and
//! table section) records, per slot, the widest cell found in any of its rows.
//! A cell's slot index advances by its span count, so a `colspan="2"` cell
//! covers two slots. Table envelopes wider than a row are scaled down to fit.

use crate::error::GridError;
use crate::options::LayoutConstants;
use crate::pass::LayoutPass;
use crate::roles::Role;
use crate::tree::LayoutTree;
use indextree::NodeId;

pub struct ColumnAllocator {
    constants: LayoutConstants,
}

impl ColumnAllocator {
    pub fn new(constants: LayoutConstants) -> Self {
        ColumnAllocator { constants }
    }
}

impl LayoutPass for ColumnAllocator {
    fn name(&self) -> &str {
        "columns"
    }

    fn run(&self, tree: &mut LayoutTree) -> Result<(), GridError> {
        for id in tree.post_order() {
            let column_info = match tree.node(id).role {
                Role::Row => envelope(tree, &[id]),
                Role::Table | Role::Section => {
                    let rows = tree.table_rows(id);
                    scale_to_fit(envelope(tree, &rows), self.constants.max_row_width)
                }
                _ => continue,
            };
            log::trace!("{}: columns {:?}", tree.node(id).tag, column_info);
            tree.node_mut(id).column_info = column_info;
        }
        Ok(())
    }
}

/// Per-slot maximum cell width over `rows`
pub fn envelope(tree: &LayoutTree, rows: &[NodeId]) -> Vec<u32> {
    let mut info: Vec<u32> = Vec::new();

    for &row in rows {
        let mut index = 0usize;
        for cell in tree.column_children(row) {
            let node = tree.node(cell);
            let span = node.span.max(1) as usize;
            if info.len() < index + span {
                info.resize(index + span, 0);
            }
            info[index] = info[index].max(node.width);
            index += span;
        }
    }

    info
}

/// Scale a column vector so it sums to at most `max_width`, rounding each
/// entry half away from zero. Units that rounding pushes over the limit are
/// taken back from the widest entries.
pub fn scale_to_fit(info: Vec<u32>, max_width: u32) -> Vec<u32> {
    let sum: u64 = info.iter().map(|&w| u64::from(w)).sum();
    if sum <= u64::from(max_width) {
        return info;
    }

    let factor = f64::from(max_width) / sum as f64;
    let mut scaled: Vec<u32> = info
        .into_iter()
        .map(|w| (f64::from(w) * factor).round() as u32)
        .collect();

    let mut total: u64 = scaled.iter().map(|&w| u64::from(w)).sum();
    while total > u64::from(max_width) {
        let widest = scaled
            .iter()
            .enumerate()
            .fold(0, |best, (i, &w)| if w > scaled[best] { i } else { best });
        scaled[widest] -= 1;
        total -= 1;
    }
    scaled
}
