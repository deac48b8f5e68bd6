//! Grid values
//!
//! Converts resolved widths into spans of a 12-unit grid. Every value lands in
//! `1..=12`, and the column children of every row are corrected to add up to
//! exactly 12.
//!
//! Two strategies share that contract:
//!
//! - [`GridStrategy::ByRow`] sizes each element against its parent's width and
//!   corrects each row scanning from its first column.
//! - [`GridStrategy::ByContainer`] sizes the cells of a table from the table's
//!   column envelope and corrects scanning from the last column backward.
//!   Elements outside tables are sized as in `ByRow`.

use crate::error::GridError;
use crate::pass::LayoutPass;
use crate::roles::Role;
use crate::tree::{LayoutTree, FULL_GRID};
use indextree::NodeId;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Number of units in a grid row
pub const GRID_UNITS: u32 = 12;

/// How grid values are derived for table cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridStrategy {
    #[default]
    ByRow,
    ByContainer,
}

impl GridStrategy {
    /// End of the row where correction starts
    pub fn scan_direction(self) -> ScanDirection {
        match self {
            GridStrategy::ByRow => ScanDirection::FromFirst,
            GridStrategy::ByContainer => ScanDirection::FromLast,
        }
    }
}

impl fmt::Display for GridStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridStrategy::ByRow => write!(f, "by-row"),
            GridStrategy::ByContainer => write!(f, "by-container"),
        }
    }
}

impl FromStr for GridStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by-row" | "row" => Ok(GridStrategy::ByRow),
            "by-container" | "container" => Ok(GridStrategy::ByContainer),
            other => Err(format!(
                "unknown grid strategy '{}' (expected 'by-row' or 'by-container')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    FromFirst,
    FromLast,
}

/// `round(12 * width / parent_width)`, clamped to `1..=12`
pub fn grid_value(width: u32, parent_width: u32) -> u8 {
    if parent_width == 0 {
        return if width > 0 { FULL_GRID } else { 1 };
    }
    let raw = (f64::from(GRID_UNITS) * f64::from(width) / f64::from(parent_width)).round();
    if raw >= f64::from(GRID_UNITS) {
        FULL_GRID
    } else if raw <= 0.0 {
        1
    } else {
        raw as u8
    }
}

fn clamp_units(units: u32) -> u8 {
    units.clamp(1, GRID_UNITS) as u8
}

/// Move `values` to a sum of 12, one unit at a time, cycling through them in
/// `direction`. No value drops below 1 or rises above 12. Returns false when
/// the sum cannot be reached (more than 12 values).
pub fn correct_to_grid(values: &mut [u8], direction: ScanDirection) -> bool {
    let n = values.len();
    if n == 0 {
        return true;
    }
    let order: Vec<usize> = match direction {
        ScanDirection::FromFirst => (0..n).collect(),
        ScanDirection::FromLast => (0..n).rev().collect(),
    };

    let mut cursor = 0;
    loop {
        let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
        if sum == GRID_UNITS {
            return true;
        }
        let shrinking = sum > GRID_UNITS;
        let movable = |v: u8| if shrinking { v > 1 } else { v < FULL_GRID };

        let Some(step) = (0..n).find(|k| movable(values[order[(cursor + k) % n]])) else {
            return false;
        };
        let index = order[(cursor + step) % n];
        if shrinking {
            values[index] -= 1;
        } else {
            values[index] += 1;
        }
        cursor = (cursor + step + 1) % n;
    }
}

pub struct GridValueCalculator {
    strategy: GridStrategy,
}

impl GridValueCalculator {
    pub fn new(strategy: GridStrategy) -> Self {
        GridValueCalculator { strategy }
    }

    /// Size every node against its parent's width
    fn assign_proportional(&self, tree: &mut LayoutTree) {
        let root = tree.root();
        tree.node_mut(root).grid_value = FULL_GRID;

        for id in tree.pre_order() {
            let parent_width = tree.node(id).width;
            for child in tree.children(id) {
                let value = grid_value(tree.node(child).width, parent_width);
                tree.node_mut(child).grid_value = value;
            }
        }
    }

    /// Size the cells of one table from its column envelope. Returns the rows
    /// it took care of.
    fn assign_from_envelope(&self, tree: &mut LayoutTree, table: NodeId) -> Vec<NodeId> {
        let table_width = tree.node(table).width;
        let mut slots: Vec<u8> = tree
            .node(table)
            .column_info
            .iter()
            .map(|&w| grid_value(w, table_width))
            .collect();
        if slots.is_empty() {
            return Vec::new();
        }
        correct_to_grid(&mut slots, ScanDirection::FromLast);

        let rows = tree.table_rows(table);
        for &row in &rows {
            let cells = tree.column_children(row);
            let mut index = 0usize;
            for &cell in &cells {
                let span = tree.node(cell).span.max(1) as usize;
                let end = (index + span).min(slots.len());
                let units: u32 = slots
                    .get(index..end)
                    .map(|s| s.iter().map(|&v| u32::from(v)).sum())
                    .unwrap_or(0);
                tree.node_mut(cell).grid_value = clamp_units(units);
                index += span;
            }
            self.correct_row(tree, row, ScanDirection::FromLast);
        }
        rows
    }

    fn correct_row(&self, tree: &mut LayoutTree, row: NodeId, direction: ScanDirection) {
        let cells = tree.column_children(row);
        if cells.is_empty() {
            return;
        }
        let mut values: Vec<u8> = cells.iter().map(|&c| tree.node(c).grid_value).collect();
        if !correct_to_grid(&mut values, direction) {
            log::warn!(
                "{} has {} columns; grid values cannot add up to {}",
                tree.node(row).tag,
                cells.len(),
                GRID_UNITS
            );
        }
        for (cell, value) in cells.into_iter().zip(values) {
            tree.node_mut(cell).grid_value = value;
        }
    }
}

impl LayoutPass for GridValueCalculator {
    fn name(&self) -> &str {
        "grid-values"
    }

    fn run(&self, tree: &mut LayoutTree) -> Result<(), GridError> {
        self.assign_proportional(tree);

        let mut handled: HashSet<NodeId> = HashSet::new();
        if self.strategy == GridStrategy::ByContainer {
            for id in tree.pre_order() {
                if tree.node(id).role == Role::Table {
                    handled.extend(self.assign_from_envelope(tree, id));
                }
            }
        }

        for id in tree.pre_order() {
            if !handled.contains(&id) {
                self.correct_row(tree, id, ScanDirection::FromFirst);
            }
        }
        Ok(())
    }
}
