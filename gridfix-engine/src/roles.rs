//! Structural roles of source elements
//!
//! Every mirrored element is classified once, from its local name, into the
//! role it plays in table layout. The classification drives width defaults,
//! column aggregation and the final rewrite.

use std::collections::HashSet;

/// Structural role of an element in a table layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `table`: container-like, owns a column envelope
    Table,
    /// `thead` / `tbody` / `tfoot`: transparent wrapper between a table and its rows
    Section,
    /// `tr`: row-like
    Row,
    /// `td` / `th`: column-like
    Column,
    /// Form controls with a fixed default width
    Control,
    Other,
}

impl Role {
    pub fn is_row(self) -> bool {
        self == Role::Row
    }

    pub fn is_column(self) -> bool {
        self == Role::Column
    }

    /// Elements that disappear on rewrite
    pub fn is_table_like(self) -> bool {
        matches!(self, Role::Table | Role::Section)
    }

    /// Nodes whose `column_info` is a column vector rather than a scalar
    pub fn has_columns(self) -> bool {
        matches!(self, Role::Table | Role::Section | Role::Row)
    }
}

/// Tag vocabulary used to classify elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRoles {
    tables: HashSet<String>,
    sections: HashSet<String>,
    rows: HashSet<String>,
    columns: HashSet<String>,
    controls: HashSet<String>,
    root_tag: String,
}

impl TagRoles {
    pub fn new<S: AsRef<str>>(
        tables: &[S],
        sections: &[S],
        rows: &[S],
        columns: &[S],
        controls: &[S],
        root_tag: &str,
    ) -> Self {
        TagRoles {
            tables: lowercase_set(tables),
            sections: lowercase_set(sections),
            rows: lowercase_set(rows),
            columns: lowercase_set(columns),
            controls: lowercase_set(controls),
            root_tag: root_tag.to_ascii_lowercase(),
        }
    }

    /// Classify an element by local name (ASCII case-insensitive)
    pub fn classify(&self, name: &str) -> Role {
        let name = name.to_ascii_lowercase();
        if self.tables.contains(&name) {
            Role::Table
        } else if self.sections.contains(&name) {
            Role::Section
        } else if self.rows.contains(&name) {
            Role::Row
        } else if self.columns.contains(&name) {
            Role::Column
        } else if self.controls.contains(&name) {
            Role::Control
        } else {
            Role::Other
        }
    }

    /// Whether `name` is the designated document-root tag
    pub fn is_root_tag(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.root_tag)
    }

    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }
}

impl Default for TagRoles {
    fn default() -> Self {
        TagRoles::new(
            &["table"],
            &["thead", "tbody", "tfoot"],
            &["tr"],
            &["td", "th"],
            &["input", "select", "textarea", "button"],
            "body",
        )
    }
}

fn lowercase_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names
        .iter()
        .map(|n| n.as_ref().trim().to_ascii_lowercase())
        .collect()
}
