//! # gridfix-engine
//!
//! Infers the layout of table-based HTML and rewrites it into a 12-column
//! grid of `div` rows and columns.
//!
//! A run goes through three operations:
//!
//! 1. **Build and size**: the element subtree under the root selector is
//!    mirrored into a [`LayoutTree`] and sized by the passes of
//!    [`pass::SizingPipeline`]:
//!    - [`width::WidthResolver`]: pixel widths from attributes, styles and
//!      defaults, then leftover space handed to the cells of each row
//!    - [`columns::ColumnAllocator`]: per-table column width envelopes
//!    - [`grid::GridValueCalculator`]: grid values that add up to 12 per row
//! 2. **Fix**: [`rewrite::DomRewriter`] flattens tables away, turns rows into
//!    `div.row` and cells into `div.col-N`, and strips widths.
//! 3. **Describe**: [`describe::describe`] renders the sized tree as text.
//!
//! File Layout
//!
//!   src/
//!     ├── tree.rs        The mirror tree (arena of ElementNode)
//!     ├── roles.rs       Tag name to structural role
//!     ├── units.rs       Width values in attributes and styles
//!     ├── width.rs       Width pass
//!     ├── columns.rs     Column envelope pass
//!     ├── grid.rs        Grid value pass and strategies
//!     ├── rewrite.rs     DOM rewriting
//!     ├── dom.rs         Handle helpers over markup5ever_rcdom
//!     ├── document.rs    Parse, serialize, save with backup
//!     ├── engine.rs      The operations tied together
//!     └── fixer.rs       Open, fix, save for one file
//!
//! The tree holds weak references into the document, so a document must
//! outlive every tree built from it. Nothing here is shared across threads.

pub mod columns;
pub mod describe;
pub mod document;
pub mod dom;
pub mod engine;
pub mod error;
pub mod fixer;
pub mod grid;
pub mod options;
pub mod pass;
pub mod rewrite;
pub mod roles;
pub mod tree;
pub mod units;
pub mod width;

pub use document::HtmlDocument;
pub use engine::GridEngine;
pub use error::GridError;
pub use fixer::FileFixer;
pub use grid::GridStrategy;
pub use options::{EngineOptions, LayoutConstants, RewriteOptions};
pub use rewrite::RewriteStats;
pub use roles::{Role, TagRoles};
pub use tree::{ElementNode, LayoutTree};
