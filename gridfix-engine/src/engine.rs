//! The three engine operations: build-and-size, fix and describe
//!
//! A tree is built and sized for one document run. It holds weak references to
//! the source elements, so it must not outlive the document it mirrors, and
//! it is not reused after [`GridEngine::fix`] has rewritten that document.

use crate::describe;
use crate::document::HtmlDocument;
use crate::error::GridError;
use crate::options::EngineOptions;
use crate::pass::SizingPipeline;
use crate::rewrite::{DomRewriter, RewriteStats};
use crate::tree::LayoutTree;
use markup5ever_rcdom::Handle;

#[derive(Debug, Clone, Default)]
pub struct GridEngine {
    options: EngineOptions,
}

impl GridEngine {
    pub fn new(options: EngineOptions) -> Self {
        GridEngine { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Mirror the subtree under `root` and size it. `None` gives an empty
    /// tree, which every later operation treats as a no-op.
    pub fn build_and_size(&self, root: Option<&Handle>) -> Result<LayoutTree, GridError> {
        let mut tree = LayoutTree::build(root, &self.options.roles)?;
        SizingPipeline::new(&self.options).run(&mut tree)?;
        Ok(tree)
    }

    /// Build and size the element matched by the configured root selector
    pub fn size_document(&self, document: &HtmlDocument) -> Result<LayoutTree, GridError> {
        let root = document.select_root(&self.options.root_selector);
        if root.is_none() {
            log::info!("no element matches '{}'", self.options.root_selector);
        }
        self.build_and_size(root.as_ref())
    }

    /// Rewrite the source elements of a sized tree into grid markup
    pub fn fix(&self, tree: &LayoutTree) -> RewriteStats {
        DomRewriter::new(&self.options.roles, &self.options.rewrite).fix(tree)
    }

    pub fn describe(&self, tree: &LayoutTree) -> String {
        describe::describe(tree)
    }
}
