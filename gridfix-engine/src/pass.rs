//! Sizing passes
//!
//! Each stage of layout inference is a [`LayoutPass`]: it takes the mirror
//! tree and mutates it in place. [`SizingPipeline`] runs the standard stages
//! in order (widths, column envelopes, grid values), once, for one tree.

use crate::columns::ColumnAllocator;
use crate::error::GridError;
use crate::grid::GridValueCalculator;
use crate::options::EngineOptions;
use crate::tree::LayoutTree;
use crate::width::WidthResolver;

/// One whole-tree sizing stage
pub trait LayoutPass {
    /// Stage name used in logs
    fn name(&self) -> &str;

    fn run(&self, tree: &mut LayoutTree) -> Result<(), GridError>;
}

/// The standard sequence of sizing passes
pub struct SizingPipeline {
    passes: Vec<Box<dyn LayoutPass>>,
}

impl SizingPipeline {
    pub fn new(options: &EngineOptions) -> Self {
        SizingPipeline {
            passes: vec![
                Box::new(WidthResolver::new(options.constants, options.roles.clone())),
                Box::new(ColumnAllocator::new(options.constants)),
                Box::new(GridValueCalculator::new(options.strategy)),
            ],
        }
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn run(&self, tree: &mut LayoutTree) -> Result<(), GridError> {
        if tree.is_empty() {
            log::debug!("empty tree, nothing to size");
            return Ok(());
        }
        for pass in &self.passes {
            log::debug!("running pass '{}'", pass.name());
            pass.run(tree)?;
        }
        Ok(())
    }
}
