//! Circular dependency detection infrastructure.

use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;

/// Deepest dependency chain the resolver walks before giving up.
pub(crate) const MAX_DEPTH: usize = 1024;

/// Explicit visitation path of the contracts currently being resolved.
#[derive(Debug, Default)]
pub(crate) struct ResolutionPath<'a> {
    stack: Vec<&'a TypeKey>,
}

impl<'a> ResolutionPath<'a> {
    /// Pushes `contract`, failing if it is already on the path.
    ///
    /// The error carries the cycle itself: from the first occurrence of the
    /// contract to the repeated contract, e.g. `[B, C, B]`. A path already
    /// [`MAX_DEPTH`] long fails with `DepthExceeded`.
    pub(crate) fn enter(&mut self, contract: &'a TypeKey) -> GenResult<()> {
        // Circular detection BEFORE pushing
        if let Some(start) = self.stack.iter().position(|&c| c == contract) {
            let mut cycle: Vec<String> = self.stack[start..]
                .iter()
                .map(|c| c.display_name().to_string())
                .collect();
            cycle.push(contract.display_name().to_string());
            return Err(GenerationError::CyclicDependency(cycle));
        }

        // Depth guard
        if self.stack.len() >= MAX_DEPTH {
            return Err(GenerationError::DepthExceeded(self.stack.len()));
        }

        self.stack.push(contract);
        Ok(())
    }

    pub(crate) fn leave(&mut self, contract: &'a TypeKey) {
        let last = self.stack.pop();
        debug_assert_eq!(last, Some(contract));
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}
