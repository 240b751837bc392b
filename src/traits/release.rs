//! Scope release and structured scope acquisition.

/// Releases the scoped instances a scope holds.
pub trait Release {
    /// Drops every cached scoped instance.
    ///
    /// Returns `true` only for the call that performed the first release;
    /// repeated calls are harmless and return `false`.
    fn release(&self) -> bool;
}

/// Creates scopes.
pub trait ScopeFactory {
    type Scope: Release;

    fn new_scope(&self) -> Self::Scope;

    /// Runs `f` with a fresh scope and releases it afterwards.
    ///
    /// If `f` unwinds the scope is still reclaimed when it is dropped.
    fn with_scope<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Self::Scope) -> R,
    {
        let scope = self.new_scope();
        let result = f(&scope);
        scope.release();
        result
    }
}
