//! Core traits implemented by generated scopes and providers.

mod activate;
mod release;

pub use activate::Activate;
pub use release::{Release, ScopeFactory};
