//! Support types the generated code is built on.
//!
//! Nothing here is specific to one binding table: the generated `Scope` holds
//! a [`ScopeSlot`] per scoped binding plus a [`ReleaseFlag`], and implements
//! [`Activate`] for each bound contract.

mod slot;

pub use crate::traits::{Activate, Release, ScopeFactory};
pub use slot::{ReleaseFlag, ScopeSlot, SlotState};
