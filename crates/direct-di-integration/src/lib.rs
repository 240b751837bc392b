//! Containers generated at build time from `bindings/*.toml`.

#![allow(clippy::new_without_default)]

pub mod fixtures;

/// Everything transient.
pub mod scenario_a {
    use crate::fixtures::*;

    include!(concat!(env!("OUT_DIR"), "/scenario_a.rs"));
}

/// `dyn Foo` scoped.
pub mod scenario_b {
    use crate::fixtures::*;

    include!(concat!(env!("OUT_DIR"), "/scenario_b.rs"));
}

/// Alternative implementations, with a scoped leaf.
pub mod swapped {
    use crate::fixtures::*;

    include!(concat!(env!("OUT_DIR"), "/swapped.rs"));
}

/// Custom type names and a mix of lifetimes.
pub mod request_scope {
    use crate::fixtures::*;

    include!(concat!(env!("OUT_DIR"), "/request_scope.rs"));
}
