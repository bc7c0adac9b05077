//! Core contract of the generic data model.
//!
//! This crate defines what a tree-shaped value looks like from the outside,
//! independent of any concrete storage:
//!
//! - [`Kind`] and [`Maybe`]: the closed enumerations everything else builds on
//! - [`Node`]: the read-only view of a finished value
//! - [`NodeStyle`], [`NodeBuilder`], [`NodeAssembler`], [`MapAssembler`],
//!   [`ListAssembler`]: the incremental construction protocol
//! - [`Error`]: the failures both sides report
//!
//! Concrete nodes and assemblers live in `datamodel-values`.

pub mod assembler;
pub mod error;
pub mod kind;
pub mod link;
pub mod maybe;
pub mod node;
pub mod options;
pub mod path;

pub use assembler::{ListAssembler, MapAssembler, NodeAssembler, NodeBuilder, NodeStyle};
pub use error::{Error, Result};
pub use kind::{Kind, KindSet};
pub use link::Link;
pub use maybe::{Maybe, MaybeNode};
pub use node::{ListIterator, MapIterator, Node, NodeRef, wrong_kind};
pub use options::{BuildOptions, BuildOptionsOverride, DEFAULT_MAX_SIZE_HINT};
pub use path::PathSegment;

/// Test utilities for enabling logging in tests
#[cfg(any(test, feature = "testing"))]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
