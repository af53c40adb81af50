//! Shared test utilities for alf integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Fixtures are verbatim Azure payload shapes; builders
//! construct records programmatically when a test needs to vary one field.

pub mod assertions;
pub mod builders;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
