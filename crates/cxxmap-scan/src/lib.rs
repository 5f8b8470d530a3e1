//! Header scanning for cxxmap.
//!
//! This crate drives a [`cxxmap_core::provider::AstProvider`] over a set of
//! C++ header files and fills a symbol registry:
//! - [`visitor`]: the declaration visitor, a cursor-at-a-time state machine
//! - [`runner`]: the per-file scan loop with diagnostic handling
//! - [`files`]: header discovery under include roots
//! - [`test_helpers`]: an in-memory AST provider for the test suite

pub mod files;
pub mod runner;
pub mod test_helpers;
pub mod visitor;
