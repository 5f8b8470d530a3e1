//! Core infrastructure for cxxmap.
//!
//! This crate provides the language-semantic layer of cxxmap:
//! - Data model for namespaces, classes, enums, functions and resolved types
//! - Type resolution engine (qualifier extraction, scope matching, alias chains)
//! - Symbol registry that merges and deduplicates declarations by full name
//! - AST provider trait for pluggable parser backends
//! - Error types and scan summary output

pub mod error;
pub mod provider;
pub mod registry;
pub mod resolve;
pub mod summary;
pub mod types;
