/// Core module for merging StringPool cross-references
///
/// This module contains the xrefs loader, the CSV merger, the shared index
/// syntax, and the error types they report.

pub mod errors;
pub mod merger;
pub mod patterns;
pub mod xrefs;
