//! Output formatting utilities for the mstr CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`projects`] - Project listing
//! - [`objects`] - Object details and search results
//! - [`datasets`] - Dataset definitions, instance rows, and view filters
//! - [`helpers`] - Common formatting utilities (truncation, headers)

mod datasets;
pub mod helpers;
mod objects;
mod projects;

pub use datasets::{
    format_definition, format_definition_json, format_rows_json, format_rows_table,
    format_view_filter,
};
pub use objects::{
    format_object_details, format_object_json, format_search_json, format_search_table,
};
pub use projects::{format_projects_json, format_projects_table};
