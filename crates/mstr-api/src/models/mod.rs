//! Data types for the MicroStrategy REST API.
//!
//! Each model wraps a JSON object returned by the server. Unknown keys are
//! ignored and optional keys default to empty values.

mod attribute;
mod dataset;
mod object;
mod project;
mod search;
mod types;

pub use attribute::*;
pub use dataset::*;
pub use object::*;
pub use project::*;
pub use search::*;
pub use types::{DssEnum, ObjectSubtype, ObjectType, SearchType};
