//! Prelude module for convenient imports.
//!
//! Re-exports the session, error types, and data models so callers can bring
//! everything in with a single `use` statement.
//!
//! # Example
//!
//! ```
//! use mstr_api_rs::prelude::*;
//!
//! // Now you have access to:
//! // - Session, SessionBuilder, Credentials (connection)
//! // - Error, ApiError, Result (error handling)
//! // - ObjectInfo, Attribute, Metric, DatasetDefinition, ... (data models)
//! // - ObjectType, ObjectSubtype, SearchType (server enumerations)
//! ```

// Session types
pub use crate::session::{Credentials, Session, SessionBuilder};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Token
pub use crate::token::AuthToken;

// Data models
pub use crate::models::{
    Ancestor, Attribute, AttributeForm, DatasetDefinition, DatasetResults, DssEnum, Metric,
    ObjectInfo, ObjectSubtype, ObjectType, Project, SearchQuery, SearchResults, SearchType,
};
