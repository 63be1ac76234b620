//! Search requests and results (`searches/results`).

use serde::Serialize;
use serde_json::Value;

use super::object::ObjectInfo;
use super::types::{DssEnum, ObjectType, SearchType};
use crate::error::{Error, Result};

/// Parameters for a quick search.
///
/// # Example
///
/// ```
/// use mstr_api_rs::models::{ObjectType, SearchQuery, SearchType};
///
/// let query = SearchQuery::new()
///     .with_name("Revenue")
///     .with_search_type(SearchType::BeginWith)
///     .with_object_types(vec![ObjectType::ReportDefinition]);
/// assert_eq!(query.search_type, SearchType::BeginWith);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Text to match against object names.
    pub name: Option<String>,
    /// Folder to search under.
    pub root: Option<String>,
    pub search_type: SearchType,
    /// Object types to include; empty means any type.
    pub object_types: Vec<ObjectType>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            name: None,
            root: None,
            search_type: SearchType::Contains,
            object_types: vec![ObjectType::ReportDefinition],
        }
    }
}

impl SearchQuery {
    /// A query for report definitions whose names contain any text.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_object_types(mut self, object_types: Vec<ObjectType>) -> Self {
        self.object_types = object_types;
        self
    }

    /// Query string pairs; every object type becomes its own `type` pair.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("pattern", self.search_type.value().to_string()),
            ("getAncestors", "true".to_string()),
        ];
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(root) = &self.root {
            pairs.push(("root", root.clone()));
        }
        pairs.extend(
            self.object_types
                .iter()
                .map(|t| ("type", t.value().to_string())),
        );
        pairs
    }
}

/// Objects matched by a search.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub results: Vec<ObjectInfo>,
}

impl SearchResults {
    /// Decodes the `result` list; a body without one yields no results.
    pub fn from_json(json: &Value) -> Result<Self> {
        let Some(list) = json.get("result") else {
            return Ok(Self::default());
        };
        let list = list
            .as_array()
            .ok_or_else(|| Error::decode("search results", "`result` is not a list"))?;

        let results = list
            .iter()
            .map(|x| {
                let id = x
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::decode("search results", "object without `id`"))?;
                ObjectInfo::from_json(id, x)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { results })
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
