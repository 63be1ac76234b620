//! Search command implementation.

use mstr_api_rs::models::{ObjectType, SearchQuery, SearchType};
use mstr_api_rs::session::Session;
use tracing::debug;

use super::{parse_dss, CommandContext, Result};
use crate::output::{format_search_json, format_search_table};

/// Options for the search command.
#[derive(Debug)]
pub struct SearchOptions {
    /// Name pattern.
    pub name: Option<String>,
    /// Folder to search under.
    pub root: Option<String>,
    /// Name matching mode.
    pub search_type: SearchType,
    /// Object type names or values; empty searches for reports.
    pub types: Vec<String>,
}

impl SearchOptions {
    /// Builds the search query.
    pub fn to_query(&self) -> Result<SearchQuery> {
        let mut query = SearchQuery::new().with_search_type(self.search_type);
        if let Some(ref name) = self.name {
            query = query.with_name(name);
        }
        if let Some(ref root) = self.root {
            query = query.with_root(root);
        }
        if !self.types.is_empty() {
            let types = self
                .types
                .iter()
                .map(|t| parse_dss::<ObjectType>("object type", t))
                .collect::<Result<Vec<_>>>()?;
            query = query.with_object_types(types);
        }
        Ok(query)
    }
}

/// Executes the search command.
pub async fn execute(ctx: &CommandContext, opts: &SearchOptions, session: &mut Session) -> Result<()> {
    let query = opts.to_query()?;
    let results = session.search(&query, None).await?;
    debug!(matches = results.len(), "Search finished");

    if ctx.json_output {
        println!("{}", format_search_json(&results)?);
    } else if !ctx.quiet {
        print!("{}", format_search_table(&results, ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(types: &[&str]) -> SearchOptions {
        SearchOptions {
            name: Some("Revenue".to_string()),
            root: None,
            search_type: SearchType::BeginWith,
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_to_query_keeps_default_types() {
        let query = options(&[]).to_query().unwrap();
        assert_eq!(query.object_types, vec![ObjectType::ReportDefinition]);
        assert_eq!(query.search_type, SearchType::BeginWith);
        assert_eq!(query.name.as_deref(), Some("Revenue"));
    }

    #[test]
    fn test_to_query_parses_types() {
        let query = options(&["Folder", "3"]).to_query().unwrap();
        assert_eq!(
            query.object_types,
            vec![ObjectType::Folder, ObjectType::ReportDefinition]
        );
        assert!(options(&["Spreadsheet"]).to_query().is_err());
    }
}
