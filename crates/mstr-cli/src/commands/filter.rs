//! Filter command implementation.
//!
//! Parses a filter expression against a dataset definition and prints the
//! `viewFilter` body that would be sent with an instance request.

use mstr_api_rs::models::DatasetDefinition;
use mstr_api_rs::session::Session;
use mstr_filter_rs::{FilterParser, ViewFilter};
use tracing::debug;

use super::{dataset_object, CommandContext, Result};
use crate::output::format_view_filter;

/// Options for the filter command.
#[derive(Debug)]
pub struct FilterOptions {
    /// Filter expression text.
    pub expression: String,
    /// Report or cube whose forms the expression names.
    pub dataset: String,
    /// Object subtype of the dataset.
    pub subtype: Option<String>,
}

/// Parses `expression` into a view filter for `definition`.
pub fn build_view_filter(definition: &DatasetDefinition, expression: &str) -> Result<ViewFilter> {
    let parsed = FilterParser::parse_str(expression, definition)?;
    debug!(filter = %parsed, "Parsed filter");
    Ok(ViewFilter::new(parsed))
}

/// Executes the filter command.
///
/// The payload is printed even in quiet mode since it is the command's result.
pub async fn execute(ctx: &CommandContext, opts: &FilterOptions, session: &mut Session) -> Result<()> {
    let object = dataset_object(&opts.dataset, opts.subtype.as_deref())?;
    let definition = session.get_dataset_definition(&object, None).await?;
    let filter = build_view_filter(&definition, &opts.expression)?;
    if ctx.verbose && !ctx.json_output {
        eprintln!("Parsed: {}", filter.expression);
    }
    let body = filter.to_body();

    if ctx.json_output {
        println!("{}", serde_json::to_string(&body)?);
    } else {
        println!("{}", format_view_filter(&body)?);
    }

    Ok(())
}
