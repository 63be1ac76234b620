//! Instance command implementation.
//!
//! Runs a report or cube, optionally filtered, and prints its rows.

use mstr_api_rs::session::Session;
use tracing::debug;

use super::filter::build_view_filter;
use super::{dataset_object, CommandContext, Result};
use crate::output::{format_rows_json, format_rows_table};

/// Options for the instance command.
#[derive(Debug)]
pub struct InstanceOptions {
    /// Report or cube ID.
    pub id: String,
    /// Object subtype of the dataset.
    pub subtype: Option<String>,
    /// Filter expression applied to the instance.
    pub filter: Option<String>,
}

/// Executes the instance command.
///
/// A filter is resolved against the dataset definition, which costs one
/// extra request.
pub async fn execute(ctx: &CommandContext, opts: &InstanceOptions, session: &mut Session) -> Result<()> {
    let object = dataset_object(&opts.id, opts.subtype.as_deref())?;

    let body = match opts.filter.as_deref() {
        Some(expression) => {
            let definition = session.get_dataset_definition(&object, None).await?;
            Some(build_view_filter(&definition, expression)?.to_body())
        }
        None => None,
    };

    let results = session.create_instance(&object, body.as_ref(), None).await?;
    debug!(
        instance_id = results.instance_id.as_deref().unwrap_or(""),
        rows = results.rows.len(),
        "Instance created"
    );

    if ctx.json_output {
        println!("{}", format_rows_json(&results)?);
    } else if !ctx.quiet {
        print!("{}", format_rows_table(&results, ctx.use_colors));
    }

    Ok(())
}
