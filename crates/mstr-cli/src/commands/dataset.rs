//! Dataset command implementation.
//!
//! Shows the attributes and metrics of a report or cube.

use mstr_api_rs::session::Session;

use super::{dataset_object, CommandContext, Result};
use crate::output::{format_definition, format_definition_json};

/// Options for the dataset command.
#[derive(Debug)]
pub struct DatasetOptions {
    /// Report or cube ID.
    pub id: String,
    /// Object subtype; `None` means a grid report.
    pub subtype: Option<String>,
}

/// Executes the dataset command.
pub async fn execute(ctx: &CommandContext, opts: &DatasetOptions, session: &mut Session) -> Result<()> {
    let object = dataset_object(&opts.id, opts.subtype.as_deref())?;
    let definition = session.get_dataset_definition(&object, None).await?;

    if ctx.json_output {
        println!("{}", format_definition_json(&definition)?);
    } else if !ctx.quiet {
        print!("{}", format_definition(&definition, ctx.use_colors));
    }

    Ok(())
}
