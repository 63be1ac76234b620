//! Object command implementation.

use mstr_api_rs::models::{ObjectInfo, ObjectType};
use mstr_api_rs::session::Session;

use super::{parse_dss, CommandContext, Result};
use crate::output::{format_object_details, format_object_json};

/// Options for the object command.
#[derive(Debug)]
pub struct ObjectOptions {
    /// Object ID.
    pub id: String,
    /// Object type name or numeric value.
    pub object_type: String,
}

/// Executes the object command.
///
/// # Errors
///
/// Returns an error if the type is unknown or the server rejects the request.
pub async fn execute(ctx: &CommandContext, opts: &ObjectOptions, session: &mut Session) -> Result<()> {
    let object_type: ObjectType = parse_dss("object type", &opts.object_type)?;
    let object = ObjectInfo::new(&opts.id, object_type);
    let info = session.get_object_information(&object, None).await?;

    if ctx.json_output {
        println!("{}", format_object_json(&info)?);
    } else if !ctx.quiet {
        print!("{}", format_object_details(&info, ctx.use_colors));
    }

    Ok(())
}
