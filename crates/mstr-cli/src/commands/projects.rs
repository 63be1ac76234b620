//! Projects command implementation.
//!
//! Lists the active projects loaded at login.

use mstr_api_rs::session::Session;

use super::{CommandContext, Result};
use crate::output::{format_projects_json, format_projects_table};

/// Executes the projects command.
pub fn execute(ctx: &CommandContext, session: &Session) -> Result<()> {
    let projects = session.projects();
    let default_id = session.current_project().map(|p| p.id.as_str());

    if ctx.json_output {
        println!("{}", format_projects_json(projects, default_id)?);
    } else if !ctx.quiet {
        print!("{}", format_projects_table(projects, default_id, ctx.use_colors));
    }

    Ok(())
}
