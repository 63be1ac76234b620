//! Project output formatting.

use mstr_api_rs::models::Project;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{header_line, truncate_str};

/// JSON output structure for a project.
#[derive(Serialize)]
pub struct ProjectOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub alias: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub is_default: bool,
}

/// Formats projects as JSON.
pub fn format_projects_json(
    projects: &[Project],
    default_id: Option<&str>,
) -> Result<String, serde_json::Error> {
    let output: Vec<ProjectOutput> = projects
        .iter()
        .map(|p| ProjectOutput {
            id: &p.id,
            name: &p.name,
            alias: &p.alias,
            description: p.description.as_deref(),
            is_default: default_id == Some(p.id.as_str()),
        })
        .collect();

    serde_json::to_string_pretty(&output)
}

/// Formats projects as a table, marking the default project.
pub fn format_projects_table(
    projects: &[Project],
    default_id: Option<&str>,
    use_colors: bool,
) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut output = header_line(
        &format!("{:<32}  {:<3} {:<30} {}", "ID", "", "Name", "Alias"),
        use_colors,
    );

    for project in projects {
        let is_default = default_id == Some(project.id.as_str());
        let marker = match (is_default, use_colors) {
            (true, true) => "*".green().to_string(),
            (true, false) => "*".to_string(),
            (false, _) => " ".to_string(),
        };
        let name = truncate_str(&project.name, 30);
        let name = if is_default && use_colors {
            format!("{:<30}", name).bold().to_string()
        } else {
            format!("{:<30}", name)
        };

        output.push_str(&format!(
            "{:<32}  {:<3} {} {}\n",
            project.id, marker, name, project.alias
        ));
    }

    output
}
