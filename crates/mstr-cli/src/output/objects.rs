//! Object and search result output formatting.

use mstr_api_rs::models::{DssEnum, ObjectInfo, SearchResults};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{header_line, truncate_str};

/// JSON output structure for an object.
#[derive(Serialize)]
pub struct ObjectOutput<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    pub path: String,
}

impl<'a> ObjectOutput<'a> {
    fn new(object: &'a ObjectInfo) -> Self {
        Self {
            id: &object.id,
            name: object.name.as_deref(),
            object_type: object.object_type.map(DssEnum::name),
            subtype: object.subtype.map(DssEnum::name),
            description: object.description.as_deref().filter(|d| !d.is_empty()),
            created: object.created_at().map(|t| t.to_rfc3339()),
            modified: object.modified_at().map(|t| t.to_rfc3339()),
            path: folder_path(object),
        }
    }
}

/// Folder path of an object, outermost folder first.
///
/// The server lists ancestors innermost first.
fn folder_path(object: &ObjectInfo) -> String {
    let names: Vec<&str> = object
        .ancestors
        .iter()
        .rev()
        .map(|a| a.name.as_str())
        .collect();
    format!("/{}", names.join("/"))
}

/// Formats object details as JSON.
pub fn format_object_json(object: &ObjectInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ObjectOutput::new(object))
}

/// Formats object details for display.
pub fn format_object_details(object: &ObjectInfo, use_colors: bool) -> String {
    let output = ObjectOutput::new(object);
    let name = output.name.unwrap_or("(unnamed)");
    let mut text = if use_colors {
        format!("{}\n", name.bold())
    } else {
        format!("{name}\n")
    };

    let mut field = |label: &str, value: &str| {
        text.push_str(&format!("  {:<12} {}\n", format!("{label}:"), value));
    };
    field("ID", output.id);
    if let Some(t) = output.object_type {
        field("Type", t);
    }
    if let Some(s) = output.subtype {
        field("Subtype", s);
    }
    field("Path", &output.path);
    if let Some(d) = output.description {
        field("Description", d);
    }
    if let Some(ref c) = output.created {
        field("Created", c);
    }
    if let Some(ref m) = output.modified {
        field("Modified", m);
    }

    text
}

/// Formats search results as JSON.
pub fn format_search_json(results: &SearchResults) -> Result<String, serde_json::Error> {
    let output: Vec<ObjectOutput> = results.results.iter().map(ObjectOutput::new).collect();
    serde_json::to_string_pretty(&output)
}

/// Formats search results as a table.
pub fn format_search_table(results: &SearchResults, use_colors: bool) -> String {
    if results.is_empty() {
        return "No objects found.\n".to_string();
    }

    let mut output = header_line(
        &format!("{:<32}  {:<18} {:<30} {}", "ID", "Type", "Name", "Path"),
        use_colors,
    );
    for object in &results.results {
        let row = ObjectOutput::new(object);
        output.push_str(&format!(
            "{:<32}  {:<18} {:<30} {}\n",
            row.id,
            row.object_type.unwrap_or("-"),
            truncate_str(row.name.unwrap_or(""), 30),
            row.path
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> ObjectInfo {
        ObjectInfo::from_json(
            "D2A9D9C14A5CA1A3B7E21B9C3BF6F4A5",
            &json!({
                "name": "Revenue by Region",
                "type": 3,
                "subtype": 768,
                "description": "",
                "dateCreated": "2017-11-23T15:16:56.589Z",
                "ancestors": [
                    {"id": "F2", "name": "Reports", "level": 1},
                    {"id": "F1", "name": "Public Objects", "level": 2}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_folder_path_is_outermost_first() {
        assert_eq!(folder_path(&report()), "/Public Objects/Reports");
        assert_eq!(folder_path(&ObjectInfo::default()), "/");
    }

    #[test]
    fn test_object_json() {
        let json = format_object_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "ReportDefinition");
        assert_eq!(value["subtype"], "ReportGrid");
        assert_eq!(value["path"], "/Public Objects/Reports");
        assert!(value.get("description").is_none());
        assert!(value["created"].as_str().unwrap().starts_with("2017-11-23T15:16:56"));
    }

    #[test]
    fn test_object_details() {
        let text = format_object_details(&report(), false);
        assert!(text.starts_with("Revenue by Region\n"));
        assert!(text.contains("Type:        ReportDefinition"));
        assert!(text.contains("Path:        /Public Objects/Reports"));
        assert!(!text.contains("Description"));
    }

    #[test]
    fn test_search_table() {
        let results = SearchResults {
            results: vec![report()],
        };
        let table = format_search_table(&results, false);
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("Revenue by Region"));

        assert_eq!(
            format_search_table(&SearchResults::default(), false),
            "No objects found.\n"
        );
    }
}
