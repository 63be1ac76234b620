//! Projects visible to the session user.

use serde::{Deserialize, Serialize};

/// Status code of a project that is loaded and usable.
pub const PROJECT_STATUS_ACTIVE: i64 = 0;

/// A project as listed by `GET projects`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub alias: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: i64,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == PROJECT_STATUS_ACTIVE
    }
}

/// Finds a project by ID, then by non-empty alias, then by name.
///
/// Each pass scans the whole list, so an ID match wins even when another
/// project's alias or name is the same string.
pub fn find_project<'a>(projects: &'a [Project], identifier: &str) -> Option<&'a Project> {
    projects
        .iter()
        .find(|p| p.id == identifier)
        .or_else(|| {
            projects
                .iter()
                .find(|p| !p.alias.is_empty() && p.alias == identifier)
        })
        .or_else(|| projects.iter().find(|p| p.name == identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, alias: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            alias: alias.to_string(),
            name: name.to_string(),
            ..Project::default()
        }
    }

    fn projects() -> Vec<Project> {
        vec![project("A", "", "Foo"), project("B", "Bar", "Baz")]
    }

    #[test]
    fn test_find_by_alias() {
        assert_eq!(find_project(&projects(), "Bar").unwrap().id, "B");
    }

    #[test]
    fn test_find_by_name() {
        assert_eq!(find_project(&projects(), "Foo").unwrap().id, "A");
        assert_eq!(find_project(&projects(), "Baz").unwrap().id, "B");
    }

    #[test]
    fn test_find_by_id() {
        assert_eq!(find_project(&projects(), "A").unwrap().id, "A");
    }

    #[test]
    fn test_id_takes_precedence_over_alias_and_name() {
        let list = vec![project("X", "", "B"), project("B", "X", "Other")];
        assert_eq!(find_project(&list, "B").unwrap().name, "Other");
        assert_eq!(find_project(&list, "X").unwrap().name, "B");
    }

    #[test]
    fn test_empty_alias_never_matches() {
        assert!(find_project(&projects(), "").is_none());
    }

    #[test]
    fn test_miss_is_none() {
        assert!(find_project(&projects(), "Nope").is_none());
    }

    #[test]
    fn test_status_decodes() {
        let p: Project = serde_json::from_str(
            r#"{"id":"P","alias":"","name":"Tutorial","status":0,"description":"d"}"#,
        )
        .unwrap();
        assert!(p.is_active());
    }
}
