//! Generic metadata object returned by `objects/{id}` and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{deserialize_lenient, ObjectSubtype, ObjectType};
use crate::error::{Error, Result};

/// Folder in the ancestor chain of an object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ancestor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
}

/// Metadata shared by every server object.
///
/// `object_type` and `subtype` accept either the numeric code or the short
/// name; values the client does not recognize decode to `None`.
///
/// # Example
///
/// ```
/// use mstr_api_rs::models::{ObjectInfo, ObjectType};
/// use serde_json::json;
///
/// let info = ObjectInfo::from_json(
///     "8D679D4B11D3E4981000E787EC6DE8A4",
///     &json!({"name": "Region", "type": "Attribute"}),
/// )
/// .unwrap();
/// assert_eq!(info.name.as_deref(), Some("Region"));
/// assert_eq!(info.object_type, Some(ObjectType::Attribute));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "deserialize_lenient")]
    pub object_type: Option<ObjectType>,

    #[serde(default)]
    pub abbreviation: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub hidden: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub subtype: Option<ObjectSubtype>,

    #[serde(default)]
    pub ext_type: Option<i64>,

    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub date_created: Option<String>,

    /// Modification timestamp as sent by the server.
    #[serde(default)]
    pub date_modified: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Access control bitmask of the current user.
    #[serde(default)]
    pub acg: Option<i64>,

    #[serde(default)]
    pub icon_path: Option<String>,

    #[serde(default)]
    pub view_media: Option<i64>,

    #[serde(default)]
    pub comments: Vec<String>,

    #[serde(default)]
    pub ancestors: Vec<Ancestor>,
}

impl ObjectInfo {
    /// Creates a bare reference to an object, used to request its metadata.
    pub fn new(id: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            id: id.into(),
            object_type: Some(object_type),
            ..Self::default()
        }
    }

    /// Decodes a server object, keeping `id` as the identity.
    ///
    /// The `id` key inside `json` is ignored; callers pass the identifier
    /// they requested.
    pub fn from_json(id: impl Into<String>, json: &Value) -> Result<Self> {
        let mut info: ObjectInfo = serde_json::from_value(json.clone())
            .map_err(|e| Error::decode("object", e.to_string()))?;
        info.id = id.into();
        Ok(info)
    }

    /// Replaces every field with the values in `json`, keeping the identity.
    ///
    /// Either all fields change or, on error, none do.
    pub fn update(&mut self, json: &Value) -> Result<()> {
        *self = Self::from_json(self.id.clone(), json)?;
        Ok(())
    }

    /// Parses `date_created` as a UTC timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.date_created.as_deref()?)
    }

    /// Parses `date_modified` as a UTC timestamp.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.date_modified.as_deref()?)
    }
}

/// Parses the server's timestamps (`2017-11-23T15:16:56.589Z` or `+0000` offsets).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
